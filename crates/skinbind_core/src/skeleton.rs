//! Skeleton (armature) representation.
//!
//! A skeleton owns a set of uniquely named bones arranged as a forest.
//! Parent links are name-based back-references, child lists are ordered.
//! Bone enumeration order is insertion order, which keeps every operation
//! that walks the skeleton deterministic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while editing a skeleton.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkeletonError {
    #[error("Duplicate bone name: {0}")]
    DuplicateBone(String),

    #[error("Bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },
}

/// Result type for skeleton edits.
pub type SkeletonResult<T> = Result<T, SkeletonError>;

/// A pose constraint attached to a bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoneConstraint {
    /// Inverse kinematics solver
    Ik {
        /// Bone the chain reaches for
        #[serde(default)]
        target: Option<String>,

        /// Number of bones in the chain (0 = whole chain)
        #[serde(default)]
        chain_length: u32,
    },

    /// Any other constraint type, kept by name only
    Other { name: String },
}

impl BoneConstraint {
    /// Check if this is an IK constraint.
    pub fn is_ik(&self) -> bool {
        matches!(self, BoneConstraint::Ik { .. })
    }
}

/// A named node in the bone tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    /// Unique bone name
    pub name: String,

    /// Parent bone name (None for root bones)
    pub parent: Option<String>,

    /// Child bone names, in insertion order
    pub children: Vec<String>,

    /// Pose constraints
    pub constraints: Vec<BoneConstraint>,
}

impl Bone {
    fn new(name: String, parent: Option<String>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Check if the bone carries an IK constraint.
    pub fn has_ik_constraint(&self) -> bool {
        self.constraints.iter().any(BoneConstraint::is_ik)
    }
}

/// The full bone tree of one rigged asset.
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    /// Skeleton (armature object) name
    pub name: String,

    bones: HashMap<String, Bone>,

    /// Bone names in enumeration order
    order: Vec<String>,
}

impl Skeleton {
    /// Create an empty skeleton.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a bone, linking it under `parent` when given.
    ///
    /// The parent must already exist, so skeletons are always built
    /// top-down and stay acyclic.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<&str>,
    ) -> SkeletonResult<()> {
        let name = name.into();
        if self.bones.contains_key(&name) {
            return Err(SkeletonError::DuplicateBone(name));
        }

        if let Some(parent) = parent {
            let parent_bone = self
                .bones
                .get_mut(parent)
                .ok_or_else(|| SkeletonError::UnknownParent {
                    bone: name.clone(),
                    parent: parent.to_string(),
                })?;
            parent_bone.children.push(name.clone());
        }

        self.order.push(name.clone());
        self.bones
            .insert(name.clone(), Bone::new(name, parent.map(str::to_string)));
        Ok(())
    }

    /// Attach a constraint to an existing bone. Returns false if the bone is unknown.
    pub fn add_constraint(&mut self, bone: &str, constraint: BoneConstraint) -> bool {
        match self.bones.get_mut(bone) {
            Some(bone) => {
                bone.constraints.push(constraint);
                true
            }
            None => false,
        }
    }

    /// Remove a bone by name.
    ///
    /// The bone is detached from its parent's child list. Its own children
    /// are left in place with a parent link that no longer resolves.
    pub fn remove_bone(&mut self, name: &str) -> Option<Bone> {
        let bone = self.bones.remove(name)?;
        self.order.retain(|n| n != name);

        if let Some(parent) = bone.parent.as_deref() {
            if let Some(parent_bone) = self.bones.get_mut(parent) {
                parent_bone.children.retain(|c| c != name);
            }
        }

        Some(bone)
    }

    /// Get a bone by name.
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.get(name)
    }

    #[cfg(test)]
    pub(crate) fn bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bones.get_mut(name)
    }

    /// Check if a bone exists.
    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    /// Iterate bone names in enumeration order.
    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterate bones in enumeration order.
    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.order.iter().filter_map(|name| self.bones.get(name))
    }

    /// Child names of a bone (empty for unknown bones).
    pub fn children(&self, name: &str) -> &[String] {
        self.bones
            .get(name)
            .map(|bone| bone.children.as_slice())
            .unwrap_or(&[])
    }

    /// Names of bones without a parent.
    pub fn roots(&self) -> Vec<&str> {
        self.bones()
            .filter(|bone| bone.parent.is_none())
            .map(|bone| bone.name.as_str())
            .collect()
    }

    /// Names of bones whose parent link no longer resolves.
    pub fn orphans(&self) -> Vec<&str> {
        self.bones()
            .filter(|bone| {
                bone.parent
                    .as_deref()
                    .map_or(false, |parent| !self.bones.contains_key(parent))
            })
            .map(|bone| bone.name.as_str())
            .collect()
    }

    /// Names of bones that carry an IK constraint, in enumeration order.
    pub fn ik_bone_names(&self) -> Vec<String> {
        self.bones()
            .filter(|bone| bone.has_ik_constraint())
            .map(|bone| bone.name.clone())
            .collect()
    }

    /// Get the bone count.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the skeleton has no bones.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Skeleton {
        let mut skeleton = Skeleton::new("Armature");
        skeleton.add_bone("Root", None).unwrap();
        skeleton.add_bone("Hips", Some("Root")).unwrap();
        skeleton.add_bone("Spine", Some("Hips")).unwrap();
        skeleton.add_bone("LegL", Some("Hips")).unwrap();
        skeleton.add_bone("Prop", None).unwrap();
        skeleton
    }

    #[test]
    fn test_add_bone_links_parent_and_child() {
        let skeleton = sample();

        assert_eq!(skeleton.len(), 5);
        assert_eq!(skeleton.children("Hips"), ["Spine", "LegL"]);
        assert_eq!(skeleton.bone("Spine").unwrap().parent.as_deref(), Some("Hips"));
        assert_eq!(skeleton.roots(), vec!["Root", "Prop"]);
    }

    #[test]
    fn test_enumeration_order_is_insertion_order() {
        let skeleton = sample();
        let names: Vec<&str> = skeleton.bone_names().collect();
        assert_eq!(names, vec!["Root", "Hips", "Spine", "LegL", "Prop"]);
    }

    #[test]
    fn test_add_bone_rejects_duplicates_and_unknown_parents() {
        let mut skeleton = sample();

        assert_eq!(
            skeleton.add_bone("Hips", None),
            Err(SkeletonError::DuplicateBone("Hips".to_string()))
        );
        assert!(matches!(
            skeleton.add_bone("Hand", Some("Arm")),
            Err(SkeletonError::UnknownParent { .. })
        ));
        assert_eq!(skeleton.len(), 5);
    }

    #[test]
    fn test_remove_bone_leaves_children_dangling() {
        let mut skeleton = sample();

        let removed = skeleton.remove_bone("Hips").unwrap();
        assert_eq!(removed.children, vec!["Spine", "LegL"]);

        assert!(!skeleton.contains("Hips"));
        assert!(skeleton.children("Root").is_empty());
        assert_eq!(skeleton.bone("Spine").unwrap().parent.as_deref(), Some("Hips"));
        assert_eq!(skeleton.orphans(), vec!["Spine", "LegL"]);
        assert!(skeleton.remove_bone("Hips").is_none());
    }

    #[test]
    fn test_ik_bone_names() {
        let mut skeleton = sample();
        assert!(skeleton.add_constraint(
            "LegL",
            BoneConstraint::Ik {
                target: Some("Prop".to_string()),
                chain_length: 2,
            },
        ));
        assert!(skeleton.add_constraint(
            "Spine",
            BoneConstraint::Other {
                name: "COPY_ROTATION".to_string(),
            },
        ));
        assert!(!skeleton.add_constraint("Missing", BoneConstraint::Other { name: "X".into() }));

        assert_eq!(skeleton.ik_bone_names(), vec!["LegL".to_string()]);
    }
}
