//! Mesh assets as seen by the rigging pipeline.
//!
//! Geometry is optional here: the pipeline mostly cares about weight groups,
//! modifiers and parenting. Vertex positions are only needed by weight-copy
//! implementations that map vertices spatially.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A named per-vertex influence mapping (a "vertex group").
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightGroup {
    /// Group name, normally the name of the bone it deforms with
    pub name: String,

    /// Sparse (vertex index, weight) pairs
    #[serde(default)]
    pub weights: Vec<(u32, f32)>,
}

impl WeightGroup {
    /// Create an empty weight group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: Vec::new(),
        }
    }

    /// Look up the weight of a vertex in this group.
    pub fn weight(&self, vertex: u32) -> Option<f32> {
        self.weights
            .iter()
            .find(|(index, _)| *index == vertex)
            .map(|(_, weight)| *weight)
    }
}

/// A modifier attached to a mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modifier {
    /// Deform the mesh by a skeleton's bone transforms
    Armature {
        /// Skeleton driving the deformation
        skeleton: String,

        /// Bind through vertex groups (as opposed to envelopes)
        #[serde(default = "default_true")]
        use_vertex_groups: bool,
    },

    /// Any other modifier, kept by name only
    Other { name: String },
}

fn default_true() -> bool {
    true
}

impl Modifier {
    /// Check if this modifier deforms the mesh by a skeleton.
    pub fn is_armature(&self) -> bool {
        matches!(self, Modifier::Armature { .. })
    }
}

/// The ownership-style parent of a scene object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ParentRef {
    /// Parented to a skeleton (armature object)
    Skeleton(String),

    /// Parented to some other object
    Object(String),
}

/// A mesh object in the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshAsset {
    /// Unique object name
    pub name: String,

    /// Number of vertices
    pub vertex_count: usize,

    /// Vertex positions (optional, one Vec3 per vertex when present)
    pub positions: Option<Vec<Vec3>>,

    /// Weight groups, in creation order
    pub weight_groups: Vec<WeightGroup>,

    /// Attached modifiers, in stack order
    pub modifiers: Vec<Modifier>,

    /// Parent object
    pub parent: Option<ParentRef>,
}

impl MeshAsset {
    /// Create a mesh with a vertex count and no geometry.
    pub fn new(name: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            ..Default::default()
        }
    }

    /// Create a mesh from vertex positions.
    pub fn from_positions(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            vertex_count: positions.len(),
            positions: Some(positions),
            ..Default::default()
        }
    }

    /// Add a weight group (builder style). Replaces a group of the same name.
    pub fn with_group(mut self, group: WeightGroup) -> Self {
        self.set_group(group);
        self
    }

    /// Add empty weight groups by name (builder style).
    pub fn with_group_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.set_group(WeightGroup::new(name));
        }
        self
    }

    /// Insert a weight group, keeping names unique.
    ///
    /// A group with the same name is replaced in place and returned.
    pub fn set_group(&mut self, group: WeightGroup) -> Option<WeightGroup> {
        match self.weight_groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => Some(std::mem::replace(existing, group)),
            None => {
                self.weight_groups.push(group);
                None
            }
        }
    }

    /// Get the number of weight groups.
    pub fn group_count(&self) -> usize {
        self.weight_groups.len()
    }

    /// Check if the mesh has any weight groups.
    pub fn has_weight_groups(&self) -> bool {
        !self.weight_groups.is_empty()
    }

    /// Get a weight group by name.
    pub fn group(&self, name: &str) -> Option<&WeightGroup> {
        self.weight_groups.iter().find(|g| g.name == name)
    }

    /// Remove every weight group.
    pub fn clear_weight_groups(&mut self) {
        self.weight_groups.clear();
    }

    /// Check if an armature modifier is attached.
    pub fn has_armature_modifier(&self) -> bool {
        self.modifiers.iter().any(Modifier::is_armature)
    }

    /// Check if the parent is a skeleton.
    pub fn is_parented_to_skeleton(&self) -> bool {
        matches!(self.parent, Some(ParentRef::Skeleton(_)))
    }

    /// Name of the parent skeleton, if any.
    pub fn parent_skeleton(&self) -> Option<&str> {
        match &self.parent {
            Some(ParentRef::Skeleton(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Parent the mesh to a skeleton and make sure it deforms with it.
    ///
    /// An armature modifier is only added if none is attached yet.
    /// Returns true if a modifier was added.
    pub fn bind_to_skeleton(&mut self, skeleton: &str) -> bool {
        self.parent = Some(ParentRef::Skeleton(skeleton.to_string()));

        if self.has_armature_modifier() {
            return false;
        }

        self.modifiers.push(Modifier::Armature {
            skeleton: skeleton.to_string(),
            use_vertex_groups: true,
        });
        true
    }
}
