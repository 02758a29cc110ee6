//! Weight-copy capabilities.
//!
//! The engine treats weight copying as a host capability behind the
//! [`WeightCopy`] trait. Two implementations ship with the crate:
//!
//! - [`NearestVertexCopy`]: maps each target vertex to the closest source
//!   vertex and copies its influences
//! - [`GroupMirrorCopy`]: creates the source's group names with no
//!   influences, for scenes loaded without geometry

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::nearest::PointIndex;
use crate::mesh::{MeshAsset, WeightGroup};

/// Errors from a single target's weight copy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Mesh '{mesh}' has no vertex positions")]
    MissingPositions { mesh: String },

    #[error("Mesh '{mesh}' declares {declared} vertices but has {found} positions")]
    VertexCountMismatch {
        mesh: String,
        declared: usize,
        found: usize,
    },

    #[error("Weight copy failed: {0}")]
    Host(String),
}

/// Result type for weight copies.
pub type TransferResult<T> = Result<T, TransferError>;

/// Copies weight groups from a source surface onto a target mesh.
///
/// After a successful call the target's weight groups mirror the source's
/// group names with influences mapped onto the target's vertices.
pub trait WeightCopy {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Copy all weight groups of `source` onto `target`.
    fn copy_weights(&mut self, source: &MeshAsset, target: &mut MeshAsset) -> TransferResult<()>;
}

/// Selectable weight-copy method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMethod {
    #[default]
    NearestVertex,
    GroupMirror,
}

impl CopyMethod {
    /// Build the copier for this method.
    pub fn copier(self) -> Box<dyn WeightCopy> {
        match self {
            CopyMethod::NearestVertex => Box::new(NearestVertexCopy),
            CopyMethod::GroupMirror => Box::new(GroupMirrorCopy),
        }
    }
}

impl std::str::FromStr for CopyMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest_vertex" | "nearest" => Ok(CopyMethod::NearestVertex),
            "group_mirror" | "mirror" => Ok(CopyMethod::GroupMirror),
            other => Err(format!("unknown copy method: {}", other)),
        }
    }
}

/// Nearest-vertex weight copy.
///
/// Each target vertex takes the influences of the closest source vertex.
/// Source positions go into a [`PointIndex`] once per target, so a copy costs
/// about `M log M + N log M` for `M` source and `N` target vertices.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestVertexCopy;

impl NearestVertexCopy {
    fn positions(mesh: &MeshAsset) -> TransferResult<&[Vec3]> {
        let positions = mesh
            .positions
            .as_deref()
            .ok_or_else(|| TransferError::MissingPositions {
                mesh: mesh.name.clone(),
            })?;

        if positions.len() != mesh.vertex_count {
            return Err(TransferError::VertexCountMismatch {
                mesh: mesh.name.clone(),
                declared: mesh.vertex_count,
                found: positions.len(),
            });
        }

        Ok(positions)
    }
}

impl WeightCopy for NearestVertexCopy {
    fn name(&self) -> &str {
        "nearest_vertex"
    }

    fn copy_weights(&mut self, source: &MeshAsset, target: &mut MeshAsset) -> TransferResult<()> {
        let mut groups: Vec<WeightGroup> = source
            .weight_groups
            .iter()
            .map(|g| WeightGroup::new(g.name.clone()))
            .collect();

        if target.vertex_count > 0 {
            let src_positions = Self::positions(source)?;
            let dst_positions = Self::positions(target)?;

            if src_positions.is_empty() {
                return Err(TransferError::MissingPositions {
                    mesh: source.name.clone(),
                });
            }

            let index = PointIndex::new(src_positions);
            let lookup: Vec<HashMap<u32, f32>> = source
                .weight_groups
                .iter()
                .map(|g| g.weights.iter().copied().collect())
                .collect();

            for (vertex, position) in dst_positions.iter().enumerate() {
                let Some(nearest) = index.nearest(*position) else {
                    continue;
                };

                for (group, weights) in groups.iter_mut().zip(&lookup) {
                    if let Some(&w) = weights.get(&(nearest as u32)) {
                        group.weights.push((vertex as u32, w));
                    }
                }
            }
        }

        target.weight_groups = groups;
        Ok(())
    }
}

/// Group-name-only weight copy.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupMirrorCopy;

impl WeightCopy for GroupMirrorCopy {
    fn name(&self) -> &str {
        "group_mirror"
    }

    fn copy_weights(&mut self, source: &MeshAsset, target: &mut MeshAsset) -> TransferResult<()> {
        target.weight_groups = source
            .weight_groups
            .iter()
            .map(|g| WeightGroup::new(g.name.clone()))
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> MeshAsset {
        MeshAsset::from_positions(
            "Body",
            vec![Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, 0.0)],
        )
        .with_group(WeightGroup {
            name: "Hips".to_string(),
            weights: vec![(0, 1.0), (1, 0.5)],
        })
        .with_group(WeightGroup {
            name: "Spine".to_string(),
            weights: vec![(1, 0.5), (2, 1.0)],
        })
    }

    #[test]
    fn test_nearest_vertex_copies_influences() {
        let source = body();
        let mut target = MeshAsset::from_positions(
            "Shirt",
            vec![Vec3::new(0.1, 0.1, 0.0), Vec3::new(0.0, 1.9, 0.1)],
        );

        NearestVertexCopy.copy_weights(&source, &mut target).unwrap();

        assert_eq!(target.group_count(), 2);
        let hips = target.group("Hips").unwrap();
        let spine = target.group("Spine").unwrap();
        assert_eq!(hips.weights, vec![(0, 1.0)]);
        assert_eq!(spine.weights, vec![(1, 1.0)]);
    }

    #[test]
    fn test_nearest_vertex_on_dense_mesh() {
        let source = MeshAsset::from_positions(
            "Body",
            (0..40).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
        )
        .with_group(WeightGroup {
            name: "Spine".to_string(),
            weights: (0..40).map(|i| (i, i as f32 / 40.0)).collect(),
        });
        let mut target = MeshAsset::from_positions(
            "Cape",
            (0..40).rev().map(|i| Vec3::new(i as f32 + 0.2, 0.3, 0.0)).collect(),
        );

        NearestVertexCopy.copy_weights(&source, &mut target).unwrap();

        let spine = target.group("Spine").unwrap();
        assert_eq!(spine.weights.len(), 40);
        assert_eq!(spine.weight(0), Some(39.0 / 40.0));
        assert_eq!(spine.weight(39), Some(0.0));
    }

    #[test]
    fn test_nearest_vertex_requires_positions() {
        let source = body();
        let mut target = MeshAsset::new("Shirt", 12);

        let err = NearestVertexCopy.copy_weights(&source, &mut target).unwrap_err();
        assert_eq!(
            err,
            TransferError::MissingPositions {
                mesh: "Shirt".to_string()
            }
        );
        assert!(target.weight_groups.is_empty());
    }

    #[test]
    fn test_nearest_vertex_rejects_count_mismatch() {
        let source = body();
        let mut target = MeshAsset::from_positions("Shirt", vec![Vec3::ZERO]);
        target.vertex_count = 4;

        let err = NearestVertexCopy.copy_weights(&source, &mut target).unwrap_err();
        assert!(matches!(err, TransferError::VertexCountMismatch { found: 1, .. }));
    }

    #[test]
    fn test_empty_target_gets_group_names() {
        let source = MeshAsset::new("Body", 100).with_group_names(["Hips"]);
        let mut target = MeshAsset::new("Decal", 0);

        NearestVertexCopy.copy_weights(&source, &mut target).unwrap();
        assert_eq!(target.group_count(), 1);
        assert!(target.weight_groups[0].weights.is_empty());
    }

    #[test]
    fn test_group_mirror() {
        let source = body();
        let mut target = MeshAsset::new("Shirt", 12);

        GroupMirrorCopy.copy_weights(&source, &mut target).unwrap();

        let names: Vec<&str> = target.weight_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Hips", "Spine"]);
    }

    #[test]
    fn test_copy_method_parse() {
        assert_eq!("nearest".parse::<CopyMethod>(), Ok(CopyMethod::NearestVertex));
        assert_eq!("group_mirror".parse::<CopyMethod>(), Ok(CopyMethod::GroupMirror));
        assert!("poly_interp".parse::<CopyMethod>().is_err());
        assert_eq!(CopyMethod::GroupMirror.copier().name(), "group_mirror");
    }
}
