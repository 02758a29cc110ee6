//! Rigging readiness checks.
//!
//! A mesh is ready when it has weight groups, an armature modifier, and a
//! skeleton parent. Unmet criteria are always reported in that order.

use std::fmt;

use serde::Serialize;

use crate::mesh::MeshAsset;
use crate::scene::Scene;

/// A readiness criterion a mesh failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ReadinessIssue {
    #[serde(rename = "no vertex groups")]
    NoVertexGroups,

    #[serde(rename = "no armature modifier")]
    NoArmatureModifier,

    #[serde(rename = "not parented to armature")]
    NotParentedToArmature,
}

impl ReadinessIssue {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessIssue::NoVertexGroups => "no vertex groups",
            ReadinessIssue::NoArmatureModifier => "no armature modifier",
            ReadinessIssue::NotParentedToArmature => "not parented to armature",
        }
    }
}

impl fmt::Display for ReadinessIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mesh that is not ready, with what it is missing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MeshIssues {
    pub mesh: String,
    pub issues: Vec<ReadinessIssue>,
}

impl MeshIssues {
    /// Issues joined for log output, e.g. `no vertex groups, no armature modifier`.
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|i| i.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Readiness summary over a set of meshes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    /// Meshes meeting every criterion
    pub ready: usize,

    /// Meshes checked
    pub total: usize,

    /// Meshes that are not ready, in input order
    pub not_ready: Vec<MeshIssues>,
}

impl ReadinessReport {
    /// Check if every mesh is ready.
    pub fn all_ready(&self) -> bool {
        self.ready == self.total
    }

    /// Issues recorded for a mesh (None if it is ready or unknown).
    pub fn issues_for(&self, mesh: &str) -> Option<&[ReadinessIssue]> {
        self.not_ready
            .iter()
            .find(|entry| entry.mesh == mesh)
            .map(|entry| entry.issues.as_slice())
    }
}

fn check<F>(meshes: &[MeshAsset], parent_ok: F) -> ReadinessReport
where
    F: Fn(&MeshAsset) -> bool,
{
    let mut report = ReadinessReport {
        total: meshes.len(),
        ..Default::default()
    };

    for mesh in meshes {
        let mut issues = Vec::new();
        if !mesh.has_weight_groups() {
            issues.push(ReadinessIssue::NoVertexGroups);
        }
        if !mesh.has_armature_modifier() {
            issues.push(ReadinessIssue::NoArmatureModifier);
        }
        if !parent_ok(mesh) {
            issues.push(ReadinessIssue::NotParentedToArmature);
        }

        if issues.is_empty() {
            report.ready += 1;
        } else {
            report.not_ready.push(MeshIssues {
                mesh: mesh.name.clone(),
                issues,
            });
        }
    }

    report
}

/// Check every mesh for readiness.
pub fn verify_readiness(meshes: &[MeshAsset]) -> ReadinessReport {
    check(meshes, MeshAsset::is_parented_to_skeleton)
}

/// Check a scene's meshes, also requiring the parent skeleton to exist in the scene.
pub fn verify_scene(scene: &Scene) -> ReadinessReport {
    check(&scene.meshes, |mesh| {
        mesh.parent_skeleton()
            .map_or(false, |name| scene.skeleton(name).is_some())
    })
}
