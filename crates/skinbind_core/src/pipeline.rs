//! End-to-end rigging workflows over a loaded scene.
//!
//! - [`run_prune`]: strip a skeleton down to a root subtree plus exceptions
//! - [`run_transfer`]: classify meshes, transfer weights to every target,
//!   and verify readiness
//!
//! Batch preconditions (a skeleton and a source mesh) are checked before the
//! scene is touched. Per-target failures are reported in the outcomes.

use serde::Serialize;
use thiserror::Error;

use crate::classify::{classify, RoleNames};
use crate::config::{PruneConfig, TransferConfig};
use crate::mesh::MeshAsset;
use crate::prune::{compute_retention_set, prune_bones, RetentionSet};
use crate::scene::Scene;
use crate::transfer::{success_count, transfer, TransferOutcome, WeightCopy};
use crate::verify::{verify_scene, ReadinessReport};

/// Errors that stop a workflow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("No skeleton found in scene")]
    NoSkeleton,

    #[error("Skeleton not found: {0}")]
    UnknownSkeleton(String),

    #[error("No mesh with vertex groups found for weight source")]
    NoSourceMesh,

    #[error("All {} weight transfers failed", .outcomes.len())]
    AllTransfersFailed { outcomes: Vec<TransferOutcome> },
}

/// Result type for workflows.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// What a prune did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PruneRun {
    /// Pruned skeleton
    pub skeleton: String,

    /// Root bone requested
    pub root_bone: String,

    /// Exception names used
    pub exceptions: Vec<String>,

    /// Computed retention set
    pub retention: RetentionSet,

    /// Removed bone names, in removal order
    pub removed: Vec<String>,

    /// Bones left in the skeleton
    pub retained_count: usize,

    /// Retained bones whose parent was removed
    pub orphans: Vec<String>,
}

/// What a weight transfer did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferRun {
    /// Skeleton targets were bound to
    pub skeleton: String,

    /// Mesh roles
    pub roles: RoleNames,

    /// One outcome per target, in target order
    pub outcomes: Vec<TransferOutcome>,

    /// Readiness of every mesh after the transfer
    pub readiness: ReadinessReport,
}

impl TransferRun {
    /// Number of successful transfers.
    pub fn success_count(&self) -> usize {
        success_count(&self.outcomes)
    }

    /// Source mesh name.
    pub fn source(&self) -> &str {
        self.roles.source.as_deref().unwrap_or_default()
    }
}

/// Pick the skeleton to work on: the named one, or the first in the scene.
fn resolve_skeleton(scene: &Scene, requested: Option<&str>) -> PipelineResult<usize> {
    if let Some(name) = requested {
        return scene
            .skeleton_index(name)
            .ok_or_else(|| PipelineError::UnknownSkeleton(name.to_string()));
    }

    match scene.skeletons.len() {
        0 => {
            log::error!("No armature found");
            Err(PipelineError::NoSkeleton)
        }
        1 => Ok(0),
        n => {
            log::warn!("Multiple armatures found ({}), using first one", n);
            for skeleton in &scene.skeletons {
                log::info!("  - {}: {} bones", skeleton.name, skeleton.len());
            }
            Ok(0)
        }
    }
}

/// Prune a skeleton in the scene.
pub fn run_prune(scene: &mut Scene, config: &PruneConfig) -> PipelineResult<PruneRun> {
    let index = resolve_skeleton(scene, config.skeleton.as_deref())?;
    let skeleton = &mut scene.skeletons[index];

    let mut exceptions = config.exceptions.clone();
    if config.keep_ik_bones {
        let ik_bones = skeleton.ik_bone_names();
        log::info!("IK bones kept: {:?}", ik_bones);
        for name in ik_bones {
            if !exceptions.contains(&name) {
                exceptions.push(name);
            }
        }
    }

    let before = skeleton.len();
    let retention = compute_retention_set(skeleton, &config.root_bone, exceptions.iter().cloned());
    let removed = prune_bones(skeleton, &retention);
    let retained_count = before - removed.len();
    let orphans = skeleton.orphans().into_iter().map(str::to_string).collect();

    Ok(PruneRun {
        skeleton: skeleton.name.clone(),
        root_bone: config.root_bone.clone(),
        exceptions,
        retention,
        removed,
        retained_count,
        orphans,
    })
}

/// Transfer weights from the scene's source mesh to every unrigged mesh.
pub fn run_transfer<C>(
    scene: &mut Scene,
    copier: &mut C,
    config: &TransferConfig,
) -> PipelineResult<TransferRun>
where
    C: WeightCopy + ?Sized,
{
    let skeleton_index = resolve_skeleton(scene, config.skeleton.as_deref())?;

    let roles = classify(&scene.meshes);
    let role_names = roles.names(&scene.meshes);
    let source_index = roles.source.ok_or_else(|| {
        log::error!("No mesh with vertex groups found for weight source!");
        PipelineError::NoSourceMesh
    })?;

    let Scene {
        skeletons, meshes, ..
    } = &mut *scene;
    let skeleton = &skeletons[skeleton_index];

    log::info!(
        "Source mesh: '{}' with {} vertex groups",
        meshes[source_index].name,
        meshes[source_index].group_count()
    );
    log::info!("Armature: '{}' with {} bones", skeleton.name, skeleton.len());

    let outcomes = if roles.targets.is_empty() {
        log::warn!("No target meshes found - all meshes already have weights");
        Vec::new()
    } else {
        let mut source = None;
        let mut targets = Vec::with_capacity(roles.targets.len());
        for (i, mesh) in meshes.iter_mut().enumerate() {
            if i == source_index {
                source = Some(mesh);
            } else if roles.targets.contains(&i) {
                targets.push(mesh);
            }
        }
        let source: &MeshAsset = source.ok_or(PipelineError::NoSourceMesh)?;

        log::info!("=== STARTING WEIGHT TRANSFER ===");
        let outcomes = transfer(copier, source, targets, skeleton);
        log::info!(
            "Successfully transferred weights to {}/{} meshes",
            success_count(&outcomes),
            outcomes.len()
        );

        if success_count(&outcomes) == 0 {
            log::error!("Weight transfer failed completely");
            return Err(PipelineError::AllTransfersFailed { outcomes });
        }
        outcomes
    };

    let readiness = verify_scene(scene);

    Ok(TransferRun {
        skeleton: scene.skeletons[skeleton_index].name.clone(),
        roles: role_names,
        outcomes,
        readiness,
    })
}
