//! Weight transfer batch.
//!
//! Each target is processed to completion before the next one starts:
//! clear its groups, copy weights from the source, bind it to the skeleton,
//! then record an outcome. A failing target is recorded and skipped; it
//! never aborts the batch.
//!
//! # Example
//!
//! ```ignore
//! use skinbind_core::transfer::{transfer, success_count, NearestVertexCopy};
//!
//! let outcomes = transfer(&mut NearestVertexCopy, &body, targets, &skeleton);
//! println!("{}/{} succeeded", success_count(&outcomes), outcomes.len());
//! ```

mod copy;
mod nearest;

pub use copy::*;
pub use nearest::PointIndex;

use serde::Serialize;

use crate::mesh::MeshAsset;
use crate::skeleton::Skeleton;

/// Message recorded when a copy succeeds but yields no groups.
pub const NO_GROUPS_TRANSFERRED: &str = "no vertex groups transferred";

/// Result of one target's transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    /// Target mesh name
    pub mesh: String,

    /// Whether the target ended up with weight groups and a binding
    pub success: bool,

    /// Weight groups on the target after the transfer
    pub group_count: usize,

    /// Diagnostic for warnings and failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TransferOutcome {
    fn succeeded(mesh: &MeshAsset) -> Self {
        Self {
            mesh: mesh.name.clone(),
            success: true,
            group_count: mesh.group_count(),
            message: None,
        }
    }

    fn failed(mesh: &MeshAsset, message: impl Into<String>) -> Self {
        Self {
            mesh: mesh.name.clone(),
            success: false,
            group_count: mesh.group_count(),
            message: Some(message.into()),
        }
    }
}

/// Count successful outcomes.
pub fn success_count(outcomes: &[TransferOutcome]) -> usize {
    outcomes.iter().filter(|o| o.success).count()
}

/// Copy and bind a single target. Errors are per-target.
fn transfer_one<C: WeightCopy + ?Sized>(
    copier: &mut C,
    source: &MeshAsset,
    target: &mut MeshAsset,
    skeleton: &Skeleton,
) -> TransferResult<()> {
    target.clear_weight_groups();

    log::debug!("  Copying weights with {}...", copier.name());
    copier.copy_weights(source, target)?;

    log::debug!("  Binding to skeleton '{}'...", skeleton.name);
    if target.bind_to_skeleton(&skeleton.name) {
        log::debug!("  Added armature modifier");
    }

    let unmatched = target
        .weight_groups
        .iter()
        .filter(|g| !skeleton.contains(&g.name))
        .count();
    if unmatched > 0 {
        log::debug!(
            "  {} of {} groups have no matching bone",
            unmatched,
            target.group_count()
        );
    }

    Ok(())
}

/// Transfer weights from `source` to every target, in order.
///
/// Returns one outcome per target, in the same order as `targets`.
pub fn transfer<'a, C, I>(
    copier: &mut C,
    source: &MeshAsset,
    targets: I,
    skeleton: &Skeleton,
) -> Vec<TransferOutcome>
where
    C: WeightCopy + ?Sized,
    I: IntoIterator<Item = &'a mut MeshAsset>,
{
    let targets: Vec<&mut MeshAsset> = targets.into_iter().collect();
    let total = targets.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, target) in targets.into_iter().enumerate() {
        log::info!("Processing mesh {}/{}: {}", i + 1, total, target.name);

        let outcome = match transfer_one(copier, source, target, skeleton) {
            Ok(()) if target.has_weight_groups() => {
                log::info!("  Transferred {} vertex groups", target.group_count());
                TransferOutcome::succeeded(target)
            }
            Ok(()) => {
                log::warn!("  No vertex groups transferred to {}", target.name);
                TransferOutcome::failed(target, NO_GROUPS_TRANSFERRED)
            }
            Err(e) => {
                log::error!("  Failed to transfer weights to {}: {}", target.name, e);
                TransferOutcome::failed(target, e.to_string())
            }
        };

        outcomes.push(outcome);
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Modifier, ParentRef};

    /// Copier that fails for selected targets and records call order.
    struct ScriptedCopy {
        fail_on: Vec<&'static str>,
        calls: Vec<String>,
    }

    impl ScriptedCopy {
        fn failing(fail_on: Vec<&'static str>) -> Self {
            Self {
                fail_on,
                calls: Vec::new(),
            }
        }
    }

    impl WeightCopy for ScriptedCopy {
        fn name(&self) -> &str {
            "scripted"
        }

        fn copy_weights(
            &mut self,
            source: &MeshAsset,
            target: &mut MeshAsset,
        ) -> TransferResult<()> {
            self.calls.push(target.name.clone());
            if self.fail_on.iter().any(|name| *name == target.name) {
                return Err(TransferError::Host(format!("no surface near {}", target.name)));
            }
            GroupMirrorCopy.copy_weights(source, target)
        }
    }

    fn skeleton() -> Skeleton {
        let mut skeleton = Skeleton::new("Armature");
        skeleton.add_bone("Root", None).unwrap();
        for name in ["Hips", "Spine", "Chest", "LegL", "LegR"] {
            skeleton.add_bone(name, Some("Root")).unwrap();
        }
        skeleton
    }

    fn body() -> MeshAsset {
        MeshAsset::new("Body", 1000).with_group_names(["Hips", "Spine", "Chest", "LegL", "LegR"])
    }

    #[test]
    fn test_partial_failure_does_not_abort() {
        let source = body();
        let skeleton = skeleton();
        let mut shirt = MeshAsset::new("Shirt", 400);
        let mut pants = MeshAsset::new("Pants", 300);
        let mut copier = ScriptedCopy::failing(vec!["Pants"]);

        let outcomes = transfer(&mut copier, &source, [&mut shirt, &mut pants], &skeleton);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].mesh, "Shirt");
        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].group_count, 5);
        assert_eq!(outcomes[0].message, None);

        assert_eq!(outcomes[1].mesh, "Pants");
        assert!(!outcomes[1].success);
        assert_eq!(
            outcomes[1].message.as_deref(),
            Some("Weight copy failed: no surface near Pants")
        );
        assert_eq!(success_count(&outcomes), 1);
        assert_eq!(copier.calls, vec!["Shirt", "Pants"]);

        assert_eq!(shirt.parent, Some(ParentRef::Skeleton("Armature".to_string())));
        assert!(shirt.has_armature_modifier());
        assert!(!pants.has_weight_groups());
        assert!(!pants.has_armature_modifier());
    }

    #[test]
    fn test_outcome_order_matches_targets() {
        let source = body();
        let skeleton = skeleton();
        let mut meshes: Vec<MeshAsset> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| MeshAsset::new(*n, 10))
            .collect();
        let mut copier = ScriptedCopy::failing(vec!["A", "C"]);

        let outcomes = transfer(&mut copier, &source, meshes.iter_mut(), &skeleton);

        let names: Vec<&str> = outcomes.iter().map(|o| o.mesh.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        let flags: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn test_existing_groups_are_cleared() {
        let source = body();
        let skeleton = skeleton();
        let mut target = MeshAsset::new("Shirt", 10).with_group_names(["Stale"]);

        let outcomes = transfer(&mut GroupMirrorCopy, &source, [&mut target], &skeleton);

        assert!(outcomes[0].success);
        assert!(target.group("Stale").is_none());
        assert_eq!(target.group_count(), 5);
    }

    #[test]
    fn test_bind_does_not_duplicate_modifier() {
        let source = body();
        let skeleton = skeleton();
        let mut target = MeshAsset::new("Shirt", 10);
        target.modifiers.push(Modifier::Armature {
            skeleton: "Armature".to_string(),
            use_vertex_groups: true,
        });

        transfer(&mut GroupMirrorCopy, &source, [&mut target], &skeleton);

        assert_eq!(target.modifiers.len(), 1);
        assert!(target.is_parented_to_skeleton());
    }

    #[test]
    fn test_empty_copy_is_a_warning_outcome() {
        let source = MeshAsset::new("Body", 10);
        let skeleton = skeleton();
        let mut target = MeshAsset::new("Shirt", 10);

        let outcomes = transfer(&mut GroupMirrorCopy, &source, [&mut target], &skeleton);

        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].group_count, 0);
        assert_eq!(outcomes[0].message.as_deref(), Some(NO_GROUPS_TRANSFERRED));
        // Binding still happened; only the weights are missing.
        assert!(target.has_armature_modifier());
    }

    #[test]
    fn test_empty_batch() {
        let source = body();
        let outcomes = transfer(
            &mut GroupMirrorCopy,
            &source,
            Vec::<&mut MeshAsset>::new(),
            &skeleton(),
        );
        assert!(outcomes.is_empty());
        assert_eq!(success_count(&outcomes), 0);
    }
}
