//! skinbind core - skeleton pruning and skin weight transfer for character assets.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `Skeleton`, `Bone`, `MeshAsset`
//! - **Pruning**: keep a root subtree plus an exception set of bones
//! - **Weight transfer**: classify meshes, copy weights from the most
//!   rigged mesh onto unrigged ones, bind them to the skeleton
//! - **Verification**: check every mesh is ready to deform
//! - **Scene files**: JSON scene loading and export
//!
//! # Example
//!
//! ```ignore
//! use skinbind_core::io::{load_scene, save_scene};
//! use skinbind_core::pipeline::run_transfer;
//! use skinbind_core::transfer::NearestVertexCopy;
//!
//! let mut scene = load_scene("character.json")?;
//! let run = run_transfer(&mut scene, &mut NearestVertexCopy, &Default::default())?;
//! println!("{}/{} meshes ready", run.readiness.ready, run.readiness.total);
//! save_scene(&scene, "character_rigged.json", &Default::default())?;
//! ```

pub mod classify;
pub mod config;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod prune;
pub mod report;
pub mod scene;
pub mod skeleton;
pub mod transfer;
pub mod verify;

// Re-export commonly used types
pub use classify::{classify, MeshRoles};
pub use config::JobConfig;
pub use io::{load_scene, load_scene_from_str, save_scene};
pub use mesh::{MeshAsset, Modifier, ParentRef, WeightGroup};
pub use pipeline::{run_prune, run_transfer, PipelineError};
pub use prune::{compute_retention_set, prune_bones, RetentionSet};
pub use scene::Scene;
pub use skeleton::{Bone, BoneConstraint, Skeleton};
pub use transfer::{transfer, TransferOutcome, WeightCopy};
pub use verify::{verify_readiness, ReadinessReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
