//! Scene file support.
//!
//! Scenes are exchanged as JSON documents describing skeletons (bones with
//! parent links and constraints) and meshes (vertex data, weight groups,
//! modifiers and parenting). The loader validates the document and builds
//! the scene graph; the exporter writes a mutated scene back out.
//!
//! ## Not Supported
//!
//! - Binary interchange formats (FBX, glTF binary)
//! - Bone rest transforms and animation
//! - Materials and textures

mod loader;
mod types;

pub use loader::*;
pub use types::*;
