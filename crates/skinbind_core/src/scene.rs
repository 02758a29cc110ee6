//! Scene container for rigging jobs.
//!
//! A scene holds the skeletons and meshes handed over by the loader. The
//! pipeline mutates them in place and the exporter writes them back out.

use crate::mesh::MeshAsset;
use crate::skeleton::Skeleton;

/// A loaded character scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Skeletons, in load order
    pub skeletons: Vec<Skeleton>,

    /// Mesh objects, in load order
    pub meshes: Vec<MeshAsset>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a skeleton to the scene and return its index.
    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> usize {
        self.skeletons.push(skeleton);
        self.skeletons.len() - 1
    }

    /// Add a mesh to the scene and return its index.
    pub fn add_mesh(&mut self, mesh: MeshAsset) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Get a skeleton by name.
    pub fn skeleton(&self, name: &str) -> Option<&Skeleton> {
        self.skeletons.iter().find(|s| s.name == name)
    }

    /// Get a mutable skeleton by name.
    pub fn skeleton_mut(&mut self, name: &str) -> Option<&mut Skeleton> {
        self.skeletons.iter_mut().find(|s| s.name == name)
    }

    /// Index of a skeleton by name.
    pub fn skeleton_index(&self, name: &str) -> Option<usize> {
        self.skeletons.iter().position(|s| s.name == name)
    }

    /// Get a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&MeshAsset> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Get skeleton count.
    pub fn skeleton_count(&self) -> usize {
        self.skeletons.len()
    }

    /// Get mesh count.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Get total bone count across all skeletons.
    pub fn total_bone_count(&self) -> usize {
        self.skeletons.iter().map(Skeleton::len).sum()
    }

    /// Get total vertex count across all meshes.
    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count).sum()
    }
}
