//! On-disk scene records.
//!
//! These types mirror the JSON scene description one-to-one. The loader
//! validates them and converts them to scene graph types.

use serde::{Deserialize, Serialize};

use crate::mesh::{Modifier, ParentRef, WeightGroup};
use crate::skeleton::BoneConstraint;

/// Axis identifiers for bone orientation on export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoneAxis {
    #[serde(rename = "X")]
    X,
    #[serde(rename = "Y")]
    Y,
    #[serde(rename = "Z")]
    Z,
    #[serde(rename = "-X")]
    NegX,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "-Z")]
    NegZ,
}

/// Scene object categories an export can include.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Armature,
    Mesh,
}

/// Normal smoothing written for meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeshSmoothing {
    #[default]
    Face,
    Edge,
    Off,
}

/// Node type written for the armature object itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmatureNodeType {
    #[default]
    Null,
    Root,
    LimbNode,
}

/// Export options, tuned by default for game-engine import.
///
/// `global_scale` and `object_types` shape the written scene. The other
/// options are recorded in the file's `export` block for the engine-side
/// importer and do not change the scene data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Uniform scale applied to vertex positions
    pub global_scale: f32,

    /// Apply the scene unit scale (importer hint)
    pub apply_unit_scale: bool,

    /// Convert to the engine's axis convention (importer hint)
    pub use_space_transform: bool,

    /// Bone primary axis (importer hint)
    pub primary_bone_axis: BoneAxis,

    /// Bone secondary axis (importer hint)
    pub secondary_bone_axis: BoneAxis,

    /// Append leaf bones at chain ends (importer hint)
    pub add_leaf_bones: bool,

    /// Node type of the armature object (importer hint)
    pub armature_nodetype: ArmatureNodeType,

    /// Object categories to write
    pub object_types: Vec<ObjectType>,

    /// Normal smoothing mode (importer hint)
    pub mesh_smooth_type: MeshSmoothing,

    /// Pretty-print the output file
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            global_scale: 1.0,
            apply_unit_scale: true,
            use_space_transform: true,
            primary_bone_axis: BoneAxis::Y,
            secondary_bone_axis: BoneAxis::X,
            add_leaf_bones: true,
            armature_nodetype: ArmatureNodeType::Null,
            object_types: vec![ObjectType::Armature, ObjectType::Mesh],
            mesh_smooth_type: MeshSmoothing::Face,
            pretty: true,
        }
    }
}

impl ExportSettings {
    /// Check if an object category is exported.
    pub fn includes(&self, kind: ObjectType) -> bool {
        self.object_types.contains(&kind)
    }
}

/// A whole scene file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneFile {
    /// Scene name (defaults to the file stem)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub skeletons: Vec<SkeletonRecord>,

    #[serde(default)]
    pub meshes: Vec<MeshRecord>,

    /// Settings the file was exported with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportSettings>,
}

/// A skeleton as stored on disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SkeletonRecord {
    pub name: String,

    #[serde(default)]
    pub bones: Vec<BoneRecord>,
}

/// A bone as stored on disk. Children are derived from parent links.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoneRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<BoneConstraint>,
}

/// A mesh as stored on disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeshRecord {
    pub name: String,

    /// Vertex count (defaults to the number of positions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<[f32; 3]>>,

    #[serde(default)]
    pub weight_groups: Vec<WeightGroup>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
}
