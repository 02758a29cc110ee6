//! Scene loading and export.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glam::Vec3;
use thiserror::Error;

use crate::io::types::{
    BoneRecord, ExportSettings, MeshRecord, ObjectType, SceneFile, SkeletonRecord,
};
use crate::mesh::MeshAsset;
use crate::scene::Scene;
use crate::skeleton::{Skeleton, SkeletonError};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Skeleton '{skeleton}': {source}")]
    Skeleton {
        skeleton: String,
        #[source]
        source: SkeletonError,
    },

    #[error("Duplicate skeleton name: {0}")]
    DuplicateSkeleton(String),

    #[error("Duplicate mesh name: {0}")]
    DuplicateMesh(String),

    #[error("Mesh '{mesh}' declares {declared} vertices but has {positions} positions")]
    VertexCountMismatch {
        mesh: String,
        declared: usize,
        positions: usize,
    },

    #[error("Mesh '{mesh}' has duplicate weight group: {group}")]
    DuplicateWeightGroup { mesh: String, group: String },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur during scene export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportInfo {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Load a scene description file.
///
/// # Example
///
/// ```ignore
/// use skinbind_core::io::load_scene;
///
/// let scene = load_scene("character.json")?;
/// println!("Loaded {} meshes", scene.mesh_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    load_scene_from_str(&content, name)
}

/// Load a scene from a JSON string (useful for testing).
pub fn load_scene_from_str(content: &str, name: &str) -> LoadResult<Scene> {
    let file: SceneFile = serde_json::from_str(content)?;
    build_scene(file, name)
}

/// Convert parsed records into a scene.
pub fn build_scene(file: SceneFile, default_name: &str) -> LoadResult<Scene> {
    let mut scene = Scene::new(file.name.unwrap_or_else(|| default_name.to_string()));

    for record in file.skeletons {
        if scene.skeleton(&record.name).is_some() {
            return Err(LoadError::DuplicateSkeleton(record.name));
        }
        let skeleton = build_skeleton(record)?;
        scene.add_skeleton(skeleton);
    }

    let mut mesh_names = HashSet::new();
    for record in file.meshes {
        if !mesh_names.insert(record.name.clone()) {
            return Err(LoadError::DuplicateMesh(record.name));
        }
        scene.add_mesh(build_mesh(record)?);
    }

    log::info!(
        "Loaded scene '{}': {} skeletons ({} bones), {} meshes",
        scene.name,
        scene.skeleton_count(),
        scene.total_bone_count(),
        scene.mesh_count()
    );

    Ok(scene)
}

/// Build a skeleton, accepting bones listed before their parents.
///
/// Bones are added in file order; a bone whose parent has not been added yet
/// is deferred and retried after the others.
fn build_skeleton(record: SkeletonRecord) -> LoadResult<Skeleton> {
    let mut skeleton = Skeleton::new(record.name);
    let mut pending: Vec<BoneRecord> = record.bones;

    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();

        for bone in pending {
            let parent_ready = bone
                .parent
                .as_deref()
                .map_or(true, |parent| skeleton.contains(parent));
            if !parent_ready {
                deferred.push(bone);
                continue;
            }

            skeleton
                .add_bone(bone.name.clone(), bone.parent.as_deref())
                .map_err(|source| LoadError::Skeleton {
                    skeleton: skeleton.name.clone(),
                    source,
                })?;
            for constraint in bone.constraints {
                skeleton.add_constraint(&bone.name, constraint);
            }
        }

        if deferred.len() == before {
            // No progress: the first remaining parent is missing (or part of a cycle).
            let bone = &deferred[0];
            return Err(LoadError::Skeleton {
                skeleton: skeleton.name.clone(),
                source: SkeletonError::UnknownParent {
                    bone: bone.name.clone(),
                    parent: bone.parent.clone().unwrap_or_default(),
                },
            });
        }
        pending = deferred;
    }

    log::debug!("Skeleton '{}': {} bones", skeleton.name, skeleton.len());
    Ok(skeleton)
}

fn build_mesh(record: MeshRecord) -> LoadResult<MeshAsset> {
    let positions: Option<Vec<Vec3>> = record
        .positions
        .map(|points| points.into_iter().map(Vec3::from_array).collect());

    let vertex_count = match (&positions, record.vertex_count) {
        (Some(points), Some(declared)) if points.len() != declared => {
            return Err(LoadError::VertexCountMismatch {
                mesh: record.name,
                declared,
                positions: points.len(),
            });
        }
        (_, Some(declared)) => declared,
        (Some(points), None) => points.len(),
        (None, None) => 0,
    };

    {
        let mut group_names = HashSet::new();
        for group in &record.weight_groups {
            if !group_names.insert(group.name.as_str()) {
                return Err(LoadError::DuplicateWeightGroup {
                    mesh: record.name.clone(),
                    group: group.name.clone(),
                });
            }
        }
    }

    log::debug!(
        "Mesh '{}': {} vertices, {} weight groups",
        record.name,
        vertex_count,
        record.weight_groups.len()
    );

    Ok(MeshAsset {
        name: record.name,
        vertex_count,
        positions,
        weight_groups: record.weight_groups,
        modifiers: record.modifiers,
        parent: record.parent,
    })
}

/// Convert a scene back into file records.
pub fn scene_to_file(scene: &Scene, settings: &ExportSettings) -> SceneFile {
    let skeletons = if settings.includes(ObjectType::Armature) {
        scene
            .skeletons
            .iter()
            .map(|skeleton| SkeletonRecord {
                name: skeleton.name.clone(),
                bones: skeleton
                    .bones()
                    .map(|bone| {
                        // Dangling parent links (left by pruning) are written as roots.
                        let parent = bone
                            .parent
                            .clone()
                            .filter(|parent| skeleton.contains(parent));
                        if parent.is_none() && bone.parent.is_some() {
                            log::warn!(
                                "Bone '{}' lost its parent '{}', exporting it as a root",
                                bone.name,
                                bone.parent.as_deref().unwrap_or_default()
                            );
                        }
                        BoneRecord {
                            name: bone.name.clone(),
                            parent,
                            constraints: bone.constraints.clone(),
                        }
                    })
                    .collect(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let meshes = if settings.includes(ObjectType::Mesh) {
        scene
            .meshes
            .iter()
            .map(|mesh| MeshRecord {
                name: mesh.name.clone(),
                vertex_count: Some(mesh.vertex_count),
                positions: mesh.positions.as_ref().map(|points| {
                    points
                        .iter()
                        .map(|p| (*p * settings.global_scale).to_array())
                        .collect()
                }),
                weight_groups: mesh.weight_groups.clone(),
                modifiers: mesh.modifiers.clone(),
                parent: mesh.parent.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    SceneFile {
        name: Some(scene.name.clone()),
        skeletons,
        meshes,
        export: Some(settings.clone()),
    }
}

/// Write a scene to disk.
pub fn save_scene<P: AsRef<Path>>(
    scene: &Scene,
    path: P,
    settings: &ExportSettings,
) -> ExportResult<ExportInfo> {
    let path = path.as_ref();
    let file = scene_to_file(scene, settings);

    let json = if settings.pretty {
        serde_json::to_string_pretty(&file)?
    } else {
        serde_json::to_string(&file)?
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, json)?;

    let bytes = std::fs::metadata(path)?.len();
    log::info!("Exported scene to {} ({} bytes)", path.display(), bytes);

    Ok(ExportInfo {
        path: path.to_path_buf(),
        bytes,
    })
}
