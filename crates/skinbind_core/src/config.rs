//! Job configuration.
//!
//! A job config is a JSON file; every field has a default, so an empty
//! object is a valid config. Command-line flags override loaded values.
//!
//! ```json
//! {
//!   "prune": { "root_bone": "Root", "keep_ik_bones": true, "exceptions": ["Prop_R"] },
//!   "transfer": { "method": "nearest_vertex", "require_all_ready": false },
//!   "export": { "global_scale": 1.0, "add_leaf_bones": true },
//!   "log_dir": "logs"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::ExportSettings;
use crate::transfer::CopyMethod;

/// Errors that can occur while loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Skeleton pruning options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Skeleton to prune (defaults to the first one in the scene)
    pub skeleton: Option<String>,

    /// Bone whose subtree is kept
    pub root_bone: String,

    /// Keep every bone carrying an IK constraint
    pub keep_ik_bones: bool,

    /// Extra bone names to keep
    pub exceptions: Vec<String>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            skeleton: None,
            root_bone: "Root".to_string(),
            keep_ik_bones: true,
            exceptions: Vec::new(),
        }
    }
}

/// Weight transfer options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Skeleton to bind targets to (defaults to the first one in the scene)
    pub skeleton: Option<String>,

    /// Weight-copy method
    pub method: CopyMethod,

    /// Treat any not-ready mesh after the transfer as a job failure
    pub require_all_ready: bool,
}

/// A complete job configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub prune: PruneConfig,
    pub transfer: TransferConfig,
    pub export: ExportSettings,

    /// Directory for timestamped run logs (console only when unset)
    pub log_dir: Option<PathBuf>,
}

impl JobConfig {
    /// Load a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a config file if a path is given, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BoneAxis, ObjectType};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = JobConfig::from_json_str("{}").unwrap();

        assert_eq!(config, JobConfig::default());
        assert_eq!(config.prune.root_bone, "Root");
        assert!(config.prune.keep_ik_bones);
        assert_eq!(config.transfer.method, CopyMethod::NearestVertex);
        assert_eq!(config.export.global_scale, 1.0);
        assert_eq!(config.export.primary_bone_axis, BoneAxis::Y);
        assert!(config.export.includes(ObjectType::Armature));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = JobConfig::from_json_str(
            r#"{
                "prune": { "root_bone": "Hips", "exceptions": ["IK_Hand_L"] },
                "transfer": { "method": "group_mirror", "skeleton": "Rig" },
                "export": { "secondary_bone_axis": "-Z", "object_types": ["MESH"] },
                "log_dir": "logs"
            }"#,
        )
        .unwrap();

        assert_eq!(config.prune.root_bone, "Hips");
        assert!(config.prune.keep_ik_bones);
        assert_eq!(config.prune.exceptions, vec!["IK_Hand_L"]);
        assert_eq!(config.transfer.method, CopyMethod::GroupMirror);
        assert_eq!(config.transfer.skeleton.as_deref(), Some("Rig"));
        assert_eq!(config.export.secondary_bone_axis, BoneAxis::NegZ);
        assert!(!config.export.includes(ObjectType::Armature));
        assert!(config.export.add_leaf_bones);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_invalid_config() {
        let err = JobConfig::from_json_str(r#"{ "transfer": { "method": "magic" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(&path, r#"{ "prune": { "keep_ik_bones": false } }"#).unwrap();

        let config = JobConfig::load_or_default(Some(&path)).unwrap();
        assert!(!config.prune.keep_ik_bones);

        let missing = JobConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        assert_eq!(
            JobConfig::load_or_default(None::<&Path>).unwrap(),
            JobConfig::default()
        );
    }
}
