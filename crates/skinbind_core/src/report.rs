//! Reporting for pipeline results.
//!
//! The pipeline returns plain data; this module renders it through the
//! `log` facade and collects it into a [`JobReport`] that can be written
//! next to the exported scene.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::io::ExportInfo;
use crate::pipeline::{PruneRun, TransferRun};
use crate::transfer::TransferOutcome;
use crate::verify::ReadinessReport;

/// Log a prune result.
pub fn log_prune(run: &PruneRun) {
    log::info!("=== PRUNE: {} ===", run.skeleton);
    log::info!(
        "Root '{}' hierarchy: {} bones{}",
        run.root_bone,
        run.retention.reachable_count,
        if run.retention.root_found { "" } else { " (root not found)" }
    );
    log::info!("Retention set: {} names", run.retention.len());
    log::debug!("Retained: {:?}", run.retention.names);
    log::info!("Removed {} bones: {:?}", run.removed.len(), run.removed);
    log::info!("Remaining bones: {}", run.retained_count);

    if !run.orphans.is_empty() {
        log::warn!(
            "{} retained bones lost their parent: {:?}",
            run.orphans.len(),
            run.orphans
        );
    }
}

/// Log a transfer result, including readiness.
pub fn log_transfer(run: &TransferRun) {
    log::info!("=== WEIGHT TRANSFER SUMMARY ===");
    log::info!("Source: {}", run.source());
    log::info!("Armature: {}", run.skeleton);
    log::info!("Targets: {:?}", run.roles.targets);
    if !run.roles.already_rigged.is_empty() {
        log::info!("Already rigged: {:?}", run.roles.already_rigged);
    }

    log::info!(
        "Successful transfers: {}/{}",
        run.success_count(),
        run.outcomes.len()
    );
    for outcome in run.outcomes.iter().filter(|o| !o.success) {
        log::warn!(
            "  - {}: {}",
            outcome.mesh,
            outcome.message.as_deref().unwrap_or("failed")
        );
    }

    log_readiness(&run.readiness);
}

/// Log a readiness report.
pub fn log_readiness(report: &ReadinessReport) {
    log::info!("=== VERIFYING RIGGING ===");
    log::info!("Readiness: {}/{} meshes ready", report.ready, report.total);
    for entry in &report.not_ready {
        log::warn!("  {}: {}", entry.mesh, entry.summary());
    }
}

/// Everything a job did, for writing to disk.
#[derive(Clone, Debug, Default, Serialize)]
pub struct JobReport {
    pub input: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_bytes: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune: Option<PruneRun>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferRun>,

    /// Outcomes of a batch in which every transfer failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_transfers: Vec<TransferOutcome>,

    /// Whether the job is considered successful
    pub success: bool,
}

impl JobReport {
    /// Start a report for an input file.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Record the export result.
    pub fn with_export(mut self, info: &ExportInfo) -> Self {
        self.output = Some(info.path.clone());
        self.output_bytes = Some(info.bytes);
        self
    }

    /// Write the report as pretty JSON.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Wrote report to {}", path.as_ref().display());
        Ok(())
    }
}
