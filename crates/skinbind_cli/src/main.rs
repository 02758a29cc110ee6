mod logging;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use skinbind_core::config::JobConfig;
use skinbind_core::io::{load_scene, save_scene};
use skinbind_core::pipeline::{run_prune, run_transfer, PipelineError};
use skinbind_core::report::{self, JobReport};
use skinbind_core::transfer::CopyMethod;
use skinbind_core::{classify, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "skinbind",
    version = VERSION,
    about = "Skeleton pruning and skin weight transfer"
)]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write the log to a timestamped file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove every bone outside a root subtree
    Prune(PruneArgs),
    /// Transfer weights from the body mesh to unrigged meshes
    Transfer(TransferArgs),
    /// Print skeletons, meshes and mesh roles of a scene
    Inspect { input: PathBuf },
}

#[derive(Args, Debug)]
struct PruneArgs {
    input: PathBuf,
    output: PathBuf,
    /// Bone whose subtree is kept
    #[arg(long)]
    root: Option<String>,
    /// Extra bone to keep (repeatable)
    #[arg(long = "keep")]
    keep: Vec<String>,
    /// Do not keep IK-constrained bones
    #[arg(long)]
    no_ik: bool,
    /// Skeleton to prune
    #[arg(long)]
    skeleton: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TransferArgs {
    input: PathBuf,
    output: PathBuf,
    /// Skeleton to bind to
    #[arg(long)]
    skeleton: Option<String>,
    /// Weight-copy method (nearest_vertex, group_mirror)
    #[arg(long)]
    method: Option<CopyMethod>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON report
    #[arg(long)]
    report: Option<PathBuf>,
    /// Fail unless every mesh is ready after the transfer
    #[arg(long)]
    strict: bool,
}

impl Command {
    fn config(&self) -> Option<&Path> {
        match self {
            Command::Prune(args) => args.config.as_deref(),
            Command::Transfer(args) => args.config.as_deref(),
            Command::Inspect { .. } => None,
        }
    }

    fn log_prefix(&self) -> &'static str {
        match self {
            Command::Prune(_) => "prune",
            Command::Transfer(_) => "weight_transfer",
            Command::Inspect { .. } => "inspect",
        }
    }
}

/// Merge command-line flags over a loaded config.
///
/// Flags that are given replace config values; `--keep` adds to the
/// configured exceptions.
fn apply_overrides(job: &mut JobConfig, cli: &Cli) {
    if let Some(dir) = &cli.log_dir {
        job.log_dir = Some(dir.clone());
    }

    match &cli.cmd {
        Command::Prune(args) => {
            if let Some(root) = &args.root {
                job.prune.root_bone = root.clone();
            }
            if args.skeleton.is_some() {
                job.prune.skeleton = args.skeleton.clone();
            }
            if args.no_ik {
                job.prune.keep_ik_bones = false;
            }
            for name in &args.keep {
                if !job.prune.exceptions.contains(name) {
                    job.prune.exceptions.push(name.clone());
                }
            }
        }
        Command::Transfer(args) => {
            if args.skeleton.is_some() {
                job.transfer.skeleton = args.skeleton.clone();
            }
            if let Some(method) = args.method {
                job.transfer.method = method;
            }
            if args.strict {
                job.transfer.require_all_ready = true;
            }
        }
        Command::Inspect { .. } => {}
    }
}

fn write_report(path: Option<&Path>, report: &JobReport) -> Result<()> {
    if let Some(path) = path {
        report
            .write(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }
    Ok(())
}

fn prune(args: &PruneArgs, job: &JobConfig) -> Result<()> {
    log::info!("=== SKELETON PRUNE ===");
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    let mut scene = load_scene(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let run = run_prune(&mut scene, &job.prune)?;
    report::log_prune(&run);

    let info = save_scene(&scene, &args.output, &job.export)
        .with_context(|| format!("Failed to export {}", args.output.display()))?;

    let mut job_report = JobReport::new(&args.input).with_export(&info);
    job_report.prune = Some(run);
    job_report.success = true;
    write_report(args.report.as_deref(), &job_report)?;

    log::info!("=== PROCESSING COMPLETED SUCCESSFULLY ===");
    Ok(())
}

fn transfer(args: &TransferArgs, job: &JobConfig) -> Result<()> {
    log::info!("=== WEIGHT TRANSFER ===");
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    let mut scene = load_scene(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let mut copier = job.transfer.method.copier();

    let run = match run_transfer(&mut scene, copier.as_mut(), &job.transfer) {
        Ok(run) => run,
        Err(PipelineError::AllTransfersFailed { outcomes }) => {
            for outcome in &outcomes {
                log::error!(
                    "  - {}: {}",
                    outcome.mesh,
                    outcome.message.as_deref().unwrap_or("failed")
                );
            }
            let count = outcomes.len();
            let mut job_report = JobReport::new(&args.input);
            job_report.failed_transfers = outcomes;
            write_report(args.report.as_deref(), &job_report)?;
            bail!("All {} weight transfers failed", count);
        }
        Err(e) => return Err(e.into()),
    };
    report::log_transfer(&run);

    let ready = run.readiness.all_ready();
    let info = save_scene(&scene, &args.output, &job.export)
        .with_context(|| format!("Failed to export {}", args.output.display()))?;

    let mut job_report = JobReport::new(&args.input).with_export(&info);
    job_report.success = ready || !job.transfer.require_all_ready;
    let readiness = (run.readiness.ready, run.readiness.total);
    job_report.transfer = Some(run);
    write_report(args.report.as_deref(), &job_report)?;

    if !job_report.success {
        bail!("Only {}/{} meshes are ready", readiness.0, readiness.1);
    }
    if !ready {
        log::warn!(
            "Note: {} meshes may have import issues (see log)",
            readiness.1 - readiness.0
        );
    }
    log::info!("=== PROCESSING COMPLETED SUCCESSFULLY ===");
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let scene =
        load_scene(input).with_context(|| format!("Failed to load {}", input.display()))?;

    println!("Scene: {}", scene.name);
    for skeleton in &scene.skeletons {
        println!("Skeleton '{}': {} bones", skeleton.name, skeleton.len());
        println!("  roots: {:?}", skeleton.roots());
        let ik = skeleton.ik_bone_names();
        if !ik.is_empty() {
            println!("  IK bones: {:?}", ik);
        }
    }
    for mesh in &scene.meshes {
        println!(
            "Mesh '{}': {} vertices, {} vertex groups, armature modifier: {}, parent: {:?}",
            mesh.name,
            mesh.vertex_count,
            mesh.group_count(),
            mesh.has_armature_modifier(),
            mesh.parent
        );
    }

    let roles = classify(&scene.meshes).names(&scene.meshes);
    println!("Source: {}", roles.source.as_deref().unwrap_or("(none)"));
    println!("Targets: {:?}", roles.targets);
    println!("Already rigged: {:?}", roles.already_rigged);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut job = JobConfig::load_or_default(cli.cmd.config()).context("Failed to load config")?;
    apply_overrides(&mut job, &cli);

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init(level, job.log_dir.as_deref(), cli.cmd.log_prefix())?;

    match &cli.cmd {
        Command::Prune(args) => prune(args, &job),
        Command::Transfer(args) => transfer(args, &job),
        Command::Inspect { input } => inspect(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinbind_core::config::PruneConfig;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("skinbind").chain(args.iter().copied())).unwrap()
    }

    fn configured() -> JobConfig {
        JobConfig {
            prune: PruneConfig {
                root_bone: "Hips".to_string(),
                exceptions: vec!["Prop_R".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_prune_flags_override_config() {
        let cli = parse(&[
            "prune", "in.json", "out.json", "--root", "Root", "--keep", "Prop_L", "--keep",
            "Prop_R", "--no-ik", "--skeleton", "Rig", "--log-dir", "logs",
        ]);
        let mut job = configured();

        apply_overrides(&mut job, &cli);

        assert_eq!(job.prune.root_bone, "Root");
        assert_eq!(job.prune.exceptions, vec!["Prop_R", "Prop_L"]);
        assert!(!job.prune.keep_ik_bones);
        assert_eq!(job.prune.skeleton.as_deref(), Some("Rig"));
        assert_eq!(job.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(cli.cmd.log_prefix(), "prune");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = parse(&["prune", "in.json", "out.json"]);
        let mut job = configured();
        job.log_dir = Some(PathBuf::from("job_logs"));

        apply_overrides(&mut job, &cli);

        assert_eq!(job.prune.root_bone, "Hips");
        assert_eq!(job.prune.exceptions, vec!["Prop_R"]);
        assert!(job.prune.keep_ik_bones);
        assert_eq!(job.log_dir, Some(PathBuf::from("job_logs")));
    }

    #[test]
    fn test_transfer_flags_override_config() {
        let cli = parse(&[
            "transfer",
            "in.json",
            "out.json",
            "--method",
            "group_mirror",
            "--strict",
            "--config",
            "job.json",
        ]);
        let mut job = JobConfig::default();

        apply_overrides(&mut job, &cli);

        assert_eq!(job.transfer.method, CopyMethod::GroupMirror);
        assert!(job.transfer.require_all_ready);
        assert!(job.transfer.skeleton.is_none());
        assert_eq!(cli.cmd.config(), Some(Path::new("job.json")));
        assert_eq!(cli.cmd.log_prefix(), "weight_transfer");
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let result = Cli::try_parse_from(["skinbind", "transfer", "a", "b", "--method", "magic"]);
        assert!(result.is_err());
    }
}
