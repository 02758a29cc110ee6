//! Console and file logging for a run.
//!
//! Records always go to stderr. With a log directory, each run also gets its
//! own `<prefix>_<YYYYmmdd_HHMMSS>.log` file receiving the same records.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Path of a run's log file.
pub fn log_file_path(dir: &Path, prefix: &str, started: DateTime<Local>) -> PathBuf {
    dir.join(format!("{}_{}.log", prefix, started.format("%Y%m%d_%H%M%S")))
}

/// Create the log directory if needed and a new log file in it.
pub fn create_log_file(dir: &Path, prefix: &str) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(dir)?;
    let path = log_file_path(dir, prefix, Local::now());
    let file = File::create(&path)?;
    Ok((path, file))
}

/// Writer that copies everything to stderr and a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Send a builder's output to stderr and `file`.
fn tee_to(builder: &mut Builder, file: File) {
    builder.target(Target::Pipe(Box::new(Tee { file })));
}

/// Install the global logger.
///
/// `RUST_LOG` overrides `level`. Returns the log file path when a directory
/// is given.
pub fn init(level: LevelFilter, log_dir: Option<&Path>, prefix: &str) -> Result<Option<PathBuf>> {
    let mut builder = Builder::new();
    builder.filter_level(level).parse_default_env();

    let log_path = match log_dir {
        Some(dir) => {
            let (path, file) = create_log_file(dir, prefix)
                .with_context(|| format!("Failed to create log file in {}", dir.display()))?;
            tee_to(&mut builder, file);
            Some(path)
        }
        None => None,
    };

    builder.init();
    if let Some(path) = &log_path {
        log::info!("Log file: {}", path.display());
    }
    Ok(log_path)
}
