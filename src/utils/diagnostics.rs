//! Diagnostic logging through `tracing`.
//!
//! The chat screen owns the terminal, so interactive sessions send
//! diagnostics to a file. One-shot commands write them to stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::io::project_dirs;

/// Environment variable holding the `tracing` filter directives.
pub const LOG_FILTER_ENV: &str = "NEXUS_LOG";

const DEFAULT_FILTER: &str = "info";

pub enum DiagnosticsTarget {
    Stderr,
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Default diagnostics file inside the platform data directory.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("diagnostics.log"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(target: DiagnosticsTarget) -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let installed = match target {
        DiagnosticsTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        DiagnosticsTarget::File(path) => {
            let file = open_log_file(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    if installed.is_err() {
        tracing::debug!("diagnostics subscriber already installed");
    }
    Ok(())
}
