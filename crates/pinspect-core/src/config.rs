//! Run configuration.
//!
//! The only setting is the proc root. Resolution order:
//! 1. `--proc-root` on the command line
//! 2. `PINSPECT_PROC_ROOT`
//! 3. `/proc`

use crate::collect::{ProcPaths, DEFAULT_PROC_ROOT};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate proc root.
pub const ENV_PROC_ROOT: &str = "PINSPECT_PROC_ROOT";

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    CliArgument,
    Environment,
    Default,
}

/// Resolved inspection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectConfig {
    pub proc_root: PathBuf,
    pub source: ConfigSource,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            source: ConfigSource::Default,
        }
    }
}

impl InspectConfig {
    /// Resolve from the CLI value and the process environment.
    pub fn from_env(cli_proc_root: Option<&Path>) -> Self {
        Self::resolve(cli_proc_root, std::env::var_os(ENV_PROC_ROOT).map(PathBuf::from))
    }

    /// Resolve from explicit values.
    ///
    /// Empty paths are treated as unset.
    pub fn resolve(cli_proc_root: Option<&Path>, env_proc_root: Option<PathBuf>) -> Self {
        if let Some(path) = cli_proc_root.filter(|p| !p.as_os_str().is_empty()) {
            return Self {
                proc_root: path.to_path_buf(),
                source: ConfigSource::CliArgument,
            };
        }

        if let Some(path) = env_proc_root.filter(|p| !p.as_os_str().is_empty()) {
            return Self {
                proc_root: path,
                source: ConfigSource::Environment,
            };
        }

        Self::default()
    }

    /// Paths for every collector.
    pub fn paths(&self) -> ProcPaths {
        ProcPaths::new(&self.proc_root)
    }
}
