//! Paths into the proc filesystem.
//!
//! Every collector resolves its files through [`ProcPaths`] so that the whole
//! engine can be pointed at a fake tree in tests.

use pinspect_common::{ProcessId, ThreadId};
use std::path::{Path, PathBuf};

/// Default mount point of procfs.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Builds paths to per-process, per-thread and network pseudo-files.
///
/// Does not check that any path exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcPaths {
    root: PathBuf,
}

impl Default for ProcPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcPaths {
    /// Resolve paths below `root` instead of `/proc`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<pid>`
    pub fn pid_dir(&self, pid: ProcessId) -> PathBuf {
        self.root.join(pid.0.to_string())
    }

    /// `<root>/<pid>/<file>`
    pub fn pid_file(&self, pid: ProcessId, file: &str) -> PathBuf {
        self.pid_dir(pid).join(file)
    }

    /// `<root>/<pid>/fd`
    pub fn fd_dir(&self, pid: ProcessId) -> PathBuf {
        self.pid_file(pid, "fd")
    }

    /// `<root>/<pid>/task`
    pub fn task_dir(&self, pid: ProcessId) -> PathBuf {
        self.pid_file(pid, "task")
    }

    /// `<root>/<pid>/task/<tid>/<file>`
    pub fn task_file(&self, pid: ProcessId, tid: ThreadId, file: &str) -> PathBuf {
        self.task_dir(pid).join(tid.0.to_string()).join(file)
    }

    /// `<root>/net/tcp`
    pub fn net_tcp(&self) -> PathBuf {
        self.root.join("net").join("tcp")
    }

    /// `<root>/net/udp`
    pub fn net_udp(&self) -> PathBuf {
        self.root.join("net").join("udp")
    }
}

/// Whether a directory entry name is a decimal number (an fd or tid).
///
/// Rejects the empty string, `.` and `..`, and anything with a non-digit.
pub(crate) fn is_numeric_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}
