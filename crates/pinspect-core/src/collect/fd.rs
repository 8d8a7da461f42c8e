//! File descriptor enumeration from `/proc/[pid]/fd/`.
//!
//! Each entry of the fd directory is a symlink whose target names the open
//! resource: a path, `socket:[inode]`, `pipe:[inode]`, `anon_inode:[tag]`, or
//! a path with a ` (deleted)` suffix. Socket entries carry the inode that the
//! connection tables use, which is what the correlator joins on.
//!
//! The live process keeps opening and closing descriptors while we read, so a
//! descriptor that vanishes between `readdir` and `readlink` is skipped rather
//! than failing the whole enumeration.

use super::paths::{is_numeric_name, ProcPaths};
use super::types::try_push;
use crate::logging::event_names;
use pinspect_common::{Error, ProcessId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;

/// One open file descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdEntry {
    /// Descriptor number.
    pub fd: u32,
    /// Symlink target as the kernel reports it.
    pub target: String,
    /// Coarse classification of the target.
    pub kind: FdKind,
    /// Socket inode, set only for `socket:[N]` targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_inode: Option<u64>,
}

impl FdEntry {
    /// Build an entry from a descriptor number and its resolved target.
    pub fn from_target(fd: u32, target: impl Into<String>) -> Self {
        let target = target.into();
        let socket_inode = parse_socket_inode(&target);
        let kind = FdKind::classify(&target);
        Self {
            fd,
            target,
            kind,
            socket_inode,
        }
    }

    pub fn is_socket(&self) -> bool {
        self.socket_inode.is_some()
    }
}

/// Type of file descriptor target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdKind {
    /// Regular file or directory (possibly deleted).
    File,
    /// Socket (TCP, UDP, Unix, netlink, ...).
    Socket,
    /// Pipe or FIFO.
    Pipe,
    /// Character or block device.
    Device,
    /// Anonymous inode (eventfd, eventpoll, timerfd, ...).
    AnonInode,
    /// Anything else (e.g. `net:[...]`, `mnt:[...]`).
    Other,
}

impl FdKind {
    /// Categorize a descriptor by its symlink target.
    pub fn classify(target: &str) -> Self {
        if target.starts_with("socket:") {
            FdKind::Socket
        } else if target.starts_with("pipe:") {
            FdKind::Pipe
        } else if target.starts_with("anon_inode:") {
            FdKind::AnonInode
        } else if target.starts_with("/dev/") {
            FdKind::Device
        } else if target.starts_with('/') {
            FdKind::File
        } else {
            FdKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FdKind::File => "file",
            FdKind::Socket => "socket",
            FdKind::Pipe => "pipe",
            FdKind::Device => "device",
            FdKind::AnonInode => "anon",
            FdKind::Other => "other",
        }
    }
}

impl std::fmt::Display for FdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the inode from a `socket:[12345]` symlink target.
///
/// Returns `None` for every other target, including pipes and malformed
/// socket forms such as `socket:[]` or `socket:[12x]`.
pub fn parse_socket_inode(target: &str) -> Option<u64> {
    let inner = target.strip_prefix("socket:[")?.strip_suffix(']')?;
    if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    inner.parse().ok()
}

/// Collect the socket inodes of an fd snapshot.
///
/// Inode 0 is never inserted: the connection tables use 0 for sockets that
/// have no inode yet, and it must not match anything.
pub fn socket_inodes(entries: &[FdEntry]) -> HashSet<u64> {
    entries
        .iter()
        .filter_map(|e| e.socket_inode)
        .filter(|&inode| inode != 0)
        .collect()
}

/// Enumerate the open descriptors of `pid`.
///
/// Entries come back in kernel listing order. Descriptors closed while we
/// read are skipped. Fails only when the fd directory itself cannot be
/// opened: [`Error::ProcessNotFound`], [`Error::PermissionDenied`], or
/// [`Error::Io`] for anything else.
pub fn enumerate_fds(paths: &ProcPaths, pid: ProcessId) -> Result<Vec<FdEntry>> {
    let dir = paths.fd_dir(pid);
    let entries = fs::read_dir(&dir).map_err(|e| Error::from_proc_io(pid.0, e))?;

    let mut fds = Vec::new();
    let mut skipped = 0usize;

    for entry in entries {
        let Ok(entry) = entry else {
            skipped += 1;
            continue;
        };
        let name = entry.file_name();
        let Some(name) = name.to_str().filter(|n| is_numeric_name(n)) else {
            continue;
        };
        let Ok(fd) = name.parse::<u32>() else {
            continue;
        };

        let target = match fs::read_link(entry.path()) {
            Ok(target) => target,
            Err(err) => {
                // Closed between readdir and readlink.
                tracing::trace!(
                    event = event_names::FD_SKIPPED,
                    pid = pid.0,
                    fd,
                    error = %err,
                    "descriptor vanished during scan"
                );
                skipped += 1;
                continue;
            }
        };

        let entry = FdEntry::from_target(fd, target.to_string_lossy());
        try_push(&mut fds, entry, "descriptor")?;
    }

    tracing::debug!(
        event = event_names::FD_ENUMERATED,
        pid = pid.0,
        count = fds.len(),
        skipped,
        "enumerated descriptors"
    );
    Ok(fds)
}
