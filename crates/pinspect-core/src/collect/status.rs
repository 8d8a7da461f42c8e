//! Parser for `/proc/[pid]/status`.

use super::paths::ProcPaths;
use super::types::{comm_from_bytes, trim_ascii, ProcessState};
use pinspect_common::{Error, ProcessId, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Summary of a process from its status file.
///
/// Zombies and kernel threads have no `Vm*` lines; those fields stay 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcStatus {
    pub pid: ProcessId,
    /// Command name: the kernel's raw bytes (at most 15) decoded lossily.
    pub name: String,
    pub state: ProcessState,
    pub uid_real: u32,
    pub uid_effective: u32,
    pub gid_real: u32,
    pub gid_effective: u32,
    /// Virtual memory size (kB).
    pub vm_size_kb: u64,
    /// Resident set size (kB).
    pub vm_rss_kb: u64,
    /// Peak virtual memory size (kB).
    pub vm_peak_kb: u64,
    pub thread_count: u32,
}

impl ProcStatus {
    /// A status with every field unset.
    pub fn empty(pid: ProcessId) -> Self {
        Self {
            pid,
            name: String::new(),
            state: ProcessState::Unknown,
            uid_real: 0,
            uid_effective: 0,
            gid_real: 0,
            gid_effective: 0,
            vm_size_kb: 0,
            vm_rss_kb: 0,
            vm_peak_kb: 0,
            thread_count: 0,
        }
    }
}

/// Read and parse `/proc/[pid]/status`.
///
/// The file is read as bytes: the `Name:` line carries the task name
/// unescaped and need not be UTF-8.
///
/// # Errors
/// [`Error::ProcessNotFound`] if the process does not exist or exited,
/// [`Error::PermissionDenied`] if the file is not readable.
pub fn read_proc_status(paths: &ProcPaths, pid: ProcessId) -> Result<ProcStatus> {
    let content =
        fs::read(paths.pid_file(pid, "status")).map_err(|e| Error::from_proc_io(pid.0, e))?;
    Ok(parse_status_content(pid, &content))
}

/// Parse status file content (for testing).
///
/// Unknown keys and unparsable values are ignored.
pub fn parse_status_content(pid: ProcessId, content: &[u8]) -> ProcStatus {
    let mut status = ProcStatus::empty(pid);

    for line in content.split(|&b| b == b'\n') {
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            continue;
        };
        let (key, value) = (&line[..colon], &line[colon + 1..]);

        match key {
            b"Name" => status.name = comm_from_bytes(trim_ascii(value)),
            b"State" => status.state = ProcessState::from_status_value(value),
            _ => {
                if let Ok(value) = std::str::from_utf8(value) {
                    apply_numeric_field(&mut status, key, value);
                }
            }
        }
    }

    status
}

fn apply_numeric_field(status: &mut ProcStatus, key: &[u8], value: &str) {
    match key {
        b"Uid" => {
            if let Some((real, effective)) = parse_id_pair(value) {
                status.uid_real = real;
                status.uid_effective = effective;
            }
        }
        b"Gid" => {
            if let Some((real, effective)) = parse_id_pair(value) {
                status.gid_real = real;
                status.gid_effective = effective;
            }
        }
        b"VmSize" => status.vm_size_kb = parse_kb(value).unwrap_or(0),
        b"VmRSS" => status.vm_rss_kb = parse_kb(value).unwrap_or(0),
        b"VmPeak" => status.vm_peak_kb = parse_kb(value).unwrap_or(0),
        b"Threads" => status.thread_count = value.trim().parse().unwrap_or(0),
        _ => {}
    }
}

/// First two whitespace-separated ids (real, effective).
fn parse_id_pair(value: &str) -> Option<(u32, u32)> {
    let mut ids = value.split_whitespace();
    let real = ids.next()?.parse().ok()?;
    let effective = ids.next()?.parse().ok()?;
    Some((real, effective))
}

/// `"  10240 kB"` -> 10240
fn parse_kb(value: &str) -> Option<u64> {
    value.split_whitespace().next()?.parse().ok()
}
