//! Thread enumeration from `/proc/[pid]/task/`.
//!
//! Every thread of the thread group has a numeric subdirectory holding a
//! one-line `comm` file and a `status` file with a `State:` line. Both are read
//! as bytes, since task names are not guaranteed to be UTF-8. Threads that
//! exit mid-scan keep their slot with a placeholder name and `Unknown` state.

use super::paths::{is_numeric_name, ProcPaths};
use super::types::{comm_from_bytes, try_push, ProcessState};
use crate::logging::event_names;
use pinspect_common::{Error, ProcessId, Result, ThreadId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader};

/// Name reported for a thread whose `comm` could not be read.
pub const UNKNOWN_THREAD_NAME: &str = "???";

/// One thread of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEntry {
    /// Kernel task ID.
    pub tid: ThreadId,
    /// Thread name (at most 15 raw bytes, decoded lossily).
    pub name: String,
    /// Run state.
    pub state: ProcessState,
}

/// Enumerate the threads of `pid`.
///
/// Threads come back in kernel listing order. Fails only when the task
/// directory itself cannot be opened.
pub fn enumerate_threads(paths: &ProcPaths, pid: ProcessId) -> Result<Vec<ThreadEntry>> {
    let dir = paths.task_dir(pid);
    let entries = fs::read_dir(&dir).map_err(|e| Error::from_proc_io(pid.0, e))?;

    let mut threads = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(tid) = name
            .to_str()
            .filter(|n| is_numeric_name(n))
            .and_then(|n| n.parse::<u32>().ok())
            .map(ThreadId)
        else {
            continue;
        };

        let thread = ThreadEntry {
            tid,
            name: read_thread_name(paths, pid, tid),
            state: read_thread_state(paths, pid, tid),
        };
        try_push(&mut threads, thread, "thread")?;
    }

    tracing::debug!(
        event = event_names::TASK_ENUMERATED,
        pid = pid.0,
        count = threads.len(),
        "enumerated threads"
    );
    Ok(threads)
}

/// Read `task/<tid>/comm`, falling back to [`UNKNOWN_THREAD_NAME`].
fn read_thread_name(paths: &ProcPaths, pid: ProcessId, tid: ThreadId) -> String {
    match fs::read(paths.task_file(pid, tid, "comm")) {
        Ok(raw) => parse_comm_content(&raw),
        Err(err) => {
            tracing::trace!(
                event = event_names::TASK_SKIPPED,
                pid = pid.0,
                tid = tid.0,
                error = %err,
                "thread comm unreadable"
            );
            UNKNOWN_THREAD_NAME.to_string()
        }
    }
}

/// First line of a `comm` file without its terminator, capped at 15 bytes.
pub fn parse_comm_content(content: &[u8]) -> String {
    let line = content.split(|&b| b == b'\n').next().unwrap_or_default();
    comm_from_bytes(line)
}

/// Scan `task/<tid>/status` for its `State:` line.
fn read_thread_state(paths: &ProcPaths, pid: ProcessId, tid: ThreadId) -> ProcessState {
    let Ok(file) = fs::File::open(paths.task_file(pid, tid, "status")) else {
        return ProcessState::Unknown;
    };
    parse_state_from_reader(BufReader::new(file))
}

/// Find the `State:` line in status-formatted input.
///
/// Lines are split on raw bytes, so a non-UTF-8 `Name:` line before it does
/// not matter. Stops at the first `State:` line; a missing line or a read
/// error yields `Unknown`.
pub fn parse_state_from_reader<R: BufRead>(reader: R) -> ProcessState {
    for line in reader.split(b'\n') {
        let Ok(line) = line else {
            break;
        };
        if let Some(value) = line.strip_prefix(b"State:") {
            return ProcessState::from_status_value(value);
        }
    }
    ProcessState::Unknown
}
