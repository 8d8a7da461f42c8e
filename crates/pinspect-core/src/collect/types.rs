//! Types shared by the collectors.

use pinspect_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kernel run state of a process or thread.
///
/// Maps the single-character codes of the `State:` line in
/// `/proc/[pid]/status`:
/// - R: Running or runnable
/// - S: Interruptible sleep (waiting for event)
/// - D: Uninterruptible sleep (usually I/O)
/// - Z: Zombie (terminated but not reaped)
/// - T: Stopped (by job control)
/// - I: Idle (kernel thread)
///
/// Anything else, including a missing or unreadable state, is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskSleep,
    Zombie,
    Stopped,
    Idle,
    #[default]
    Unknown,
}

impl ProcessState {
    /// Parse process state from its single-character code.
    pub fn from_char(c: char) -> Self {
        match c {
            'R' => ProcessState::Running,
            'S' => ProcessState::Sleeping,
            'D' => ProcessState::DiskSleep,
            'Z' => ProcessState::Zombie,
            'T' => ProcessState::Stopped,
            'I' => ProcessState::Idle,
            _ => ProcessState::Unknown,
        }
    }

    /// Parse the raw value part of a `State:` line, e.g. `b"\tS (sleeping)"`.
    pub fn from_status_value(value: &[u8]) -> Self {
        value
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .map(|&b| Self::from_char(char::from(b)))
            .unwrap_or(ProcessState::Unknown)
    }

    /// Single-character code, `?` for `Unknown`.
    pub fn as_char(&self) -> char {
        match self {
            ProcessState::Running => 'R',
            ProcessState::Sleeping => 'S',
            ProcessState::DiskSleep => 'D',
            ProcessState::Zombie => 'Z',
            ProcessState::Stopped => 'T',
            ProcessState::Idle => 'I',
            ProcessState::Unknown => '?',
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcessState::Running => "Running",
            ProcessState::Sleeping => "Sleeping",
            ProcessState::DiskSleep => "Disk Sleep",
            ProcessState::Zombie => "Zombie",
            ProcessState::Stopped => "Stopped",
            ProcessState::Idle => "Idle",
            ProcessState::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Kernel limit on task names (`TASK_COMM_LEN` minus the NUL).
pub const TASK_COMM_MAX: usize = 15;

/// Decode a task name as the kernel stores it: raw bytes, no encoding.
///
/// Keeps at most [`TASK_COMM_MAX`] bytes, then replaces invalid UTF-8 with
/// U+FFFD, so the result has at most [`TASK_COMM_MAX`] chars.
pub(crate) fn comm_from_bytes(raw: &[u8]) -> String {
    let capped = &raw[..raw.len().min(TASK_COMM_MAX)];
    String::from_utf8_lossy(capped).into_owned()
}

/// `raw` without leading or trailing ASCII whitespace.
pub(crate) fn trim_ascii(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &raw[start..end]
}

/// Append to a collector's output, reporting allocation failure instead of
/// aborting. `Vec` growth is geometric, so this stays amortized O(1).
pub(crate) fn try_push<T>(out: &mut Vec<T>, item: T, what: &str) -> Result<()> {
    out.try_reserve(1).map_err(|e| {
        Error::ResourceExhausted(format!("growing {} list past {}: {}", what, out.len(), e))
    })?;
    out.push(item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char() {
        assert_eq!(ProcessState::from_char('R'), ProcessState::Running);
        assert_eq!(ProcessState::from_char('S'), ProcessState::Sleeping);
        assert_eq!(ProcessState::from_char('D'), ProcessState::DiskSleep);
        assert_eq!(ProcessState::from_char('Z'), ProcessState::Zombie);
        assert_eq!(ProcessState::from_char('T'), ProcessState::Stopped);
        assert_eq!(ProcessState::from_char('I'), ProcessState::Idle);
        assert_eq!(ProcessState::from_char('X'), ProcessState::Unknown);
        assert_eq!(ProcessState::from_char('r'), ProcessState::Unknown);
    }

    #[test]
    fn test_from_status_value() {
        assert_eq!(
            ProcessState::from_status_value(b"\tS (sleeping)"),
            ProcessState::Sleeping
        );
        assert_eq!(
            ProcessState::from_status_value(b"  R (running)"),
            ProcessState::Running
        );
        assert_eq!(ProcessState::from_status_value(b""), ProcessState::Unknown);
        assert_eq!(ProcessState::from_status_value(b"   "), ProcessState::Unknown);
        assert_eq!(ProcessState::from_status_value(b"\t\xffS"), ProcessState::Unknown);
    }

    #[test]
    fn test_char_round_trip() {
        for c in ['R', 'S', 'D', 'Z', 'T', 'I'] {
            assert_eq!(ProcessState::from_char(c).as_char(), c);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ProcessState::DiskSleep.to_string(), "Disk Sleep");
        assert_eq!(ProcessState::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_comm_from_bytes() {
        assert_eq!(comm_from_bytes(b"bash"), "bash");
        assert_eq!(comm_from_bytes(b"exactly15bytes!"), "exactly15bytes!");
        assert_eq!(comm_from_bytes(b"a-much-longer-thread-name"), "a-much-longer-t");
        assert_eq!(comm_from_bytes("café".as_bytes()), "café");
    }

    #[test]
    fn test_comm_from_bytes_non_utf8() {
        assert_eq!(comm_from_bytes(b"w\xffx"), "w\u{FFFD}x");
        assert_eq!(comm_from_bytes(b"w\xff\xfeorker"), "w\u{FFFD}\u{FFFD}orker");
        // 14 ASCII bytes, then a 2-byte char cut by the 15-byte cap.
        let name = comm_from_bytes("abcdefghijklmné".as_bytes());
        assert_eq!(name, "abcdefghijklmn\u{FFFD}");
        assert!(name.chars().count() <= TASK_COMM_MAX);
    }

    #[test]
    fn test_trim_ascii() {
        assert_eq!(trim_ascii(b"\t  worker \n"), b"worker");
        assert_eq!(trim_ascii(b"Web Content"), b"Web Content");
        assert_eq!(trim_ascii(b" \t "), b"");
        assert_eq!(trim_ascii(b""), b"");
    }

    #[test]
    fn test_try_push_appends() {
        let mut v = Vec::new();
        for i in 0..100 {
            try_push(&mut v, i, "test").unwrap();
        }
        assert_eq!(v.len(), 100);
        assert_eq!(v[99], 99);
    }
}
