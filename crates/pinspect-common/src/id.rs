//! Process and thread identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Process ID wrapper with display formatting.
///
/// Always positive; construct through [`ProcessId::parse`] or [`FromStr`]
/// when the value comes from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Parse a PID from user input.
    ///
    /// Accepts only a non-empty run of ASCII digits whose value is in
    /// `1..=u32::MAX`. Signs, whitespace, and zero are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match s.parse::<u32>() {
            Ok(0) | Err(_) => None,
            Ok(pid) => Some(ProcessId(pid)),
        }
    }

    /// The PID of the calling process.
    pub fn current() -> Self {
        ProcessId(std::process::id())
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProcessId {
    fn from(pid: u32) -> Self {
        ProcessId(pid)
    }
}

impl FromStr for ProcessId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessId::parse(s).ok_or_else(|| Error::InvalidPid(s.to_string()))
    }
}

/// Thread ID (kernel task ID).
///
/// For the main thread of a process this equals the process ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u32);

impl ThreadId {
    /// Whether this thread is the thread-group leader of `pid`.
    pub fn is_main_thread_of(&self, pid: ProcessId) -> bool {
        self.0 == pid.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ThreadId {
    fn from(tid: u32) -> Self {
        ThreadId(tid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_pid() {
        assert_eq!(ProcessId::parse("1"), Some(ProcessId(1)));
        assert_eq!(ProcessId::parse("4194304"), Some(ProcessId(4194304)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ProcessId::parse(""), None);
        assert_eq!(ProcessId::parse("0"), None);
        assert_eq!(ProcessId::parse("-5"), None);
        assert_eq!(ProcessId::parse("+5"), None);
        assert_eq!(ProcessId::parse("12a"), None);
        assert_eq!(ProcessId::parse(" 12"), None);
        assert_eq!(ProcessId::parse("99999999999999999999"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "abc".parse::<ProcessId>().unwrap_err();
        assert!(matches!(err, Error::InvalidPid(ref s) if s == "abc"));
    }

    #[test]
    fn test_main_thread() {
        assert!(ThreadId(42).is_main_thread_of(ProcessId(42)));
        assert!(!ThreadId(43).is_main_thread_of(ProcessId(42)));
    }

    #[test]
    fn test_serde_transparent() {
        assert_eq!(serde_json::to_string(&ProcessId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&ThreadId(8)).unwrap(), "8");
    }
}
