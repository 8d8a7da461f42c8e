//! Exit codes for the pinspect CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//! A report whose later sections failed still exits `Clean`; only the
//! status read decides the outcome.

use pinspect_common::{Error, ErrorCategory};

/// Exit codes for pinspect.
///
/// These codes are a stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report printed.
    Clean = 0,

    /// Invalid arguments (bad PID, unknown flag).
    ArgsError = 1,

    /// Process does not exist or exited.
    NotFound = 2,

    /// Permission denied reading the process.
    PermissionError = 3,

    /// Allocation failed while collecting.
    ResourceExhausted = 4,

    /// Any other I/O or output failure.
    IoError = 5,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::NotFound => "ERR_NOT_FOUND",
            ExitCode::PermissionError => "ERR_PERMISSION",
            ExitCode::ResourceExhausted => "ERR_RESOURCE",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a failed run.
    pub fn for_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Args => ExitCode::ArgsError,
            ErrorCategory::NotFound => ExitCode::NotFound,
            ErrorCategory::PermissionDenied => ExitCode::PermissionError,
            ErrorCategory::ResourceExhausted => ExitCode::ResourceExhausted,
            ErrorCategory::MalformedInput | ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
