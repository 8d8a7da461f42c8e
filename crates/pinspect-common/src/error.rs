//! Error types for pinspect.
//!
//! Every whole-call failure of a collector is one of these variants. Failures
//! of a single directory entry or table row never reach this type; the
//! collectors skip them in place.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - A category that mirrors the failure taxonomy (not found, permission,
//!   exhaustion, malformed input)
//! - Remediation hints for humans
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "not_found",
//!   "message": "process 4242 not found",
//!   "recoverable": false,
//!   "context": { "pid": 4242 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pinspect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid command-line input.
    Args,
    /// Target process or a required kernel path does not exist.
    NotFound,
    /// Caller lacks rights to read the target's data.
    PermissionDenied,
    /// Allocation failed while growing a result collection.
    ResourceExhausted,
    /// Kernel file content could not be read or did not have the expected shape.
    MalformedInput,
    /// Any other I/O or serialization failure.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Args => write!(f, "args"),
            ErrorCategory::NotFound => write!(f, "not_found"),
            ErrorCategory::PermissionDenied => write!(f, "permission_denied"),
            ErrorCategory::ResourceExhausted => write!(f, "resource_exhausted"),
            ErrorCategory::MalformedInput => write!(f, "malformed_input"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

impl ErrorCategory {
    /// Lowercase phrase for inline use in reports.
    pub fn short_reason(&self) -> &'static str {
        match self {
            ErrorCategory::Args => "invalid argument",
            ErrorCategory::NotFound => "process not found",
            ErrorCategory::PermissionDenied => "permission denied",
            ErrorCategory::ResourceExhausted => "out of memory",
            ErrorCategory::MalformedInput => "unreadable kernel data",
            ErrorCategory::Io => "I/O error",
        }
    }
}

/// Unified error type for pinspect.
#[derive(Error, Debug)]
pub enum Error {
    // Argument errors (10-19)
    #[error("invalid PID: {0}")]
    InvalidPid(String),

    // Process access errors (20-29)
    #[error("process {pid} not found")]
    ProcessNotFound { pid: u32 },

    #[error("permission denied accessing process {pid}")]
    PermissionDenied { pid: u32 },

    // Resource errors (30-39)
    #[error("out of memory: {0}")]
    ResourceExhausted(String),

    // Input errors (40-49)
    #[error("cannot read connection table {}: {source}", .path.display())]
    NetTable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Map an I/O error raised while opening a per-process path.
    ///
    /// `ENOENT` means the process is gone and `EACCES`/`EPERM` mean it belongs
    /// to someone else; everything else stays a plain I/O error.
    pub fn from_proc_io(pid: u32, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::ProcessNotFound { pid },
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { pid },
            _ => Error::Io(err),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Argument errors
    /// - 20-29: Process access errors
    /// - 30-39: Resource errors
    /// - 40-49: Input errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidPid(_) => 10,
            Error::ProcessNotFound { .. } => 20,
            Error::PermissionDenied { .. } => 21,
            Error::ResourceExhausted(_) => 30,
            Error::NetTable { .. } => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidPid(_) => ErrorCategory::Args,
            Error::ProcessNotFound { .. } => ErrorCategory::NotFound,
            Error::PermissionDenied { .. } => ErrorCategory::PermissionDenied,
            Error::ResourceExhausted(_) => ErrorCategory::ResourceExhausted,
            Error::NetTable { .. } => ErrorCategory::MalformedInput,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether retrying (or re-running with more rights) can help.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidPid(_) => false,
            Error::ProcessNotFound { .. } => false, // Process is gone
            Error::PermissionDenied { .. } => true, // Can elevate
            Error::ResourceExhausted(_) => false,
            Error::NetTable { .. } => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidPid(_) => "Pass a positive decimal process ID, e.g. 'pinspect $$'.",
            Error::ProcessNotFound { .. } => {
                "The process does not exist or exited. Check the PID with 'ps -p <pid>'."
            }
            Error::PermissionDenied { .. } => {
                "The process belongs to another user. Re-run as that user or with elevated privileges."
            }
            Error::ResourceExhausted(_) => "The system is out of memory. Free memory and retry.",
            Error::NetTable { .. } => {
                "Check that /proc/net is mounted and readable in this namespace."
            }
            Error::Io(_) => "Check that /proc is mounted and retry.",
            Error::Json(_) => "Internal serialization failure. Report it as a bug.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidPid(_) => "Invalid Argument",
            Error::ProcessNotFound { .. } => "Process Not Found",
            Error::PermissionDenied { .. } => "Permission Denied",
            Error::ResourceExhausted(_) => "Out of Memory",
            Error::NetTable { .. } => "Connection Table Unreadable",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }

    /// Short reason used inline by the human report, e.g.
    /// `File Descriptors: Unable to read (permission denied)`.
    pub fn short_reason(&self) -> &'static str {
        self.category().short_reason()
    }
}

/// Structured error for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., pid, table path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for ErrorReport {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::ProcessNotFound { pid } | Error::PermissionDenied { pid } => {
                context.insert("pid".to_string(), serde_json::json!(pid));
            }
            Error::NetTable { path, .. } => {
                context.insert(
                    "path".to_string(),
                    serde_json::json!(path.display().to_string()),
                );
            }
            _ => {}
        }

        ErrorReport {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
