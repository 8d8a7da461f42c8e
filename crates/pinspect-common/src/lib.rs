//! pinspect common types, IDs, and errors.
//!
//! This crate provides foundational types shared by the collectors and the
//! command-line front end:
//! - Process and thread identity newtypes
//! - The unified error taxonomy
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, ErrorReport, Result};
pub use id::{ProcessId, ThreadId};
pub use output::OutputFormat;
