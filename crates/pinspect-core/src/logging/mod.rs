//! Structured logging for pinspect.
//!
//! Two output modes, both on stderr so stdout stays reserved for the report:
//! - Human-readable console lines for interactive use
//! - JSON lines for scripted runs
//!
//! Collectors emit events with a stable `event` field taken from
//! [`event_names`]; counts at `debug`, per-entry skips at `trace`.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Standard event names used in logging.
pub mod event_names {
    // Descriptors
    pub const FD_ENUMERATED: &str = "fd.enumerated";
    pub const FD_SKIPPED: &str = "fd.skipped";

    // Threads
    pub const TASK_ENUMERATED: &str = "task.enumerated";
    pub const TASK_SKIPPED: &str = "task.skipped";

    // Connection tables
    pub const NET_TABLE_PARSED: &str = "net.table_parsed";
    pub const NET_ROW_SKIPPED: &str = "net.row_skipped";
    pub const SOCKETS_CORRELATED: &str = "net.correlated";

    // Inspection run
    pub const INSPECT_STARTED: &str = "inspect.started";
    pub const INSPECT_SECTION_FAILED: &str = "inspect.section_failed";
    pub const INSPECT_FINISHED: &str = "inspect.finished";
}

/// Build the env filter for `config`.
///
/// An explicit `RUST_LOG` directive wins; otherwise only this crate logs, at
/// the configured level.
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pinspect_core={}", config.level)))
}

/// Initialize the logging subsystem.
///
/// Installs a global subscriber once. Later calls (e.g. from several tests in
/// one binary) are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    let installed = match config.format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if installed.is_err() {
        tracing::trace!("logging already initialized");
    }
}
