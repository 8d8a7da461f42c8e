//! One inspection run: read the status file, then each report section.
//!
//! The status read gates the run. Every later section is independent: a
//! section that cannot be read is recorded with its error and the rest of the
//! report is still produced.

use crate::collect::{
    correlate, enumerate_fds, enumerate_threads, read_proc_status, FdEntry, NetworkConnection,
    ProcPaths, ProcStatus, ThreadEntry,
};
use crate::logging::event_names;
use pinspect_common::{Error, ErrorCategory, ErrorReport, ProcessId, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which sections to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Collect only the network section.
    pub network_only: bool,
    /// Enumerate threads (the status file already carries the count).
    pub threads: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            network_only: false,
            threads: true,
        }
    }
}

/// Report section that can fail on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Fds,
    Threads,
    Sockets,
}

impl Section {
    /// Heading used by the human report.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Fds => "File Descriptors",
            Section::Threads => "Threads",
            Section::Sockets => "Network Connections",
        }
    }
}

/// Everything collected about one process.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub pid: ProcessId,
    pub status: ProcStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fds: Option<Vec<FdEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<ThreadEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<Vec<NetworkConnection>>,
    /// Sections that could not be read.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<Section, ErrorReport>,
}

impl InspectReport {
    /// Error recorded for `section`, if it failed.
    pub fn section_error(&self, section: Section) -> Option<&ErrorReport> {
        self.errors.get(&section)
    }

    fn record(&mut self, section: Section, err: &Error) {
        tracing::debug!(
            event = event_names::INSPECT_SECTION_FAILED,
            pid = self.pid.0,
            section = section.title(),
            error = %err,
            "section unreadable"
        );
        self.errors.insert(section, ErrorReport::from(err));
    }
}

/// Inspect `pid` under `paths`.
///
/// # Errors
/// Fails if the status file cannot be read ([`Error::ProcessNotFound`],
/// [`Error::PermissionDenied`]) or if any section runs out of memory.
/// Other section failures are recorded in [`InspectReport::errors`].
pub fn inspect(paths: &ProcPaths, pid: ProcessId, options: InspectOptions) -> Result<InspectReport> {
    tracing::debug!(event = event_names::INSPECT_STARTED, pid = pid.0, root = %paths.root().display());

    let status = read_proc_status(paths, pid)?;
    let mut report = InspectReport {
        pid,
        status,
        fds: None,
        threads: None,
        sockets: None,
        errors: BTreeMap::new(),
    };

    // Sockets are joined against one fd snapshot; if that snapshot fails the
    // socket section fails with the same error.
    match enumerate_fds(paths, pid) {
        Ok(fds) => {
            match correlate(&fds, paths) {
                Ok(sockets) => report.sockets = Some(sockets),
                Err(err) => section_failed(&mut report, Section::Sockets, err)?,
            }
            if !options.network_only {
                report.fds = Some(fds);
            }
        }
        Err(err) => {
            if !options.network_only {
                report.record(Section::Fds, &err);
            }
            section_failed(&mut report, Section::Sockets, err)?;
        }
    }

    if options.threads && !options.network_only {
        match enumerate_threads(paths, pid) {
            Ok(threads) => report.threads = Some(threads),
            Err(err) => section_failed(&mut report, Section::Threads, err)?,
        }
    }

    tracing::debug!(
        event = event_names::INSPECT_FINISHED,
        pid = pid.0,
        failed_sections = report.errors.len(),
        "inspection finished"
    );
    Ok(report)
}

/// Record a section failure, or abort the run when memory ran out.
fn section_failed(report: &mut InspectReport, section: Section, err: Error) -> Result<()> {
    if err.category() == ErrorCategory::ResourceExhausted {
        return Err(err);
    }
    report.record(section, &err);
    Ok(())
}
