//! Report rendering.
//!
//! Human output mirrors the classic layout: a process summary, then one
//! section per resource with a count line and, in verbose mode, a table.
//! JSON output is the serialized [`InspectReport`].

use crate::inspect::{InspectReport, Section};
use pinspect_common::{OutputFormat, Result};
use std::fmt::Write as _;
use std::io::Write;

/// Render `report` in `format` and write it to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &InspectReport,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    match format {
        OutputFormat::Human => out.write_all(render_human(report, verbose).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Render the human-readable report.
///
/// Sections absent from the report (e.g. descriptors in network-only mode)
/// are omitted; sections that failed print `Unable to read (<reason>)`.
pub fn render_human(report: &InspectReport, verbose: bool) -> String {
    let mut out = String::new();
    let network_only = report.fds.is_none() && report.section_error(Section::Fds).is_none();

    if !network_only {
        render_summary(&mut out, report);
        render_fds(&mut out, report, verbose);
        if verbose {
            render_threads(&mut out, report);
        }
    }
    render_sockets(&mut out, report, verbose);
    out
}

fn render_summary(out: &mut String, report: &InspectReport) {
    let status = &report.status;
    let _ = writeln!(out, "{:<10} {} (PID {})", "Process:", status.name, report.pid);
    let _ = writeln!(out, "{:<10} {}", "State:", status.state);
    let _ = writeln!(
        out,
        "{:<10} {} (real), {} (effective)",
        "UID:", status.uid_real, status.uid_effective
    );
    let _ = writeln!(
        out,
        "{:<10} {} (real), {} (effective)",
        "GID:", status.gid_real, status.gid_effective
    );
    let _ = writeln!(
        out,
        "{:<10} VmSize: {} KB, VmRSS: {} KB, VmPeak: {} KB",
        "Memory:", status.vm_size_kb, status.vm_rss_kb, status.vm_peak_kb
    );
    let _ = writeln!(out, "{:<10} {}", "Threads:", status.thread_count);
}

/// Blank separator line, except at the very start of the output.
fn section_break(out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
}

/// Write `<Title>: Unable to read (<reason>)` if `section` failed.
fn render_failure(out: &mut String, report: &InspectReport, section: Section) -> bool {
    let Some(err) = report.section_error(section) else {
        return false;
    };
    section_break(out);
    let _ = writeln!(
        out,
        "{}: Unable to read ({})",
        section.title(),
        err.category.short_reason()
    );
    true
}

fn render_fds(out: &mut String, report: &InspectReport, verbose: bool) {
    if render_failure(out, report, Section::Fds) {
        return;
    }
    let Some(fds) = &report.fds else {
        return;
    };

    section_break(out);
    let _ = writeln!(out, "File Descriptors: {} open", fds.len());
    if verbose && !fds.is_empty() {
        out.push_str("\n  FD    Type      Target\n");
        out.push_str("  ----  --------  ----------------------------------------\n");
        for entry in fds {
            let _ = writeln!(out, "  {:<4}  {:<8}  {}", entry.fd, entry.kind.as_str(), entry.target);
        }
    }
}

fn render_threads(out: &mut String, report: &InspectReport) {
    if render_failure(out, report, Section::Threads) {
        return;
    }
    let Some(threads) = &report.threads else {
        return;
    };

    section_break(out);
    out.push_str("Thread Details:\n");
    out.push_str("  TID     State       Name\n");
    out.push_str("  ------  ----------  ----------------\n");
    for thread in threads {
        let _ = writeln!(
            out,
            "  {:<6}  {:<10}  {}",
            thread.tid.0,
            thread.state.to_string(),
            thread.name
        );
    }
}

fn render_sockets(out: &mut String, report: &InspectReport, verbose: bool) {
    if render_failure(out, report, Section::Sockets) {
        return;
    }
    let Some(sockets) = &report.sockets else {
        return;
    };

    section_break(out);
    let _ = writeln!(out, "Network Connections: {} open", sockets.len());
    if verbose && !sockets.is_empty() {
        out.push_str("\n  Proto  Local Address          Remote Address         State\n");
        out.push_str("  -----  ---------------------  ---------------------  -----------\n");
        for conn in sockets {
            let _ = writeln!(
                out,
                "  {:<5}  {:<21}  {:<21}  {}",
                conn.protocol.to_string(),
                conn.local().to_string(),
                conn.remote().to_string(),
                conn.state
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::{
        FdEntry, NetworkConnection, ProcStatus, ProcessState, Protocol, TcpState, ThreadEntry,
    };
    use pinspect_common::{Error, ErrorReport, ProcessId, ThreadId};
    use std::collections::BTreeMap;
    use std::net::Ipv4Addr;

    fn sample_report() -> InspectReport {
        let mut status = ProcStatus::empty(ProcessId(1234));
        status.name = "nginx".to_string();
        status.state = ProcessState::Sleeping;
        status.uid_real = 33;
        status.uid_effective = 33;
        status.vm_size_kb = 10000;
        status.vm_rss_kb = 2048;
        status.vm_peak_kb = 10240;
        status.thread_count = 1;

        InspectReport {
            pid: ProcessId(1234),
            status,
            fds: Some(vec![
                FdEntry::from_target(0, "/dev/null"),
                FdEntry::from_target(6, "socket:[555]"),
            ]),
            threads: Some(vec![ThreadEntry {
                tid: ThreadId(1234),
                name: "nginx".to_string(),
                state: ProcessState::Sleeping,
            }]),
            sockets: Some(vec![NetworkConnection {
                protocol: Protocol::Tcp,
                local_addr: Ipv4Addr::UNSPECIFIED,
                local_port: 8080,
                remote_addr: Ipv4Addr::UNSPECIFIED,
                remote_port: 0,
                state: TcpState::Listen,
                uid: 33,
                inode: 555,
            }]),
            errors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_human_summary_counts() {
        let text = render_human(&sample_report(), false);
        assert!(text.starts_with("Process:   nginx (PID 1234)\n"));
        assert!(text.contains("State:     Sleeping\n"));
        assert!(text.contains("UID:       33 (real), 33 (effective)\n"));
        assert!(text.contains("Memory:    VmSize: 10000 KB, VmRSS: 2048 KB, VmPeak: 10240 KB\n"));
        assert!(text.contains("\nFile Descriptors: 2 open\n"));
        assert!(text.contains("\nNetwork Connections: 1 open\n"));
        assert!(!text.contains("Thread Details"));
        assert!(!text.contains("Proto"));
    }

    #[test]
    fn test_human_verbose_tables() {
        let text = render_human(&sample_report(), true);
        assert!(text.contains("  6     socket    socket:[555]\n"));
        assert!(text.contains("  1234    Sleeping    nginx\n"));
        assert!(text.contains("  TCP    0.0.0.0:8080           0.0.0.0:0              LISTEN\n"));
    }

    #[test]
    fn test_human_failed_section() {
        let mut report = sample_report();
        report.fds = None;
        report.sockets = None;
        let err = Error::PermissionDenied { pid: 1234 };
        report.errors.insert(Section::Fds, ErrorReport::from(&err));
        report.errors.insert(Section::Sockets, ErrorReport::from(&err));

        let text = render_human(&report, true);
        assert!(text.contains("File Descriptors: Unable to read (permission denied)\n"));
        assert!(text.contains("Network Connections: Unable to read (permission denied)\n"));
        assert!(text.contains("Thread Details:"));
    }

    #[test]
    fn test_human_network_only() {
        let mut report = sample_report();
        report.fds = None;
        report.threads = None;

        let text = render_human(&report, false);
        assert_eq!(text, "Network Connections: 1 open\n");
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_report(&mut buf, &sample_report(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["pid"], 1234);
        assert_eq!(value["status"]["state"], "sleeping");
        assert_eq!(value["threads"][0]["tid"], 1234);
        assert_eq!(value["sockets"][0]["local_port"], 8080);
    }
}
