//! pinspect: inspect a Linux process through /proc.

use clap::Parser;
use pinspect_common::{format_error_human, Error, ErrorReport, OutputFormat, ProcessId};
use pinspect_core::config::InspectConfig;
use pinspect_core::exit_codes::ExitCode;
use pinspect_core::inspect::{inspect, InspectOptions};
use pinspect_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use pinspect_core::output::write_report;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Inspect Linux process information via the /proc filesystem.
#[derive(Parser, Debug)]
#[command(name = "pinspect")]
#[command(version, about)]
#[command(after_help = "Examples:
  pinspect 1234                  Inspect process 1234
  pinspect -v $$                 Inspect the current shell (verbose)
  pinspect -n $(pgrep firefox)   Show Firefox network connections")]
struct Cli {
    /// Process ID to inspect
    pid: String,

    /// Show detailed descriptor, thread and connection tables
    #[arg(short, long)]
    verbose: bool,

    /// Show network connections only
    #[arg(short, long)]
    network: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Read process data from this directory instead of /proc
    /// (default: $PINSPECT_PROC_ROOT, then /proc)
    #[arg(long, value_name = "DIR")]
    proc_root: Option<PathBuf>,

    /// Suppress all log output
    #[arg(short, long)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            return code.into();
        }
    };

    let log_level = cli.quiet.then_some(LogLevel::Off);
    init_logging(&LogConfig::from_env(log_level, cli.log_format));

    run(&cli).into()
}

fn run(cli: &Cli) -> ExitCode {
    let pid = match cli.pid.parse::<ProcessId>() {
        Ok(pid) => pid,
        Err(err) => return fail(&err, cli.format),
    };

    let config = InspectConfig::from_env(cli.proc_root.as_deref());
    let options = InspectOptions {
        network_only: cli.network,
        // The human report only shows threads in verbose mode.
        threads: cli.verbose || cli.format == OutputFormat::Json,
    };

    let report = match inspect(&config.paths(), pid, options) {
        Ok(report) => report,
        Err(err) => return fail(&err, cli.format),
    };

    let mut stdout = std::io::stdout().lock();
    match write_report(&mut stdout, &report, cli.format, cli.verbose) {
        Ok(()) => ExitCode::Clean,
        Err(err) => fail(&err, cli.format),
    }
}

/// Report `err` on stderr and pick the exit code.
fn fail(err: &Error, format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Json => {
            let report = ErrorReport::from(err);
            match serde_json::to_string(&report) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("pinspect: {err}"),
            }
        }
        OutputFormat::Human => {
            eprintln!("{}", format_error_human(err, std::io::stderr().is_terminal()));
        }
    }
    ExitCode::for_error(err)
}
