//! pinspect core library.
//!
//! Reads one Linux process's kernel-exported state from procfs:
//! - Open file descriptors and their targets
//! - Threads with their names and run states
//! - The status summary (identity, credentials, memory)
//! - TCP and UDP connections owned by the process
//!
//! The binary entry point is in `main.rs`.

pub mod collect;
pub mod config;
pub mod exit_codes;
pub mod inspect;
pub mod logging;
pub mod output;

// Fake proc trees for unit and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use collect::{
    enumerate_fds, enumerate_threads, find_process_sockets, parse_net_table, read_proc_status,
    ProcPaths,
};
pub use pinspect_common::{Error, ErrorCategory, ProcessId, Result, ThreadId};
