//! Process inspection over procfs.
//!
//! This module reads one process's kernel-exported state:
//! - Open descriptors from `fd/`
//! - Threads from `task/`
//! - The summary in `status`
//! - TCP and UDP connections, joined to descriptors by socket inode
//!
//! Every reader takes a [`ProcPaths`] so tests can point it at a fake tree.

mod correlate;
mod fd;
pub mod network;
mod paths;
mod status;
mod task;
mod types;

pub use correlate::{correlate, find_process_sockets};
pub use fd::{enumerate_fds, parse_socket_inode, socket_inodes, FdEntry, FdKind};
pub use network::{
    decode_addr_port, decode_ipv4, encode_addr_port, parse_net_row, parse_net_table,
    parse_net_table_content, NetworkConnection, Protocol, TcpState,
};
pub use paths::{ProcPaths, DEFAULT_PROC_ROOT};
pub use status::{parse_status_content, read_proc_status, ProcStatus};
pub use task::{
    enumerate_threads, parse_comm_content, parse_state_from_reader, ThreadEntry,
    UNKNOWN_THREAD_NAME,
};
pub use types::{ProcessState, TASK_COMM_MAX};
