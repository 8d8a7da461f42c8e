//! Socket correlation: join a process's socket descriptors to the connection
//! tables by inode.

use super::fd::{enumerate_fds, socket_inodes, FdEntry};
use super::network::{parse_net_table, NetworkConnection, Protocol};
use super::paths::ProcPaths;
use crate::logging::event_names;
use pinspect_common::{Error, ProcessId, Result};

/// Find the TCP and UDP connections owned by `pid`.
///
/// Enumerates the fd directory once and correlates the snapshot. TCP rows
/// come first, then UDP, each in table order.
///
/// # Errors
/// Descriptor enumeration failures are returned unchanged
/// ([`Error::ProcessNotFound`], [`Error::PermissionDenied`]); a table that
/// cannot be read fails with [`Error::NetTable`].
pub fn find_process_sockets(paths: &ProcPaths, pid: ProcessId) -> Result<Vec<NetworkConnection>> {
    let fds = enumerate_fds(paths, pid)?;
    let sockets = correlate(&fds, paths)?;

    tracing::debug!(
        event = event_names::SOCKETS_CORRELATED,
        pid = pid.0,
        fds = fds.len(),
        sockets = sockets.len(),
        "correlated sockets"
    );
    Ok(sockets)
}

/// Join an fd snapshot against the connection tables under `paths`.
///
/// With no socket descriptors in the snapshot neither table is opened.
pub fn correlate(fds: &[FdEntry], paths: &ProcPaths) -> Result<Vec<NetworkConnection>> {
    let inodes = socket_inodes(fds);
    if inodes.is_empty() {
        return Ok(Vec::new());
    }

    let mut sockets = parse_net_table(&paths.net_tcp(), Protocol::Tcp, &inodes)?;
    let udp = parse_net_table(&paths.net_udp(), Protocol::Udp, &inodes)?;

    sockets
        .try_reserve(udp.len())
        .map_err(|e| Error::ResourceExhausted(format!("connection list: {e}")))?;
    sockets.extend(udp);
    Ok(sockets)
}
