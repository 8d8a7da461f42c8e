//! Connection tables: `/proc/net/tcp` and `/proc/net/udp`.
//!
//! Both tables share one layout: a header line, then one row per socket:
//!
//! ```text
//!   sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
//!    0: 0100007F:0035 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 12345 ...
//! ```
//!
//! Addresses are the kernel's `__be32` printed with `%08X` as a native
//! integer, so on little-endian hosts `127.0.0.1` shows up as `0100007F`.
//! Ports are printed as plain 16-bit values. Rows are joined to a process
//! through the inode column.

use super::types::try_push;
use crate::logging::event_names;
use pinspect_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::Path;

/// Minimum whitespace-separated fields a row needs (through `inode`).
const MIN_ROW_FIELDS: usize = 10;

/// Transport protocol of a connection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("TCP"),
            Protocol::Udp => f.write_str("UDP"),
        }
    }
}

/// TCP connection state.
///
/// UDP rows use the same column; unconnected UDP sockets report `07`
/// (`Close`) and connected ones `01` (`Established`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TcpState {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    Unknown,
}

impl TcpState {
    /// Parse TCP state from the table's hex value.
    pub fn from_hex(hex: u8) -> Self {
        match hex {
            0x01 => TcpState::Established,
            0x02 => TcpState::SynSent,
            0x03 => TcpState::SynRecv,
            0x04 => TcpState::FinWait1,
            0x05 => TcpState::FinWait2,
            0x06 => TcpState::TimeWait,
            0x07 => TcpState::Close,
            0x08 => TcpState::CloseWait,
            0x09 => TcpState::LastAck,
            0x0A => TcpState::Listen,
            0x0B => TcpState::Closing,
            _ => TcpState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TcpState::Established => "ESTABLISHED",
            TcpState::SynSent => "SYN_SENT",
            TcpState::SynRecv => "SYN_RECV",
            TcpState::FinWait1 => "FIN_WAIT1",
            TcpState::FinWait2 => "FIN_WAIT2",
            TcpState::TimeWait => "TIME_WAIT",
            TcpState::Close => "CLOSE",
            TcpState::CloseWait => "CLOSE_WAIT",
            TcpState::LastAck => "LAST_ACK",
            TcpState::Listen => "LISTEN",
            TcpState::Closing => "CLOSING",
            TcpState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a connection table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkConnection {
    pub protocol: Protocol,
    pub local_addr: Ipv4Addr,
    pub local_port: u16,
    pub remote_addr: Ipv4Addr,
    pub remote_port: u16,
    /// Connection state; see [`TcpState`] for what UDP rows carry.
    pub state: TcpState,
    /// Owning user ID.
    pub uid: u32,
    /// Socket inode number.
    pub inode: u64,
}

impl NetworkConnection {
    pub fn local(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.local_addr, self.local_port)
    }

    pub fn remote(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.remote_addr, self.remote_port)
    }
}

/// Decode an 8-digit table address into an [`Ipv4Addr`].
///
/// The digits are the native-endian rendering of a network-order word, so
/// the native byte view of the parsed integer is the address in network
/// order.
pub fn decode_ipv4(hex: &str) -> Option<Ipv4Addr> {
    if hex.len() != 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let raw = u32::from_str_radix(hex, 16).ok()?;
    Some(Ipv4Addr::from(raw.to_ne_bytes()))
}

/// Decode a `HHHHHHHH:HHHH` address:port pair.
pub fn decode_addr_port(field: &str) -> Option<(Ipv4Addr, u16)> {
    let (addr_hex, port_hex) = field.split_once(':')?;
    if port_hex.is_empty()
        || port_hex.len() > 4
        || !port_hex.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    let addr = decode_ipv4(addr_hex)?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;
    Some((addr, port))
}

/// Encode an address:port pair the way this host's kernel prints it.
pub fn encode_addr_port(addr: Ipv4Addr, port: u16) -> String {
    format!("{:08X}:{:04X}", u32::from_ne_bytes(addr.octets()), port)
}

/// Parse one table row.
///
/// Returns `None` for rows with too few fields or any undecodable field of
/// interest. Trailing columns beyond `inode` are ignored.
pub fn parse_net_row(line: &str, protocol: Protocol) -> Option<NetworkConnection> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_ROW_FIELDS {
        return None;
    }

    // sl local_address rem_address st tx_queue:rx_queue tr:tm->when retrnsmt uid timeout inode
    let (local_addr, local_port) = decode_addr_port(parts[1])?;
    let (remote_addr, remote_port) = decode_addr_port(parts[2])?;
    let state_hex = parts[3];
    if state_hex.is_empty()
        || state_hex.len() > 2
        || !state_hex.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    let state = TcpState::from_hex(u8::from_str_radix(state_hex, 16).ok()?);
    let uid = parse_decimal(parts[7])?;
    let inode = parse_decimal(parts[9])?;

    Some(NetworkConnection {
        protocol,
        local_addr,
        local_port,
        remote_addr,
        remote_port,
        state,
        uid,
        inode,
    })
}

/// Plain decimal digits only; `str::parse` would also take a leading `+`.
fn parse_decimal<T: std::str::FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parse table content, keeping rows whose inode is in `targets`.
///
/// The first line is discarded as the header. Malformed rows are skipped
/// and rows with inode 0 never match.
pub fn parse_net_table_content(
    content: &str,
    protocol: Protocol,
    targets: &HashSet<u64>,
) -> Result<Vec<NetworkConnection>> {
    let mut connections = Vec::new();
    if targets.is_empty() {
        return Ok(connections);
    }

    for (index, line) in content.lines().enumerate().skip(1) {
        let Some(conn) = parse_net_row(line, protocol) else {
            if !line.trim().is_empty() {
                tracing::trace!(
                    event = event_names::NET_ROW_SKIPPED,
                    %protocol,
                    line = index + 1,
                    "malformed connection row"
                );
            }
            continue;
        };
        if conn.inode == 0 || !targets.contains(&conn.inode) {
            continue;
        }
        try_push(&mut connections, conn, "connection")?;
    }

    Ok(connections)
}

/// Parse a connection table file, keeping rows whose inode is in `targets`.
///
/// An empty `targets` set returns an empty list without touching the file.
///
/// # Errors
/// [`Error::NetTable`] if the file cannot be opened or read. A table with
/// no matching rows is `Ok` with an empty list.
pub fn parse_net_table(
    path: &Path,
    protocol: Protocol,
    targets: &HashSet<u64>,
) -> Result<Vec<NetworkConnection>> {
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|source| Error::NetTable {
        path: path.to_path_buf(),
        source,
    })?;
    let connections = parse_net_table_content(&content, protocol, targets)?;

    tracing::debug!(
        event = event_names::NET_TABLE_PARSED,
        %protocol,
        path = %path.display(),
        matched = connections.len(),
        "parsed connection table"
    );
    Ok(connections)
}
