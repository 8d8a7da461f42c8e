//! Live system test harness.
//!
//! Keeps real OS resources open (files, TCP and UDP sockets, a Unix socket
//! pair) in the test process so that `/proc/self/*` reflects them while the
//! collectors run.

#![allow(dead_code)]
// Not every test binary uses every helper.

use std::fs::{File, OpenOptions};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener, TcpStream, UdpSocket};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

static HARNESS_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Live resource harness scoped to a test.
///
/// Holding the harness serializes tests in one binary, so socket sets seen
/// by one test are not disturbed by another.
#[derive(Debug)]
pub struct LiveHarness {
    _guard: MutexGuard<'static, ()>,
    temp_dir: TempDir,
    files: Vec<File>,
    tcp_listeners: Vec<TcpListener>,
    tcp_streams: Vec<TcpStream>,
    udp_sockets: Vec<UdpSocket>,
    unix_streams: Vec<UnixStream>,
}

impl LiveHarness {
    pub fn new() -> io::Result<Self> {
        let guard = HARNESS_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let temp_dir = tempfile::Builder::new()
            .prefix("pinspect-live-")
            .tempdir()?;

        Ok(Self {
            _guard: guard,
            temp_dir,
            files: Vec::new(),
            tcp_listeners: Vec::new(),
            tcp_streams: Vec::new(),
            udp_sockets: Vec::new(),
            unix_streams: Vec::new(),
        })
    }

    /// PID of the current process.
    pub fn pid(&self) -> u32 {
        std::process::id()
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Open a read/write temp file and keep it open.
    pub fn open_rw_file(&mut self) -> io::Result<PathBuf> {
        let path = self.temp_dir().join(format!("rw_{}.txt", self.files.len()));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        self.files.push(file);
        Ok(path)
    }

    /// Bind a TCP listener on `addr` with an ephemeral port.
    pub fn open_tcp_listener(&mut self, addr: Ipv4Addr) -> io::Result<u16> {
        let listener = TcpListener::bind(SocketAddrV4::new(addr, 0))?;
        let port = listener.local_addr()?.port();
        self.tcp_listeners.push(listener);
        Ok(port)
    }

    /// Open a loopback listener plus an established client/server pair.
    pub fn open_tcp_connection(&mut self) -> io::Result<u16> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let client = TcpStream::connect(addr)?;
        let (server, _) = listener.accept()?;

        self.tcp_listeners.push(listener);
        self.tcp_streams.push(client);
        self.tcp_streams.push(server);
        Ok(addr.port())
    }

    /// Open a UDP socket bound to localhost.
    pub fn open_udp_socket(&mut self) -> io::Result<u16> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        let port = socket.local_addr()?.port();
        self.udp_sockets.push(socket);
        Ok(port)
    }

    /// Open a connected Unix socket pair (sockets absent from the tcp/udp tables).
    pub fn open_unix_pair(&mut self) -> io::Result<()> {
        let (a, b) = UnixStream::pair()?;
        self.unix_streams.push(a);
        self.unix_streams.push(b);
        Ok(())
    }

    /// Close every socket the harness holds.
    pub fn close_sockets(&mut self) {
        self.tcp_listeners.clear();
        self.tcp_streams.clear();
        self.udp_sockets.clear();
        self.unix_streams.clear();
    }
}
