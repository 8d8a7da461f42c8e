//! Fake proc trees for collector tests.
//!
//! [`FakeProc`] lays out the handful of files the collectors read (`fd/`
//! symlinks, `task/<tid>/{comm,status}`, `status`, `net/{tcp,udp}`) under a
//! temp directory, so tests can exercise races and malformed input that a
//! live `/proc` will not produce on demand.

use crate::collect::ProcPaths;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header line of `/proc/net/tcp` and `/proc/net/udp`.
pub const NET_TABLE_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";

/// Format one connection-table row the way the kernel does.
///
/// `local` and `remote` are already-encoded `HHHHHHHH:HHHH` pairs.
pub fn net_row(slot: usize, local: &str, remote: &str, state: u8, uid: u32, inode: u64) -> String {
    format!(
        "{:>4}: {} {} {:02X} 00000000:00000000 00:00000000 00000000 {:>5}        0 {} 1 0000000000000000 100 0 0 10 0",
        slot, local, remote, state, uid, inode
    )
}

/// Build a whole table from rows, header included.
pub fn net_table(rows: &[String]) -> String {
    let mut out = String::from(NET_TABLE_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// A fake proc root in a temp directory.
///
/// The directory is removed when the value is dropped.
#[derive(Debug)]
pub struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("pinspect-fakeproc-")
            .tempdir()
            .expect("create fake proc root");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Paths rooted at this fake tree.
    pub fn paths(&self) -> ProcPaths {
        ProcPaths::new(self.dir.path())
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        self.root().join(pid.to_string())
    }

    /// Create `<pid>/`, `<pid>/fd/` and `<pid>/task/`.
    pub fn add_process(&self, pid: u32) -> &Self {
        fs::create_dir_all(self.pid_dir(pid).join("fd")).expect("create fd dir");
        fs::create_dir_all(self.pid_dir(pid).join("task")).expect("create task dir");
        self
    }

    /// Add `<pid>/fd/<fd>` as a symlink to `target`.
    ///
    /// The target does not need to exist; only `readlink` is performed.
    pub fn add_fd(&self, pid: u32, fd: u32, target: &str) -> &Self {
        let link = self.pid_dir(pid).join("fd").join(fd.to_string());
        symlink(target, link).expect("create fd symlink");
        self
    }

    /// Add an arbitrary entry under `<pid>/fd/` that is not a symlink.
    pub fn add_fd_plain_file(&self, pid: u32, name: &str) -> &Self {
        fs::write(self.pid_dir(pid).join("fd").join(name), b"").expect("create fd file");
        self
    }

    /// Add `<pid>/task/<tid>/` with optional `comm` and `status` contents.
    ///
    /// `None` leaves the file absent, as when a thread exits mid-scan.
    pub fn add_thread(&self, pid: u32, tid: u32, comm: Option<&str>, status: Option<&str>) -> &Self {
        self.add_raw_thread(pid, tid, comm.map(str::as_bytes), status.map(str::as_bytes))
    }

    /// Like [`FakeProc::add_thread`] with raw bytes, for names that are not
    /// valid UTF-8.
    pub fn add_raw_thread(
        &self,
        pid: u32,
        tid: u32,
        comm: Option<&[u8]>,
        status: Option<&[u8]>,
    ) -> &Self {
        let dir = self.pid_dir(pid).join("task").join(tid.to_string());
        fs::create_dir_all(&dir).expect("create task entry");
        if let Some(comm) = comm {
            fs::write(dir.join("comm"), comm).expect("write comm");
        }
        if let Some(status) = status {
            fs::write(dir.join("status"), status).expect("write task status");
        }
        self
    }

    /// Write `<pid>/status`.
    pub fn write_status(&self, pid: u32, content: impl AsRef<[u8]>) -> &Self {
        fs::create_dir_all(self.pid_dir(pid)).expect("create pid dir");
        fs::write(self.pid_dir(pid).join("status"), content).expect("write status");
        self
    }

    /// Write `net/tcp`.
    pub fn write_net_tcp(&self, content: &str) -> &Self {
        self.write_net("tcp", content)
    }

    /// Write `net/udp`.
    pub fn write_net_udp(&self, content: &str) -> &Self {
        self.write_net("udp", content)
    }

    fn write_net(&self, name: &str, content: &str) -> &Self {
        let dir = self.root().join("net");
        fs::create_dir_all(&dir).expect("create net dir");
        fs::write(dir.join(name), content).expect("write net table");
        self
    }
}

impl Default for FakeProc {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal `status` content with the given name, state line and thread count.
pub fn status_content(name: &str, state: &str, threads: u32) -> String {
    format!(
        "Name:\t{name}\nUmask:\t0022\nState:\t{state}\nTgid:\t1\nNgid:\t0\nPid:\t1\nPPid:\t0\n\
         Uid:\t1000\t1000\t1000\t1000\nGid:\t100\t100\t100\t100\n\
         VmPeak:\t  10240 kB\nVmSize:\t  10000 kB\nVmRSS:\t   2048 kB\nThreads:\t{threads}\n"
    )
}
