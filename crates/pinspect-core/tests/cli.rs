//! CLI tests for the pinspect binary.
//!
//! Exit codes, output formats and `--proc-root` handling.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;

fn pinspect() -> Command {
    let mut cmd = Command::cargo_bin("pinspect").expect("pinspect binary should exist");
    cmd.env_remove("PINSPECT_PROC_ROOT")
        .env_remove("PINSPECT_LOG")
        .env_remove("PINSPECT_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

const TABLE_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";

/// Build a minimal proc tree with process 4242 owning one listening socket
/// on 0.0.0.0:8080 (the address is the same in either byte order).
fn fake_proc_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let pid_dir = root.join("4242");

    fs::create_dir_all(pid_dir.join("fd")).unwrap();
    fs::create_dir_all(pid_dir.join("task/4242")).unwrap();
    fs::create_dir_all(root.join("net")).unwrap();

    fs::write(
        pid_dir.join("status"),
        "Name:\tfakesrv\nState:\tS (sleeping)\nUid:\t1000\t1000\t1000\t1000\n\
         Gid:\t1000\t1000\t1000\t1000\nVmPeak:\t  2048 kB\nVmSize:\t  2000 kB\n\
         VmRSS:\t   512 kB\nThreads:\t1\n",
    )
    .unwrap();
    fs::write(pid_dir.join("task/4242/comm"), "fakesrv\n").unwrap();
    fs::write(pid_dir.join("task/4242/status"), "State:\tS (sleeping)\n").unwrap();

    link(&pid_dir, 0, "/dev/null");
    link(&pid_dir, 3, "socket:[31337]");
    link(&pid_dir, 4, "pipe:[777]");

    fs::write(
        root.join("net/tcp"),
        format!(
            "{TABLE_HEADER}   0: 00000000:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 31337 1 0000000000000000 100 0 0 10 0\n"
        ),
    )
    .unwrap();
    fs::write(root.join("net/udp"), TABLE_HEADER).unwrap();

    dir
}

fn link(pid_dir: &Path, fd: u32, target: &str) {
    symlink(target, pid_dir.join("fd").join(fd.to_string())).unwrap();
}

mod arguments {
    use super::*;

    #[test]
    fn missing_pid_is_args_error() {
        pinspect().assert().code(1).stderr(predicate::str::contains("PID"));
    }

    #[test]
    fn non_numeric_pid_is_args_error() {
        pinspect()
            .arg("abc")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("abc"));
    }

    #[test]
    fn zero_pid_is_args_error() {
        pinspect().arg("0").assert().code(1);
    }

    #[test]
    fn signed_pid_is_args_error() {
        pinspect().arg("+12").assert().code(1);
    }

    #[test]
    fn unknown_flag_is_args_error() {
        pinspect().args(["--bogus", "1"]).assert().code(1);
    }

    #[test]
    fn help_exits_clean() {
        pinspect()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--network"))
            .stdout(predicate::str::contains("--proc-root"));
    }

    #[test]
    fn version_exits_clean() {
        pinspect()
            .arg("-V")
            .assert()
            .success()
            .stdout(predicate::str::contains("pinspect"));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn nonexistent_pid_is_not_found() {
        pinspect()
            .arg("999999999")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Process Not Found"));
    }

    #[test]
    fn nonexistent_pid_json_error_report() {
        let output = pinspect()
            .args(["--format", "json", "999999999"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(2));
        let report: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
        assert_eq!(report["code"], 20);
        assert_eq!(report["category"], "not_found");
        assert_eq!(report["context"]["pid"], 999999999u32);
    }

    #[test]
    fn missing_status_under_proc_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        pinspect()
            .args(["--proc-root"])
            .arg(dir.path())
            .arg("1")
            .assert()
            .code(2);
    }
}

mod fake_root {
    use super::*;

    #[test]
    fn human_summary() {
        let tree = fake_proc_tree();
        pinspect()
            .arg("--proc-root")
            .arg(tree.path())
            .arg("4242")
            .assert()
            .success()
            .stdout(predicate::str::contains("Process:   fakesrv (PID 4242)"))
            .stdout(predicate::str::contains("File Descriptors: 3 open"))
            .stdout(predicate::str::contains("Network Connections: 1 open"))
            .stdout(predicate::str::contains("Thread Details").not());
    }

    #[test]
    fn verbose_tables() {
        let tree = fake_proc_tree();
        pinspect()
            .arg("-v")
            .arg("--proc-root")
            .arg(tree.path())
            .arg("4242")
            .assert()
            .success()
            .stdout(predicate::str::contains("socket:[31337]"))
            .stdout(predicate::str::contains("Thread Details:"))
            .stdout(predicate::str::contains("0.0.0.0:8080"))
            .stdout(predicate::str::contains("LISTEN"));
    }

    #[test]
    fn network_only() {
        let tree = fake_proc_tree();
        pinspect()
            .arg("-n")
            .arg("--proc-root")
            .arg(tree.path())
            .arg("4242")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Network Connections: 1 open"))
            .stdout(predicate::str::contains("Process:").not());
    }

    #[test]
    fn proc_root_from_env() {
        let tree = fake_proc_tree();
        pinspect()
            .env("PINSPECT_PROC_ROOT", tree.path())
            .arg("4242")
            .assert()
            .success()
            .stdout(predicate::str::contains("fakesrv"));
    }

    #[test]
    fn json_report() {
        let tree = fake_proc_tree();
        let output = pinspect()
            .args(["-f", "json", "--proc-root"])
            .arg(tree.path())
            .arg("4242")
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["pid"], 4242);
        assert_eq!(report["status"]["name"], "fakesrv");
        assert_eq!(report["fds"].as_array().unwrap().len(), 3);
        assert_eq!(report["threads"][0]["name"], "fakesrv");
        assert_eq!(report["sockets"][0]["local_port"], 8080);
        assert_eq!(report["sockets"][0]["inode"], 31337);
        assert_eq!(report["sockets"][0]["state"], "LISTEN");
    }

    #[test]
    fn unreadable_table_degrades_gracefully() {
        let tree = fake_proc_tree();
        fs::remove_file(tree.path().join("net/udp")).unwrap();
        pinspect()
            .arg("--proc-root")
            .arg(tree.path())
            .arg("4242")
            .assert()
            .success()
            .stdout(predicate::str::contains("File Descriptors: 3 open"))
            .stdout(predicate::str::contains(
                "Network Connections: Unable to read (unreadable kernel data)",
            ));
    }
}

mod live {
    use super::*;

    #[test]
    fn inspect_self_parent_json() {
        // The test runner is alive for the duration of the test.
        let pid = std::process::id().to_string();
        let output = pinspect().args(["--format", "json", &pid]).output().unwrap();
        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["pid"].as_u64(), Some(u64::from(std::process::id())));
        assert!(report["status"]["thread_count"].as_u64().unwrap() >= 1);
    }
}
