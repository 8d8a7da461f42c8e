//! Fuzz target for fd symlink target classification.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinspect_core::collect::{FdEntry, FdKind};

fuzz_target!(|target: &str| {
    let entry = FdEntry::from_target(0, target);
    if entry.socket_inode.is_some() {
        assert_eq!(entry.kind, FdKind::Socket);
        assert!(target.ends_with(']'));
    }
});
