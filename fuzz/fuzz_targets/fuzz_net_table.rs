//! Fuzz target for /proc/net/{tcp,udp} parsing.
//!
//! The parser must never panic and must only return rows whose inode was
//! requested.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pinspect_core::collect::{parse_net_table_content, Protocol};
use std::collections::HashSet;

#[derive(Debug, Arbitrary)]
struct Input {
    content: String,
    inodes: Vec<u64>,
    udp: bool,
}

fuzz_target!(|input: Input| {
    let targets: HashSet<u64> = input.inodes.into_iter().collect();
    let protocol = if input.udp { Protocol::Udp } else { Protocol::Tcp };

    if let Ok(rows) = parse_net_table_content(&input.content, protocol, &targets) {
        for row in rows {
            assert!(row.inode != 0);
            assert!(targets.contains(&row.inode));
            assert_eq!(row.protocol, protocol);
        }
    }
});
