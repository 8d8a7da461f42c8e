//! Fuzz target for /proc/[pid]/status and comm parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinspect_common::ProcessId;
use pinspect_core::collect::{
    parse_comm_content, parse_state_from_reader, parse_status_content, TASK_COMM_MAX,
};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let status = parse_status_content(ProcessId(1), data);
    assert!(status.name.chars().count() <= TASK_COMM_MAX);

    let name = parse_comm_content(data);
    assert!(name.chars().count() <= TASK_COMM_MAX);
    assert!(!name.contains('\n'));

    let _ = parse_state_from_reader(Cursor::new(data));
});
