pub mod live_harness;
