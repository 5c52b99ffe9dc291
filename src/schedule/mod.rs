// src/schedule/mod.rs
// =============================================================================
// This module bounds how many checks are in flight and drives a whole run.
//
// `run_all` is the one call the binary makes: give it a checker and the
// set of URLs, get back the finished report.
// =============================================================================

mod limiter;

pub use limiter::{run_all, run_with};
