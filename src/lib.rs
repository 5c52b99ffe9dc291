// src/lib.rs
// =============================================================================
// The checking engine behind the `link-checker` binary.
//
// Data flow:
//   input URL set -> normalize (per URL) -> scheduler admits N checks
//   -> each check produces a CheckResult -> Report collects every row
//
// The binary (src/main.rs) only reads input, parses flags, and writes the
// finished report. Everything that talks to the network lives here.
// =============================================================================

pub mod checker;
pub mod config;
pub mod input;
pub mod report;
pub mod schedule;

pub use checker::{normalize, CheckResult, Checker, Failure};
pub use config::{CheckerConfig, ConfigError, Schedule};
pub use report::{Durability, Report, ReportBuilder, ReportFormat};
pub use schedule::run_all;
