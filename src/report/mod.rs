// src/report/mod.rs
// =============================================================================
// This module collects CheckResults into the final report and writes it.
//
// Row order: results arrive in whatever order the checks finish, but the
// report is always sorted by the original URL (plain byte order). Running
// the same input twice therefore gives rows in the same order.
//
// The report exists only once every result is in: ReportBuilder is the
// mutable collector, Report is what you get from `finish()` and it can't
// be changed afterwards.
// =============================================================================

mod output;

pub use output::{write_report, Destination, Durability, ReportFormat};

use std::collections::BTreeMap;

use crate::checker::CheckResult;

/// Header line of the CSV report
pub const HEADER: &str = "link,status,notes";

// Collects results as they come in, keyed by URL.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    rows: BTreeMap<String, CheckResult>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds one result. A second result for the same URL replaces the first
    // (and is logged, because the scheduler should never produce one).
    pub fn record(&mut self, result: CheckResult) {
        let url = result.url().to_string();
        if self.rows.insert(url, result).is_some() {
            tracing::warn!("duplicate result recorded for one URL; keeping the latest");
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finish(self) -> Report {
        Report {
            rows: self.rows.into_values().collect(),
        }
    }
}

/// The finished, sorted report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    rows: Vec<CheckResult>,
}

impl Report {
    pub fn rows(&self) -> &[CheckResult] {
        &self.rows
    }

    /// Number of data rows (the header isn't counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that are not 2xx
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_ok()).count()
    }

    // Header first, then one line per row, without trailing newlines.
    pub fn csv_lines(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(HEADER.to_string()).chain(self.rows.iter().map(CheckResult::to_row))
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for line in self.csv_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}
