// src/input.rs
// =============================================================================
// Reads the list of URLs to check.
//
// One URL per line. Surrounding whitespace is trimmed, blank lines are
// skipped, and duplicates collapse into one entry. The result is a
// BTreeSet, which is also what fixes the report's row order (sorted).
// =============================================================================

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

// Where the URL list comes from: a file, or stdin when `path` is None or "-".
pub fn read_urls(path: Option<&Path>) -> Result<BTreeSet<String>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("cannot open input file {}", path.display()))?;
            parse_urls(BufReader::new(file))
                .with_context(|| format!("failed to read {}", path.display()))
        }
        _ => parse_urls(io::stdin().lock()).context("failed to read URLs from stdin"),
    }
}

pub fn parse_urls<R: BufRead>(reader: R) -> io::Result<BTreeSet<String>> {
    let mut urls = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            urls.insert(trimmed.to_string());
        }
    }
    Ok(urls)
}
