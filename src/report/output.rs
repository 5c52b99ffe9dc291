// src/report/output.rs
// =============================================================================
// This module writes a finished Report to a file or to standard output.
//
// Two durability modes:
// - Buffered:    one buffered write, flushed at the end (fast)
// - SyncEachRow: every line is followed by a sync to disk, so a crash
//                mid-write leaves every line written so far intact
//
// Syncing only means something for files; stdout is just flushed.
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::Report;

// Where the report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// `link,status,notes` rows, no quoting
    #[default]
    Csv,
    /// A JSON array of {url, status, note} objects
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    #[default]
    Buffered,
    SyncEachRow,
}

pub fn write_report(
    report: &Report,
    destination: &Destination,
    format: ReportFormat,
    durability: Durability,
) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_lines(report, &mut out, format, |_| Ok(())).context("failed to write report to stdout")?;
            out.flush().context("failed to flush stdout")?;
        }
        Destination::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;

            match durability {
                Durability::Buffered => {
                    let mut out = BufWriter::new(file);
                    write_lines(report, &mut out, format, |_| Ok(()))
                        .and_then(|_| out.flush())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
                Durability::SyncEachRow => {
                    let mut out = file;
                    write_lines(report, &mut out, format, |f: &mut File| f.sync_data())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
            }
        }
    }

    Ok(())
}

// Writes the report line by line, calling `after_line` after each one.
// JSON is a single document, so it counts as one line.
fn write_lines<W, F>(report: &Report, out: &mut W, format: ReportFormat, mut after_line: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W) -> io::Result<()>,
{
    match format {
        ReportFormat::Csv => {
            for line in report.csv_lines() {
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
                after_line(out)?;
            }
        }
        ReportFormat::Json => {
            let json = report.to_json().map_err(io::Error::from)?;
            out.write_all(json.as_bytes())?;
            out.write_all(b"\n")?;
            after_line(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::CheckResult;
    use crate::report::ReportBuilder;

    fn sample() -> Report {
        let mut builder = ReportBuilder::new();
        builder.record(CheckResult::success("https://a.example", 200));
        builder.record(CheckResult::http_error("https://b.example", 404, "Not Found"));
        builder.finish()
    }

    #[test]
    fn test_after_line_runs_once_per_csv_line() {
        let mut buffer = Vec::new();
        let mut calls = 0;
        write_lines(&sample(), &mut buffer, ReportFormat::Csv, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "link,status,notes\nhttps://a.example,200,SUCCESS\nhttps://b.example,404,Not Found\n"
        );
    }

    #[test]
    fn test_json_is_one_document() {
        let mut buffer = Vec::new();
        let mut calls = 0;
        write_lines(&sample(), &mut buffer, ReportFormat::Json, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(calls, 1);
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_file_written_in_both_durability_modes() {
        let dir = tempfile::tempdir().unwrap();
        for (name, durability) in [("buffered.csv", Durability::Buffered), ("synced.csv", Durability::SyncEachRow)] {
            let path = dir.path().join(name);
            write_report(&sample(), &Destination::File(path.clone()), ReportFormat::Csv, durability).unwrap();
            assert_eq!(std::fs::read_to_string(&path).unwrap(), sample().to_csv());
        }
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");
        let err = write_report(&sample(), &Destination::File(path), ReportFormat::Csv, Durability::Buffered)
            .unwrap_err();
        assert!(err.to_string().contains("cannot create output file"));
    }
}
