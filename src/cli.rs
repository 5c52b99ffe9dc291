// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI is deliberately thin: it turns flags into a CheckerConfig plus
// "where does input come from / where does the report go". All checking
// happens in the library.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use link_checker::config::{DEFAULT_ARK_RESOLVER, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use link_checker::report::Destination;
use link_checker::{CheckerConfig, Durability, ReportFormat, Schedule};

// Takes a list of links (one per line) and writes a CSV report with the
// result of checking each of them.
#[derive(Parser, Debug)]
#[command(
    name = "link-checker",
    version,
    about = "Check a list of links and write a CSV report of their status",
    long_about = "link-checker reads one link per line, checks every distinct link with a single \
                  HTTP GET (ark: identifiers are resolved through n2t.net), and writes one \
                  `link,status,notes` row per link."
)]
pub struct Cli {
    /// Input file, one link per line (omit or use - for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Output file, CSV formatted (omit for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// The max number of concurrent requests to allow
    #[arg(
        short = 'c',
        long,
        env = "LINK_CHECKER_CONCURRENT_REQUESTS",
        default_value_t = 50,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub concurrent_requests: u64,

    /// The number of seconds to wait before timing out (connect and read)
    #[arg(
        short,
        long,
        env = "LINK_CHECKER_TIMEOUT",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// How requests are admitted: a refilling pool, or fixed batches
    #[arg(long, value_enum, default_value_t = Schedule::Pool)]
    pub schedule: Schedule,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// Sync the output file to disk after every row
    #[arg(long)]
    pub sync_every_row: bool,

    /// Maximum number of redirects to follow per link
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Resolver prefix for ark: identifiers
    #[arg(long, default_value = DEFAULT_ARK_RESOLVER)]
    pub ark_resolver: String,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            concurrent_requests: usize::try_from(self.concurrent_requests).unwrap_or(usize::MAX),
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
            ark_resolver: self.ark_resolver.clone(),
            schedule: self.schedule,
        }
    }

    pub fn destination(&self) -> Destination {
        match &self.output_file {
            Some(path) => Destination::File(path.clone()),
            None => Destination::Stdout,
        }
    }

    pub fn durability(&self) -> Durability {
        if self.sync_every_row {
            Durability::SyncEachRow
        } else {
            Durability::Buffered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-checker"]).unwrap();
        let config = cli.checker_config();
        assert_eq!(config.concurrent_requests, 50);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.schedule, Schedule::Pool);
        assert_eq!(cli.destination(), Destination::Stdout);
        assert_eq!(cli.durability(), Durability::Buffered);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "link-checker", "-i", "links.txt", "-o", "out.csv", "-c", "2", "-t", "1", "--schedule", "batch",
            "--sync-every-row",
        ])
        .unwrap();
        assert_eq!(cli.input_file, Some(PathBuf::from("links.txt")));
        assert_eq!(cli.destination(), Destination::File(PathBuf::from("out.csv")));
        assert_eq!(cli.checker_config().concurrent_requests, 2);
        assert_eq!(cli.checker_config().schedule, Schedule::Batch);
        assert_eq!(cli.durability(), Durability::SyncEachRow);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(Cli::try_parse_from(["link-checker", "-c", "0"]).is_err());
        assert!(Cli::try_parse_from(["link-checker", "-t", "0"]).is_err());
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why u64 for the concurrency flag?
//    - clap's ranged value parsers work on the fixed-width integer types
//    - range(1..) rejects 0 at parse time, before anything else runs
//
// 2. Why Option<PathBuf> for input and output?
//    - None means "use stdin" / "use stdout", so the tool works in a pipe:
//      cat links.txt | link-checker > report.csv
// -----------------------------------------------------------------------------
