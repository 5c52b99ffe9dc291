// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so stdout stays free for the report)
// 3. Read the URL list, check every link, write the report
// 4. Exit with proper code (0 = all links OK, 1 = some failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use link_checker::input::read_urls;
use link_checker::report::write_report;
use link_checker::{run_all, Checker};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = report written, every link returned 2xx
//   Ok(1) = report written, at least one link failed
//   Err   = could not read input, build the client, or write the report
async fn run(cli: Cli) -> Result<i32> {
    let config = cli.checker_config();
    config.validate()?;

    let urls = read_urls(cli.input_file.as_deref())?;
    info!("Checking {} unique link(s)", urls.len());

    let checker = Checker::new(&config).context("failed to build HTTP client")?;
    let report = run_all(&checker, urls, &config).await;

    write_report(&report, &cli.destination(), cli.format, cli.durability())?;

    let failed = report.failed_count();
    if failed > 0 {
        warn!("{} of {} link(s) did not return 2xx", failed, report.len());
        Ok(1)
    } else {
        Ok(0)
    }
}

// Sets up the tracing subscriber based on -v / -q.
// RUST_LOG, when set, wins over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "link_checker=info,warn",
            1 => "link_checker=debug,info",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
