// src/schedule/limiter.rs
// =============================================================================
// This module decides how many checks run at the same time.
//
// Two admission policies:
// - Pool:  keep up to N checks in flight; as soon as one finishes the next
//          URL starts. A slow URL only ever occupies its own slot.
// - Batch: start N checks, wait for all N, then start the next N. One slow
//          URL holds up the whole next batch.
//
// Either way:
// - at most N checks are running at any moment
// - every URL yields exactly one CheckResult
// - a failing check never cancels its neighbours (failures are values)
//
// Checks are futures polled on the current task, not spawned threads; they
// only make progress at I/O points.
// =============================================================================

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::future::Future;
use tracing::{debug, info};

use crate::checker::{CheckResult, Checker};
use crate::config::{CheckerConfig, Schedule};
use crate::report::{Report, ReportBuilder};

// How often a progress line is logged
const PROGRESS_EVERY: usize = 10;

// Checks every URL in `urls` with the given checker and returns the
// finished report. Returns only once every check has completed.
pub async fn run_all(checker: &Checker, urls: BTreeSet<String>, config: &CheckerConfig) -> Report {
    info!(
        urls = urls.len(),
        concurrent_requests = config.concurrent_requests,
        schedule = ?config.schedule,
        "starting checks"
    );

    let mut builder = ReportBuilder::new();
    let results = run_with(
        urls.into_iter().collect(),
        config.concurrent_requests,
        config.schedule,
        |url| checker.check(url),
    )
    .await;

    for result in results {
        builder.record(result);
    }
    let report = builder.finish();

    info!(
        checked = report.len(),
        failed = report.failed_count(),
        "finished checks"
    );
    report
}

// The policy itself, independent of what a "check" is. Results come back
// in completion order.
pub async fn run_with<F, Fut>(
    urls: Vec<String>,
    limit: usize,
    schedule: Schedule,
    check: F,
) -> Vec<CheckResult>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = CheckResult>,
{
    // A limit of 0 would never admit anything
    let limit = limit.max(1);

    match schedule {
        Schedule::Pool => run_pool(urls, limit, check).await,
        Schedule::Batch => run_batches(urls, limit, check).await,
    }
}

async fn run_pool<F, Fut>(urls: Vec<String>, limit: usize, check: F) -> Vec<CheckResult>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = CheckResult>,
{
    let mut done = 0usize;

    // buffer_unordered(limit) keeps exactly `limit` futures going and pulls
    // the next URL from the iterator whenever one of them finishes
    stream::iter(urls.into_iter().map(check))
        .buffer_unordered(limit)
        .inspect(|_| {
            done += 1;
            if done % PROGRESS_EVERY == 0 {
                debug!("Processed {} records", done);
            }
        })
        .collect()
        .await
}

async fn run_batches<F, Fut>(urls: Vec<String>, limit: usize, check: F) -> Vec<CheckResult>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = CheckResult>,
{
    let mut results = Vec::with_capacity(urls.len());

    for (index, batch) in urls.chunks(limit).enumerate() {
        debug!(batch = index + 1, size = batch.len(), "starting batch");
        let finished = join_all(batch.iter().cloned().map(&check)).await;

        let before = results.len();
        results.extend(finished);
        if results.len() / PROGRESS_EVERY > before / PROGRESS_EVERY {
            debug!("Processed {} records", results.len());
        }
    }

    results
}


// -----------------------------------------------------------------------------
// NOTES:
//
// 1. What does buffer_unordered do?
//    - It polls up to `limit` futures from the stream at once
//    - Whenever one finishes it yields that result and starts the next one,
//      so the pool refills continuously
//    - "unordered" means results come out in completion order
//
// 2. Why join_all for batches?
//    - join_all waits for every future in the batch, which is exactly the
//      barrier a batch needs before the next chunk starts
//
// 3. Why no tokio::spawn?
//    - All checks are polled by the task that calls run_with
//    - Nothing needs to be Send or 'static, and dropping the run drops every
//      in-flight request with it
// -----------------------------------------------------------------------------
