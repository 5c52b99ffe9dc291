// src/checker/http.rs
// =============================================================================
// This module checks one URL by making one HTTP GET request.
//
// Key functionality:
// - Rewrites ARK identifiers to the resolver before fetching
// - Follows redirects (up to a limit) with connect and read timeouts
// - 2xx => "SUCCESS"; anything else => first 100 bytes of the body
// - Transport failures become a Failure, never a panic or an aborted run
//
// There are no retries: one attempt per URL, and whatever happens is the
// answer for that URL.
// =============================================================================

use reqwest::{redirect::Policy, Client, Response, Url};
use std::time::Duration;
use tracing::debug;

use super::failure::{classify, Failure};
use super::normalize::normalize_with;
use super::result::CheckResult;
use crate::config::CheckerConfig;

/// How much of a non-2xx body ends up in the note
pub const EXCERPT_BYTES: usize = 100;

// reqwest starts the read timer together with the request, before the
// connection exists. Without some slack it fires at the same instant as
// the connect timer and every unreachable host reads as a read timeout.
const READ_TIMER_GRACE: Duration = Duration::from_millis(250);

// Builds the HTTP client shared (read-only) by every check in a run.
//
// The timeout is applied per phase: once for establishing the connection
// and once for every read after that. This is what lets us tell a connect
// timeout apart from a read timeout in the report.
pub fn build_client(config: &CheckerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.timeout)
        .read_timeout(config.timeout + READ_TIMER_GRACE)
        .redirect(Policy::limited(config.max_redirects))
        .pool_max_idle_per_host(config.concurrent_requests)
        .use_rustls_tls()
        .build()
}

// What came back from a completed exchange.
enum Exchange {
    Success(u16),
    Error { status: u16, excerpt: String },
}

// Performs checks. Cloning is cheap (the client is reference counted), so
// each concurrent task can hold its own copy.
#[derive(Debug, Clone)]
pub struct Checker {
    client: Client,
    timeout_secs: u64,
    ark_resolver: String,
}

impl Checker {
    /// Builds a checker with a fresh client from `config`
    pub fn new(config: &CheckerConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Uses an already configured client
    pub fn with_client(client: Client, config: &CheckerConfig) -> Self {
        Self {
            client,
            timeout_secs: config.timeout_secs(),
            ark_resolver: config.ark_resolver.clone(),
        }
    }

    // Checks a single URL. Always returns a result; the row is keyed by
    // `url` as given, not by the address we actually fetched.
    pub async fn check(&self, url: String) -> CheckResult {
        let target = normalize_with(&url, &self.ark_resolver);

        match self.fetch(&target).await {
            Ok(Exchange::Success(status)) => {
                debug!(%url, status, "link ok");
                CheckResult::success(url, status)
            }
            Ok(Exchange::Error { status, excerpt }) => {
                debug!(%url, status, "link returned an error status");
                CheckResult::http_error(url, status, &excerpt)
            }
            Err(failure) => {
                debug!(%url, ?failure, "no response");
                CheckResult::failed(url, &failure)
            }
        }
    }

    // One GET. The response is owned by this function, so the connection
    // goes back to the pool (or is closed) on every path out of here,
    // including a failed body read.
    async fn fetch(&self, target: &str) -> Result<Exchange, Failure> {
        let address = preflight(target)?;

        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| classify(&e, self.timeout_secs))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Exchange::Success(status.as_u16()));
        }

        let excerpt = read_excerpt(response, EXCERPT_BYTES)
            .await
            .map_err(|e| classify(&e, self.timeout_secs))?;

        Ok(Exchange::Error {
            status: status.as_u16(),
            excerpt,
        })
    }
}

// Rejects things reqwest can't fetch before any I/O happens, so they get a
// precise failure class instead of a generic builder error.
fn preflight(target: &str) -> Result<Url, Failure> {
    let url = Url::parse(target).map_err(|e| Failure::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Failure::UnsupportedProtocol(format!(
            "Request URL has an unsupported protocol '{}:'",
            other
        ))),
    }
}

// Reads at most `limit` bytes of the body; the rest is never downloaded.
async fn read_excerpt(mut response: Response, limit: usize) -> Result<String, reqwest::Error> {
    let mut buffer = Vec::with_capacity(limit);

    while buffer.len() < limit {
        match response.chunk().await? {
            Some(chunk) => buffer.extend_from_slice(&chunk),
            None => break,
        }
    }
    buffer.truncate(limit);

    Ok(decode_prefix(&buffer))
}

// Best-effort text decoding of a byte prefix. A multi-byte character cut in
// half by the byte limit is dropped rather than shown as garbage.
fn decode_prefix(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) if e.error_len().is_none() => {
            String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(&CheckerConfig::default()).is_ok());
    }

    #[test]
    fn test_preflight_accepts_http_and_https() {
        assert!(preflight("http://example.com").is_ok());
        assert!(preflight("https://example.com/path?q=1").is_ok());
    }

    #[test]
    fn test_preflight_rejects_other_schemes() {
        match preflight("ftp://example.com/file.txt") {
            Err(Failure::UnsupportedProtocol(note)) => assert!(note.contains("ftp")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_preflight_rejects_garbage() {
        assert!(matches!(preflight("not a url"), Err(Failure::InvalidUrl(_))));
    }

    #[test]
    fn test_decode_prefix_drops_split_character() {
        // "é" is two bytes; cut after the first one
        let bytes = "abc\u{e9}".as_bytes();
        assert_eq!(decode_prefix(&bytes[..4]), "abc");
        assert_eq!(decode_prefix(bytes), "abc\u{e9}");
    }

    #[test]
    fn test_decode_prefix_is_lossy_for_invalid_bytes() {
        assert_eq!(decode_prefix(&[b'o', 0xff, b'k']), "o\u{fffd}k");
    }

    #[tokio::test]
    async fn test_unsupported_scheme_yields_row() {
        let checker = Checker::new(&CheckerConfig::default()).unwrap();
        let result = checker.check("mailto:someone@example.com".to_string()).await;
        assert_eq!(result.url(), "mailto:someone@example.com");
        assert_eq!(result.status(), -1);
        assert!(result.note().contains("mailto"));
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why read the body with chunk() instead of text()?
//    - text() downloads the whole body before returning
//    - chunk() hands over whatever arrived so far, so we can stop at 100
//      bytes and drop the response without fetching the rest
//
// 2. Where is the connection closed?
//    - Response owns the connection; dropping it releases it
//    - fetch() owns the response, so every return (success, error status,
//      failed body read) drops it without any explicit close call
//
// 3. Why does check() return CheckResult and not Result?
//    - A failed link is a normal outcome, not an error of the program
//    - The Failure is folded into the row right here, so the scheduler never
//      has to handle errors at all
// -----------------------------------------------------------------------------
