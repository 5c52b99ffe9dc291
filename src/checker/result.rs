// src/checker/result.rs
// =============================================================================
// The per-URL outcome record.
//
// A CheckResult is keyed by the URL exactly as it appeared in the input
// (never the resolved ARK address) and carries:
//   - status: the HTTP code, or -1 when no response was obtained
//   - note:   "SUCCESS", a body excerpt, or a failure description
//
// Notes always end up on a single line; the constructors strip CR/LF so a
// report row can never be split in two.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::failure::Failure;

/// Status written when no HTTP response was obtained
pub const NO_RESPONSE: i32 = -1;

/// Note written for any 2xx response
pub const SUCCESS_NOTE: &str = "SUCCESS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    url: String,
    status: i32,
    note: String,
}

impl CheckResult {
    /// A 2xx response
    pub fn success(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status: i32::from(status),
            note: SUCCESS_NOTE.to_string(),
        }
    }

    /// A non-2xx response; `excerpt` is the start of its body
    pub fn http_error(url: impl Into<String>, status: u16, excerpt: &str) -> Self {
        Self {
            url: url.into(),
            status: i32::from(status),
            note: single_line(excerpt),
        }
    }

    /// No response at all
    pub fn failed(url: impl Into<String>, failure: &Failure) -> Self {
        Self {
            url: url.into(),
            status: NO_RESPONSE,
            note: single_line(&failure.to_string()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// True only for 2xx responses
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    // `url,status,note` with no quoting; commas inside the note are left as-is.
    pub fn to_row(&self) -> String {
        format!("{},{},{}", self.url, self.status, self.note)
    }
}

// Drops every line terminator.
fn single_line(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
