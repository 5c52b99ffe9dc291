// src/config.rs
// =============================================================================
// Plain-parameter configuration for a checking run.
//
// The CLI layer builds a CheckerConfig from flags; library users can build
// one directly. Nothing here touches the network or the filesystem.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// Default number of checks allowed in flight at once
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 50;

/// Default per-phase timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default redirect hop limit
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Public resolver used for `ark:` identifiers
pub const DEFAULT_ARK_RESOLVER: &str = "https://n2t.net/";

/// Identifying user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// How the scheduler admits checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Schedule {
    /// Keep up to N checks in flight; a finished check immediately frees a slot
    #[default]
    Pool,
    /// Run N checks, wait for all of them, then start the next N
    Batch,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrent_requests must be at least 1")]
    ZeroConcurrency,
    #[error("timeout must be at least 1 second")]
    ZeroTimeout,
    #[error("user agent must not be empty")]
    EmptyUserAgent,
}

// Everything a run needs to know, passed down as plain values.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Upper bound on simultaneously running checks
    pub concurrent_requests: usize,
    /// Applied separately to the connect phase and to each read
    pub timeout: Duration,
    /// Sent as the User-Agent header
    pub user_agent: String,
    /// Redirects followed before giving up
    pub max_redirects: usize,
    /// Prefix prepended to `ark:` identifiers
    pub ark_resolver: String,
    /// Admission policy for the scheduler
    pub schedule: Schedule,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            ark_resolver: DEFAULT_ARK_RESOLVER.to_string(),
            schedule: Schedule::default(),
        }
    }
}

impl CheckerConfig {
    /// Rejects values that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrent_requests == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(())
    }

    /// Whole seconds, as shown in timeout notes
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}
