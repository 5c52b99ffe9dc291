// src/checker/mod.rs
// =============================================================================
// This module contains the per-URL checking logic.
//
// Submodules:
// - normalize: Rewrites ark: identifiers to the n2t.net resolver
// - http: Makes the HTTP request and turns the outcome into a CheckResult
// - failure: The fixed set of transport failure classes
// - result: The CheckResult row itself
// =============================================================================

mod failure;
mod http;
mod normalize;
mod result;

// Re-export public items from submodules so callers can write
// `checker::Checker` instead of `checker::http::Checker`
pub use failure::{classify, root_cause, Failure};
pub use http::{build_client, Checker, EXCERPT_BYTES};
pub use normalize::{normalize, normalize_with};
pub use result::{CheckResult, NO_RESPONSE, SUCCESS_NOTE};
