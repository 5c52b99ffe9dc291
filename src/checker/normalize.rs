// src/checker/normalize.rs
// =============================================================================
// Rewrites identifier-scheme URLs into addresses we can actually fetch.
//
// ARK identifiers ("ark:12148/btv1b8449691v") are not HTTP URLs; the public
// resolver at n2t.net accepts them appended to its base address.
// Everything else passes through untouched.
// =============================================================================

use crate::config::DEFAULT_ARK_RESOLVER;

const ARK_PREFIX: &str = "ark:";

// Returns the fetchable address for `url`, using the public ARK resolver.
//
// Example:
//   normalize("ark:1234/abcd") == "https://n2t.net/ark:1234/abcd"
//   normalize("https://example.com") == "https://example.com"
pub fn normalize(url: &str) -> String {
    normalize_with(url, DEFAULT_ARK_RESOLVER)
}

// Same as `normalize`, with an explicit resolver base (used by tests and by
// anyone running their own resolver). The base is used verbatim.
pub fn normalize_with(url: &str, resolver: &str) -> String {
    if url.starts_with(ARK_PREFIX) {
        format!("{}{}", resolver, url)
    } else {
        url.to_string()
    }
}
