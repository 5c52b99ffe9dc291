// src/checker/failure.rs
// =============================================================================
// The fixed vocabulary of transport failures.
//
// reqwest reports every failure as one opaque `reqwest::Error` with a chain
// of sources underneath (hyper, io, rustls...). We turn that into a small
// closed enum once, here, and everything downstream pattern-matches on it.
//
// Each variant's Display output is exactly the note written to the report.
// =============================================================================

use std::error::Error as StdError;
use thiserror::Error;

/// Why no HTTP response was obtained for a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The server's certificate did not verify
    #[error("{reason}")]
    TlsVerification { reason: String },

    /// No connection within the timeout
    #[error("Connect timed out after {secs} seconds")]
    ConnectTimeout { secs: u64 },

    /// Connected, but the server went quiet for longer than the timeout
    #[error("Read timed out after {secs} seconds")]
    ReadTimeout { secs: u64 },

    /// DNS failure, connection refused, connection reset
    #[error("{0}")]
    Connect(String),

    /// The URL could not be parsed or turned into a request
    #[error("{0}")]
    InvalidUrl(String),

    /// The transfer broke while reading the body
    #[error("{0}")]
    Read(String),

    /// Redirect chain longer than the configured limit (or a loop)
    #[error("{0}")]
    TooManyRedirects(String),

    /// The remote spoke something that wasn't valid HTTP
    #[error("{0}")]
    Protocol(String),

    /// Any other TLS problem (handshake, alerts)
    #[error("{0}")]
    Tls(String),

    /// A scheme we can't fetch, like ftp: or mailto:
    #[error("{0}")]
    UnsupportedProtocol(String),
}

// Maps a reqwest error onto the failure vocabulary.
//
// Order matters: a TLS verification failure also reports is_connect(), and
// a connect timeout reports both is_timeout() and is_connect().
pub fn classify(error: &reqwest::Error, timeout_secs: u64) -> Failure {
    // The top-level message embeds the URL, which may itself contain "ssl"
    // or "certificate", so only the sources are inspected for TLS markers.
    let sources = source_messages(error);
    let cause = root_cause(error);

    if let Some(reason) = sources.iter().find(|m| is_certificate_message(m)) {
        Failure::TlsVerification {
            reason: reason.clone(),
        }
    } else if sources.iter().any(|m| is_tls_message(m)) && !error.is_timeout() {
        Failure::Tls(cause)
    } else if error.is_timeout() {
        if error.is_connect() {
            Failure::ConnectTimeout { secs: timeout_secs }
        } else {
            Failure::ReadTimeout { secs: timeout_secs }
        }
    } else if error.is_connect() {
        Failure::Connect(cause)
    } else if error.is_builder() {
        Failure::InvalidUrl(cause)
    } else if error.is_body() || error.is_decode() {
        Failure::Read(cause)
    } else if error.is_redirect() {
        Failure::TooManyRedirects(cause)
    } else {
        // is_request() and anything reqwest adds later
        Failure::Protocol(cause)
    }
}

// Messages of every error below the top-level one, outermost first.
fn source_messages(error: &reqwest::Error) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages
}

// The innermost error's message; that's where the useful detail lives
// ("Connection refused (os error 111)", "too many redirects").
pub fn root_cause(error: &(dyn StdError + 'static)) -> String {
    let mut deepest: &(dyn StdError + 'static) = error;
    while let Some(next) = deepest.source() {
        deepest = next;
    }
    let message = deepest.to_string();
    if message.is_empty() {
        error.to_string()
    } else {
        message
    }
}

// rustls reports our own verification failures as "invalid peer
// certificate: <reason>". An alert like "BadCertificate" comes from the
// server rejecting us and is a plain TLS failure.
fn is_certificate_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("invalid peer certificate")
}

fn is_tls_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("tls")
        || lower.contains("ssl")
        || lower.contains("handshake")
        || lower.contains("fatal alert")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[test]
    fn test_timeout_notes() {
        assert_eq!(
            Failure::ConnectTimeout { secs: 1 }.to_string(),
            "Connect timed out after 1 seconds"
        );
        assert_eq!(
            Failure::ReadTimeout { secs: 5 }.to_string(),
            "Read timed out after 5 seconds"
        );
    }

    #[test]
    fn test_cause_variants_display_cause_verbatim() {
        let reason = "invalid peer certificate: UnknownIssuer".to_string();
        assert_eq!(
            Failure::TlsVerification { reason: reason.clone() }.to_string(),
            reason
        );
        assert_eq!(
            Failure::Connect("Connection refused (os error 111)".to_string()).to_string(),
            "Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_marker_detection() {
        assert!(is_certificate_message("invalid peer certificate: UnknownIssuer"));
        assert!(is_tls_message("received fatal alert: HandshakeFailure"));
        assert!(!is_tls_message("Connection refused (os error 111)"));
    }

    #[test]
    fn test_server_alert_is_not_a_verification_failure() {
        let alert = "received fatal alert: BadCertificate";
        assert!(!is_certificate_message(alert));
        assert!(is_tls_message(alert));
        assert!(is_certificate_message("invalid peer certificate: Expired"));
    }

    #[tokio::test]
    async fn test_classify_real_tls_alert() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Reads the ClientHello, then answers with a fatal bad_certificate
        // alert record (content type 21, TLS 1.2, length 2, level 2, code 42)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(&[0x15, 0x03, 0x03, 0x00, 0x02, 0x02, 0x2a]).await;
                let _ = socket.shutdown().await;
            }
        });

        let client = crate::checker::build_client(&crate::config::CheckerConfig::default()).unwrap();
        let error = client
            .get(format!("https://{}/", addr))
            .send()
            .await
            .unwrap_err();

        let failure = classify(&error, 5);
        assert!(matches!(failure, Failure::Tls(_)), "unexpected: {:?}", failure);
        assert!(failure.to_string().contains("BadCertificate"));
    }

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        inner: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.inner.as_deref().map(|e| e as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_root_cause_walks_to_innermost() {
        let error = Layer {
            message: "error sending request",
            inner: Some(Box::new(Layer {
                message: "client error (Connect)",
                inner: Some(Box::new(Layer {
                    message: "Connection refused (os error 111)",
                    inner: None,
                })),
            })),
        };
        assert_eq!(root_cause(&error), "Connection refused (os error 111)");
    }

    #[test]
    fn test_root_cause_without_sources() {
        let error = Layer {
            message: "too many redirects",
            inner: None,
        };
        assert_eq!(root_cause(&error), "too many redirects");
    }
}
