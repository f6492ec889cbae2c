// ── Core error types ──
//
// User-facing errors from netsight-core. Consumers never see reqwest or
// serde failures directly; the `From<netsight_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach analyzer server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Analyzer server request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Analyzer endpoint not found (HTTP 404)")]
    NotFound,

    #[error("Malformed response from analyzer server: {message}")]
    InvalidResponse { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the next poll or fetch is likely to succeed without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::Api { status, .. } => status.is_some_and(|s| s >= 500 || s == 429),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netsight_api::Error> for CoreError {
    fn from(err: netsight_api::Error) -> Self {
        match err {
            netsight_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            netsight_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            err @ (netsight_api::Error::CaCertificate { .. }
            | netsight_api::Error::ClientBuild(_)) => CoreError::Config {
                message: err.to_string(),
            },
            netsight_api::Error::Api { status: 404, .. } => CoreError::NotFound,
            netsight_api::Error::Api { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                status: Some(status),
            },
            netsight_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
