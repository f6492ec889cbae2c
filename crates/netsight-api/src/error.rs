use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong talking to the analyzer server.
#[derive(Debug, Error)]
pub enum Error {
    // ── Client setup ────────────────────────────────────────────────
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Cannot load CA certificate {}: {reason}", path.display())]
    CaCertificate { path: PathBuf, reason: String },

    #[error("Cannot build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    // ── Request ─────────────────────────────────────────────────────
    /// Connection, DNS, timeout or body read failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// The body was not the expected JSON; `body` keeps the raw text.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Timeouts, refused connections, rate limiting and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
