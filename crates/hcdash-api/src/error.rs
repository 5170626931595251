use thiserror::Error;

/// Top-level error type for the `hcdash-api` crate.
///
/// Covers every failure mode of the bridge backend surface: transport,
/// non-success HTTP responses, and CSV decoding. `hcdash-core` maps these
/// into user-facing conditions.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// The backend answered with a non-success status. The raw body is kept
    /// so the dashboard can still show whatever the bridge sent back.
    #[error("Backend returned HTTP {status}")]
    Backend { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The request-count CSV could not be decoded.
    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },
}

impl Error {
    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body for backend errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Backend { body, .. } => Some(body),
            _ => None,
        }
    }
}
