// ── Core error types ──
//
// User-facing conditions raised by the dashboard core. Transport details
// from `hcdash-api` are folded into `NetworkFailure`, which keeps whatever
// body the backend sent so the dialogs can still display it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Request record not found: {id}")]
    RecordNotFound { id: String },

    // ── Network ──────────────────────────────────────────────────────
    #[error("Backend call failed: {message}")]
    NetworkFailure {
        message: String,
        /// HTTP status code (if the backend answered at all).
        status: Option<u16>,
        /// Raw response body, kept for display.
        body: Option<String>,
    },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Malformed request CSV: {message}")]
    MalformedCsv { message: String },

    #[error("No request data for bridge {bridge_id}")]
    EmptyDataset { bridge_id: String },

    #[error("Cannot load traffic log: {message}")]
    TrafficLog { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status carried by a network failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NetworkFailure { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hcdash_api::Error> for CoreError {
    fn from(err: hcdash_api::Error) -> Self {
        match err {
            hcdash_api::Error::Transport(ref e) => CoreError::NetworkFailure {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
                body: None,
            },
            hcdash_api::Error::Backend { status, body } => CoreError::NetworkFailure {
                message: format!("backend returned HTTP {status}"),
                status: Some(status),
                body: Some(body),
            },
            hcdash_api::Error::Csv { line, message } => CoreError::MalformedCsv {
                message: format!("line {line}: {message}"),
            },
            hcdash_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            hcdash_api::Error::Tls(message) => CoreError::Config { message },
        }
    }
}
