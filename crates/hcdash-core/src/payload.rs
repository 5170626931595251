// ── Payload formatting ──
//
// Success and failure responses go through the same formatter so the
// operator always sees the raw payload. Failures add a banner on top.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::CoreError;

/// A backend response payload, rendered verbatim.
pub type Payload = Value;

/// A failed backend call, with whatever payload the backend sent back.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFailure {
    pub status: Option<u16>,
    pub message: String,
    pub payload: Payload,
}

impl CallFailure {
    /// Banner text shown above the payload.
    pub fn banner(&self) -> String {
        match self.status {
            Some(status) => format!("Request failed (HTTP {status})"),
            None => format!("Request failed: {}", self.message),
        }
    }
}

impl From<CoreError> for CallFailure {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NetworkFailure {
                message,
                status,
                body,
            } => {
                let payload = match body {
                    Some(body) if !body.trim().is_empty() => {
                        serde_json::from_str(&body).unwrap_or(Value::String(body))
                    }
                    _ => serde_json::json!({ "error": message }),
                };
                Self {
                    status,
                    message,
                    payload,
                }
            }
            other => {
                let message = other.to_string();
                Self {
                    status: None,
                    payload: serde_json::json!({ "error": message }),
                    message,
                }
            }
        }
    }
}

/// Rendered response area content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPayload {
    /// Error banner, present only for failures.
    pub banner: Option<String>,
    /// Tab-indented pretty JSON.
    pub text: String,
}

impl RenderedPayload {
    pub fn is_failure(&self) -> bool {
        self.banner.is_some()
    }
}

/// Format a call result for display.
pub fn format_payload(result: &Result<Payload, CallFailure>) -> RenderedPayload {
    match result {
        Ok(payload) => RenderedPayload {
            banner: None,
            text: pretty_json(payload),
        },
        Err(failure) => RenderedPayload {
            banner: Some(failure.banner()),
            text: pretty_json(&failure.payload),
        },
    }
}

/// Pretty-print JSON with tab indentation, keys in source order.
pub fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}
