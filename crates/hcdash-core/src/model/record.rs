// ── Captured traffic records ──
//
// One record per vendor-API exchange the bridge logged. Records are loaded
// once from the bridge's JSON export and never mutated afterwards.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

// ── RecordId ─────────────────────────────────────────────────────────

/// Identifier of a captured request.
///
/// The export writes ids as JSON numbers, while the UI hands them back as
/// strings, so both forms are accepted and compared loosely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(serde_json::Number),
    Text(String),
}

impl RecordId {
    /// Loose equality: identical string forms, or both sides numeric with
    /// the same value (`"07"` matches `7`). Blank strings never count as
    /// numbers.
    #[allow(clippy::float_cmp)]
    pub fn loosely_matches(&self, other: &RecordId) -> bool {
        if self.to_string() == other.to_string() {
            return true;
        }
        match (self.numeric_value(), other.numeric_value()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Hashable form under which two ids collide exactly when they match
    /// loosely.
    #[allow(clippy::float_cmp)]
    pub(crate) fn lookup_key(&self) -> IdKey {
        match self.numeric_value() {
            // -0 and 0 compare equal, so they must hash alike
            Some(v) if v == 0.0 => IdKey::Number(0.0_f64.to_bits()),
            Some(v) => IdKey::Number(v.to_bits()),
            None => IdKey::Text(self.to_string()),
        }
    }

    fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Numeric(n) => n.as_f64(),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
            }
        }
    }
}

/// See [`RecordId::lookup_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum IdKey {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::Numeric(n.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ── Record ───────────────────────────────────────────────────────────

/// A captured request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRecord {
    pub id: RecordId,
    /// Capture time as exported (free-form).
    #[serde(default, deserialize_with = "scalar_string")]
    pub time: Option<String>,
    pub home_connect_request: RequestCapture,
    #[serde(default)]
    pub home_connect_response: Option<ResponseCapture>,
}

impl TrafficRecord {
    pub fn method(&self) -> &str {
        &self.home_connect_request.method
    }

    pub fn url(&self) -> &str {
        &self.home_connect_request.url
    }

    /// Response status code, if a response was captured with one.
    pub fn status(&self) -> Option<u16> {
        self.home_connect_response.as_ref().and_then(|r| r.code)
    }
}

/// Outgoing half of a captured exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCapture {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub header: IndexMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Incoming half of a captured exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseCapture {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub header: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Accept a string or a number and keep its text form.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(t) => t,
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_ids_match_loosely() {
        let stored: RecordId = serde_json::from_str("7").unwrap();
        assert!(stored.loosely_matches(&RecordId::from("7")));
        assert!(stored.loosely_matches(&RecordId::from("07")));
        assert!(stored.loosely_matches(&RecordId::from(7)));
        assert!(!stored.loosely_matches(&RecordId::from("8")));
    }

    #[test]
    fn blank_text_never_matches_zero() {
        let zero = RecordId::from(0);
        assert!(!zero.loosely_matches(&RecordId::from("")));
        assert!(!zero.loosely_matches(&RecordId::from("  ")));
    }

    #[test]
    fn text_ids_compare_by_string() {
        let id = RecordId::from("abc");
        assert!(id.loosely_matches(&RecordId::from("abc")));
        assert!(!id.loosely_matches(&RecordId::from("ABC")));
    }

    #[test]
    fn record_deserializes_from_export() {
        let json = r#"{
            "id": 12,
            "time": 1700000000000,
            "homeConnectRequest": {
                "method": "GET",
                "url": "https://api.home-connect.com/api/homeappliances",
                "header": { "Accept": "application/vnd.bsh.sdk.v1+json", "Authorization": "Bearer ..." }
            },
            "homeConnectResponse": { "code": 200, "body": "{}" }
        }"#;

        let record: TrafficRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.to_string(), "12");
        assert_eq!(record.time.as_deref(), Some("1700000000000"));
        assert_eq!(record.method(), "GET");
        assert_eq!(record.status(), Some(200));
        let keys: Vec<_> = record.home_connect_request.header.keys().collect();
        assert_eq!(keys, vec!["Accept", "Authorization"]);
        assert!(record.home_connect_request.body.is_none());
    }
}
