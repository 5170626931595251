// Bridge backend HTTP client
//
// Wraps `reqwest::Client` with the dashboard servlet's URL scheme: every
// endpoint is a sibling path of the configured base URL (`appliances`,
// `requests`) selected through `action` query parameters. Endpoint methods
// live in `appliances.rs` and `requests.rs` as inherent impls.

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the bridge dashboard backend.
///
/// All JSON endpoints return loosely-typed `serde_json::Value` payloads
/// because the dashboard renders them verbatim.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BridgeClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the dashboard root, e.g. `http://openhab:8080/homeconnect/`.
    /// A missing trailing slash is added so endpoint joins stay below it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
        }
    }

    /// The dashboard base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{endpoint}?k=v&...` with form-encoded query parameters.
    pub(crate) fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.base_url.join(endpoint)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON payload.
    pub(crate) async fn get_json(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        parse_payload(resp).await
    }

    /// Send a POST request with an optional raw body and decode the JSON payload.
    pub(crate) async fn post_json(&self, url: Url, body: Option<String>) -> Result<Value, Error> {
        debug!("POST {}", url);
        let mut builder = self.http.post(url);
        if let Some(body) = body {
            trace!(len = body.len(), "attaching raw request body");
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }
        let resp = builder.send().await?;
        parse_payload(resp).await
    }

    /// Send a GET request and return the body as text.
    pub(crate) async fn get_text(&self, url: Url) -> Result<String, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Decode a response into a JSON payload.
///
/// Non-success statuses become `Error::Backend` carrying the body. Success
/// bodies that are not JSON are returned as a JSON string so callers can
/// still render them; an empty body is `null`.
async fn parse_payload(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(Error::Backend {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
