// ── Backend seam ──
//
// Dialog controllers describe the call they want as a `BackendRequest`; the
// UI hands it to a `Backend` on a spawned task. `BridgeClient` is the real
// implementation, tests plug in canned ones.

use std::future::Future;

use hcdash_api::{BridgeClient, CsvDocument};
use serde_json::Value;

use crate::error::CoreError;
use crate::payload::{CallFailure, Payload};

/// One call against the bridge backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    /// Read-only appliance action (`GET appliances`).
    ApplianceAction { thing_id: String, action: String },
    /// Raw GET proxied to the vendor API.
    RawGet { thing_id: String, path: String },
    /// Raw PUT proxied to the vendor API, body forwarded verbatim.
    RawPut {
        thing_id: String,
        path: String,
        body: String,
    },
}

impl BackendRequest {
    pub fn thing_id(&self) -> &str {
        match self {
            Self::ApplianceAction { thing_id, .. }
            | Self::RawGet { thing_id, .. }
            | Self::RawPut { thing_id, .. } => thing_id,
        }
    }

    /// The `action` query parameter this request is sent with.
    pub fn action(&self) -> &str {
        match self {
            Self::ApplianceAction { action, .. } => action,
            Self::RawGet { .. } => hcdash_api::appliances::ACTION_GET_RAW,
            Self::RawPut { .. } => hcdash_api::appliances::ACTION_PUT_RAW,
        }
    }
}

/// Async access to the bridge backend.
pub trait Backend: Send + Sync {
    fn call(&self, request: &BackendRequest) -> impl Future<Output = Result<Value, CoreError>> + Send;

    fn request_csv(&self, bridge_id: &str) -> impl Future<Output = Result<CsvDocument, CoreError>> + Send;
}

impl Backend for BridgeClient {
    async fn call(&self, request: &BackendRequest) -> Result<Value, CoreError> {
        let result = match request {
            BackendRequest::ApplianceAction { thing_id, action } => {
                self.appliance_action(thing_id, action).await
            }
            BackendRequest::RawGet { thing_id, path } => self.raw_get(thing_id, path).await,
            BackendRequest::RawPut {
                thing_id,
                path,
                body,
            } => self.raw_put(thing_id, path, body).await,
        };
        Ok(result?)
    }

    async fn request_csv(&self, bridge_id: &str) -> Result<CsvDocument, CoreError> {
        Ok(BridgeClient::request_csv(self, bridge_id).await?)
    }
}

/// Run a dialog request and shape the outcome for `format_payload`.
pub async fn execute<B: Backend>(backend: &B, request: &BackendRequest) -> Result<Payload, CallFailure> {
    backend.call(request).await.map_err(|e| {
        tracing::warn!(
            thing_id = request.thing_id(),
            action = request.action(),
            error = %e,
            "backend call failed"
        );
        CallFailure::from(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Canned backend: answers calls with a fixed payload and serves CSV
    /// bodies per bridge id.
    #[derive(Default)]
    pub struct CannedBackend {
        pub payload: Option<Value>,
        pub csv: HashMap<String, Result<String, u16>>,
        pub calls: Mutex<Vec<BackendRequest>>,
    }

    impl Backend for CannedBackend {
        async fn call(&self, request: &BackendRequest) -> Result<Value, CoreError> {
            self.calls.lock().unwrap().push(request.clone());
            self.payload.clone().ok_or(CoreError::NetworkFailure {
                message: "backend returned HTTP 500".into(),
                status: Some(500),
                body: Some("{\"error\":\"canned\"}".into()),
            })
        }

        async fn request_csv(&self, bridge_id: &str) -> Result<CsvDocument, CoreError> {
            match self.csv.get(bridge_id) {
                Some(Ok(body)) => Ok(hcdash_api::csv::parse(body)?),
                Some(Err(status)) => Err(hcdash_api::Error::Backend {
                    status: *status,
                    body: String::new(),
                }
                .into()),
                None => Err(hcdash_api::Error::Backend {
                    status: 404,
                    body: String::new(),
                }
                .into()),
            }
        }
    }
}
