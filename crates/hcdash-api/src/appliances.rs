// Appliance endpoints
//
// Read-only actions and raw vendor-API proxy calls, all routed through the
// `appliances` servlet path.

use serde_json::Value;
use tracing::debug;

use crate::client::BridgeClient;
use crate::error::Error;

/// Backend action name for a raw GET-style proxy call.
pub const ACTION_GET_RAW: &str = "get-raw";
/// Backend action name for a raw PUT-style proxy call.
pub const ACTION_PUT_RAW: &str = "put-raw";

impl BridgeClient {
    /// Run a read-only appliance action (status, programs, etc.).
    ///
    /// `GET appliances?thingId={thing_id}&action={action}`
    pub async fn appliance_action(&self, thing_id: &str, action: &str) -> Result<Value, Error> {
        let url = self.endpoint_url("appliances", &[("thingId", thing_id), ("action", action)])?;
        debug!(thing_id, action, "running appliance action");
        self.get_json(url).await
    }

    /// Proxy a raw GET against the vendor API for one appliance.
    ///
    /// `POST appliances?thingId={thing_id}&action=get-raw&path={path}`
    pub async fn raw_get(&self, thing_id: &str, path: &str) -> Result<Value, Error> {
        let url = self.endpoint_url(
            "appliances",
            &[("thingId", thing_id), ("action", ACTION_GET_RAW), ("path", path)],
        )?;
        debug!(thing_id, path, "raw get");
        self.post_json(url, None).await
    }

    /// Proxy a raw PUT against the vendor API for one appliance. The body is
    /// forwarded exactly as typed by the operator.
    ///
    /// `POST appliances?thingId={thing_id}&action=put-raw&path={path}`
    pub async fn raw_put(&self, thing_id: &str, path: &str, body: &str) -> Result<Value, Error> {
        let url = self.endpoint_url(
            "appliances",
            &[("thingId", thing_id), ("action", ACTION_PUT_RAW), ("path", path)],
        )?;
        debug!(thing_id, path, body_len = body.len(), "raw put");
        self.post_json(url, Some(body.to_owned())).await
    }
}
