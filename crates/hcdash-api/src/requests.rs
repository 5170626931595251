// Request log endpoints
//
// Per-bridge request statistics served by the `requests` servlet path.

use tracing::debug;

use crate::client::BridgeClient;
use crate::csv::{self, CsvDocument};
use crate::error::Error;

impl BridgeClient {
    /// Fetch the request-count time series for one bridge.
    ///
    /// `GET requests?bridgeId={bridge_id}&action=request-csv`
    ///
    /// Returns the decoded CSV; callers pick the `time` and `requests`
    /// columns out of each row.
    pub async fn request_csv(&self, bridge_id: &str) -> Result<CsvDocument, Error> {
        let url = self.endpoint_url(
            "requests",
            &[("bridgeId", bridge_id), ("action", "request-csv")],
        )?;
        debug!(bridge_id, "fetching request csv");
        let body = self.get_text(url).await?;
        csv::parse(&body)
    }
}
