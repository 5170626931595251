// ── Runtime connection configuration ──
//
// These types describe how to reach the bridge dashboard backend. They never
// touch disk: the config crate or the TUI builds a `DashboardConfig` and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use hcdash_api::{BridgeClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;
use crate::histogram::DEFAULT_BIN_SIZE_MS;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed bridges).
    DangerAcceptInvalid,
}

/// Configuration for talking to one bridge dashboard backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dashboard root, e.g. `http://openhab:8080/homeconnect/`.
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Histogram bin width in milliseconds.
    pub bin_size_ms: i64,
}

impl DashboardConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            bin_size_ms: DEFAULT_BIN_SIZE_MS,
        }
    }

    /// Transport settings for the HTTP layer.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build a backend client for this configuration.
    pub fn connect(&self) -> Result<BridgeClient, CoreError> {
        Ok(BridgeClient::new(self.url.clone(), &self.transport())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_system_roots_and_one_second_bins() {
        let cfg = DashboardConfig::new(Url::parse("http://openhab:8080/homeconnect").unwrap());
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.bin_size_ms, 1000);
        assert_eq!(cfg.transport().timeout, Duration::from_secs(30));
    }

    #[test]
    fn connect_normalizes_base_url() {
        let cfg = DashboardConfig::new(Url::parse("http://openhab:8080/homeconnect").unwrap());
        let client = cfg.connect().unwrap();
        assert_eq!(client.base_url().as_str(), "http://openhab:8080/homeconnect/");
    }
}
