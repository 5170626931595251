//! Configuration for the hcdash dashboard.
//!
//! TOML profiles merged with `HCDASH_`-prefixed environment variables, and
//! translation to `hcdash_core::DashboardConfig`. Each profile names one
//! bridge dashboard backend together with the bridges, appliances and API
//! actions the TUI lists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hcdash_core::{DashboardConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.clone() })?;
        Ok((name, profile))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_bin_size_ms")]
    pub bin_size_ms: i64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            bin_size_ms: default_bin_size_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_bin_size_ms() -> i64 {
    hcdash_core::histogram::DEFAULT_BIN_SIZE_MS
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Dashboard base URL (e.g., "http://openhab:8080/homeconnect").
    pub backend: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Traffic log export (JSON array of captured requests).
    pub traffic_log: Option<PathBuf>,

    /// Override histogram bin width.
    pub bin_size_ms: Option<i64>,

    #[serde(default)]
    pub bridges: Vec<BridgeEntry>,

    #[serde(default)]
    pub appliances: Vec<ApplianceEntry>,

    /// API actions offered for every appliance.
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionEntry>,
}

impl Profile {
    /// A bare profile for a backend given on the command line.
    pub fn for_backend(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            traffic_log: None,
            bin_size_ms: None,
            bridges: Vec::new(),
            appliances: Vec::new(),
            actions: default_actions(),
        }
    }
}

/// A bridge whose request histogram is shown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BridgeEntry {
    /// Bridge thing UID.
    pub id: String,
    pub label: Option<String>,
}

/// An appliance offered in the Appliances screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApplianceEntry {
    /// Appliance thing UID.
    pub thing_id: String,
    /// Home Connect appliance id.
    pub ha_id: Option<String>,
    pub label: Option<String>,
    /// Owning bridge UID.
    pub bridge_id: Option<String>,
}

/// One read-only backend action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionEntry {
    pub action: String,
    pub title: Option<String>,
}

fn default_actions() -> Vec<ActionEntry> {
    [
        ("show-details", "Details"),
        ("get-programs", "Programs"),
        ("get-available-programs", "Available programs"),
        ("get-active-program", "Active program"),
        ("get-selected-program", "Selected program"),
        ("get-operation-state", "Operation state"),
        ("get-power-state", "Power state"),
        ("get-door-state", "Door state"),
    ]
    .into_iter()
    .map(|(action, title)| ActionEntry {
        action: action.into(),
        title: Some(title.into()),
    })
    .collect()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hcdash", "hcdash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hcdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// Environment keys nest on double underscores:
/// `HCDASH_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HCDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DashboardConfig` from a profile and the global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let url: url::Url = profile
        .backend
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {}", profile.backend),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let bin_size_ms = profile.bin_size_ms.unwrap_or(defaults.bin_size_ms);
    if bin_size_ms <= 0 {
        return Err(ConfigError::Validation {
            field: "bin_size_ms".into(),
            reason: format!("must be positive, got {bin_size_ms}"),
        });
    }

    Ok(DashboardConfig {
        url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        bin_size_ms,
    })
}
