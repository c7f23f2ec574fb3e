/// Service configuration for the geospatial core.
///
/// Configuration is read once at startup from an optional TOML file, with
/// environment variables (loaded via `dotenv`) overriding the API section.
/// Every field has a default, so an absent file yields a working local
/// configuration.

use serde::Deserialize;

use crate::model::LatLon;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Aggregation API connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the aggregation service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default map viewport: national extent, zoom range matching the tile
/// layer's configured limits.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDefaults {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
}

impl MapDefaults {
    pub fn center(&self) -> LatLon {
        LatLon::new(self.center_lat, self.center_lon)
    }
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

fn default_center_lat() -> f64 {
    20.5937
}

fn default_center_lon() -> f64 {
    78.9629
}

fn default_zoom() -> u8 {
    5
}

fn default_min_zoom() -> u8 {
    4
}

fn default_max_zoom() -> u8 {
    10
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub map: MapDefaults,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Errors loading or parsing the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parses a TOML configuration string. Missing sections and fields fall
/// back to defaults.
pub fn load_from_str(raw: &str) -> Result<ServiceConfig, ConfigError> {
    toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Reads and parses a configuration file.
pub fn load(path: &str) -> Result<ServiceConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    load_from_str(&raw)
}

/// Builds a configuration from defaults plus environment overrides.
/// `.env` is honored if present (`dotenv`), then `GWMON_API_BASE_URL` and
/// `GWMON_API_TIMEOUT_SECS` override the API section.
pub fn from_env() -> ServiceConfig {
    dotenv::dotenv().ok();
    let mut config = ServiceConfig::default();
    if let Ok(base_url) = std::env::var("GWMON_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Ok(timeout) = std::env::var("GWMON_API_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse() {
            config.api.timeout_secs = secs;
        }
    }
    config
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
