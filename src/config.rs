//! Configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Geocoding requests may not time out sooner than this
const MIN_HTTP_TIMEOUT_SECS: u64 = 10;

/// Locations of the static datasets
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetPaths {
    pub stations: PathBuf,
    pub ev_specs: PathBuf,
    pub ev_prices: PathBuf,
    pub gas_prices: PathBuf,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouteService API key (required for road distances)
    pub ors_api_key: Option<String>,

    /// OpenRouteService base URL
    pub ors_base_url: String,

    /// OpenRouteService routing profile
    pub ors_profile: String,

    /// Nominatim API URL (for geocoding)
    pub nominatim_url: String,

    /// Client identifier sent to the geocoder
    pub geocoder_user_agent: String,

    /// Minimum interval between geocoding requests
    pub nominatim_rate_limit: Duration,

    /// Timeout for every outbound HTTP request
    pub http_timeout: Duration,

    pub datasets: DatasetPaths,
}

/// Shape of the optional keys file
#[derive(Debug, Deserialize)]
struct KeysFile {
    #[serde(rename = "ORS_API_KEY")]
    ors_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let ors_api_key = match var("ORS_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(key) => Some(key),
            None => read_keys_file(Path::new(&get("ORS_KEYS_FILE", "keys.json")))?,
        };

        let http_timeout_secs: u64 = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a number of seconds, got '{}'", raw))?,
            None => MIN_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs < MIN_HTTP_TIMEOUT_SECS {
            tracing::warn!(
                "HTTP_TIMEOUT_SECS={} is below the minimum, using {}",
                http_timeout_secs,
                MIN_HTTP_TIMEOUT_SECS
            );
        }

        let rate_limit_ms: u64 = match var("NOMINATIM_RATE_LIMIT_MS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("NOMINATIM_RATE_LIMIT_MS must be milliseconds, got '{}'", raw))?,
            None => 1000,
        };

        Ok(Self {
            ors_api_key,
            ors_base_url: get("ORS_BASE_URL", "https://api.openrouteservice.org"),
            ors_profile: get("ORS_PROFILE", "driving-car"),
            nominatim_url: get("NOMINATIM_URL", "https://nominatim.openstreetmap.org"),
            geocoder_user_agent: get("GEOCODER_USER_AGENT", "ev_gas_analysis"),
            nominatim_rate_limit: Duration::from_millis(rate_limit_ms),
            http_timeout: Duration::from_secs(http_timeout_secs.max(MIN_HTTP_TIMEOUT_SECS)),
            datasets: DatasetPaths {
                stations: get("STATIONS_CSV", "data/fuel_stations_cleaned.csv").into(),
                ev_specs: get("EV_SPECS_CSV", "data/ev_specs.csv").into(),
                ev_prices: get("EV_PRICES_CSV", "data/ev_prices.csv").into(),
                gas_prices: get("GAS_PRICES_CSV", "data/gas_prices.csv").into(),
            },
        })
    }

    /// The routing credential, which only `analyze` needs
    pub fn require_ors_api_key(&self) -> Result<&str> {
        self.ors_api_key
            .as_deref()
            .context("ORS_API_KEY must be set (environment, .env, or keys.json)")
    }
}

/// Read `ORS_API_KEY` from a JSON keys file. A missing file is not an error.
fn read_keys_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keys file {}", path.display()))?;
    let keys: KeysFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid keys file {}", path.display()))?;

    Ok(keys.ors_api_key.filter(|k| !k.trim().is_empty()))
}
