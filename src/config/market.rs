//! Market tuning configuration, loaded from market.toml
//!
//! The simulator's knobs - tick interval, jitter and drift bounds, the price
//! floor - plus the role names allowed to run privileged balance operations.
//! Every field has a sensible default, so a missing file or a partial file
//! both work.

use crate::auth::RoleSet;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Seconds between market ticks (10 minutes).
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 600;
/// Maximum +/- fractional move per tick from jitter (5%).
pub const DEFAULT_MAX_JITTER_PCT: f64 = 0.05;
/// Drift bound; the drawn drift is centered on zero with magnitude <= half this (1%).
pub const DEFAULT_DRIFT_PCT: f64 = 0.01;
/// Floor applied to every written price, to avoid zero/negative prices.
pub const MIN_PRICE: f64 = 1.0;

/// Tuning knobs for the market simulator and privileged operations.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Seconds between market ticks
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Maximum +/- fractional price move per tick from jitter
    #[serde(default = "default_max_jitter_pct")]
    pub max_jitter_pct: f64,
    /// Drift bound; drawn drift is centered on zero with magnitude <= half this
    #[serde(default = "default_drift_pct")]
    pub drift_pct: f64,
    /// Floor applied to every written price
    #[serde(default = "default_price_floor")]
    pub price_floor: f64,
    /// Role names whose holders may run fund/defund
    #[serde(default)]
    pub admin_roles: Vec<String>,
}

const fn default_tick_interval_secs() -> u64 {
    DEFAULT_TICK_INTERVAL_SECS
}

const fn default_max_jitter_pct() -> f64 {
    DEFAULT_MAX_JITTER_PCT
}

const fn default_drift_pct() -> f64 {
    DEFAULT_DRIFT_PCT
}

const fn default_price_floor() -> f64 {
    MIN_PRICE
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            max_jitter_pct: DEFAULT_MAX_JITTER_PCT,
            drift_pct: DEFAULT_DRIFT_PCT,
            price_floor: MIN_PRICE,
            admin_roles: Vec::new(),
        }
    }
}

impl MarketConfig {
    /// The configured admin roles as a capability set for authorization checks.
    #[must_use]
    pub fn admin_role_set(&self) -> RoleSet {
        self.admin_roles.iter().cloned().collect()
    }
}

/// Loads market configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the market.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MarketConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse market.toml: {e}"),
    })
}

/// Loads market configuration from the default location (./market.toml),
/// falling back to the built-in defaults when the file does not exist.
pub fn load_default_config() -> Result<MarketConfig> {
    let path = Path::new("market.toml");
    if path.exists() {
        load_config(path)
    } else {
        Ok(MarketConfig::default())
    }
}
