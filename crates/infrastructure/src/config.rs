use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use domain::range::{DEFAULT_REMAP_MAX, DEFAULT_REMAP_MIN};

/// Runtime settings of the bridge
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Integration domain used in device identifiers
    pub domain: String,
    pub manufacturer: String,
    /// Level scale used by `remap-to` / `remap-from` when no bounds are given
    pub level_min: f64,
    pub level_max: f64,
    /// JSON device catalog for the offline device manager
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            domain: "aqara".to_string(),
            manufacturer: domain::device::MANUFACTURER.to_string(),
            level_min: DEFAULT_REMAP_MIN,
            level_max: DEFAULT_REMAP_MAX,
            catalog_path: None,
        }
    }
}

impl BridgeConfig {
    /// Load settings for the run mode named by `RUN_MODE` (default `development`)
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_for_mode(config_dir, &run_mode)
    }

    pub fn load_for_mode(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let s = Config::builder()
            .set_default("domain", defaults.domain)?
            .set_default("manufacturer", defaults.manufacturer)?
            .set_default("level_min", defaults.level_min)?
            .set_default("level_max", defaults.level_max)?
            // Shared settings, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per run mode overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. BRIDGE__LEVEL_MAX=100)
            .add_source(Environment::with_prefix("BRIDGE").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.is_empty() {
            return Err(ConfigError::Message("domain must not be empty".into()));
        }
        if !self.level_min.is_finite() || !self.level_max.is_finite() {
            return Err(ConfigError::Message("level bounds must be finite".into()));
        }
        if self.level_min >= self.level_max {
            return Err(ConfigError::Message(format!(
                "level_min ({}) must be below level_max ({})",
                self.level_min, self.level_max
            )));
        }
        Ok(())
    }
}
