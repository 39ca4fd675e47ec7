use crate::domain::calendar::{CalendarConvention, Locale, MAX_OFFSET_MINUTES};
use serde::Deserialize;
use std::path::PathBuf;

/// Config file looked up relative to the working directory (extension optional)
pub const CONFIG_FILE: &str = "config/dashboard";

/// Prefix for environment overrides, e.g. `DASHBOARD__SERVER__BIND_ADDR`
pub const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub open_meteo: OpenMeteoSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenMeteoSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_hourly")]
    pub hourly: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenMeteoSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            hourly: default_hourly(),
            timezone: default_timezone(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

/// Locale and zone every bucket key is rendered in
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl AnalyticsSettings {
    pub fn calendar(&self) -> CalendarConvention {
        CalendarConvention::new(self.locale, self.utc_offset_minutes)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "https://archive-api.open-meteo.com".to_string()
}

fn default_latitude() -> f64 {
    -23.55
}

fn default_longitude() -> f64 {
    -46.63
}

fn default_hourly() -> String {
    "temperature_2m".to_string()
}

fn default_timezone() -> String {
    "auto".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("analytics.utc_offset_minutes must be within ±{max}, got {0}", max = MAX_OFFSET_MINUTES)]
    InvalidOffset(i32),
    #[error("open_meteo.timeout_secs must be greater than zero")]
    InvalidTimeout,
    #[error("open_meteo.latitude/longitude out of range: {0}, {1}")]
    InvalidCoordinates(f64, f64),
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.analytics.utc_offset_minutes;
        if offset.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidOffset(offset));
        }
        if self.open_meteo.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        let (lat, lon) = (self.open_meteo.latitude, self.open_meteo.longitude);
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ConfigError::InvalidCoordinates(lat, lon));
        }
        Ok(())
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `DASHBOARD__*` variables
pub fn load_config() -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    finish(builder)
}

/// Parse configuration from TOML text
pub fn parse_config(toml: &str) -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));

    finish(builder)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<AppConfig> {
    let settings: AppConfig = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
