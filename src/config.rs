//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chart::{MonospaceMeasure, Surface};
use crate::countdown::Countdown;
use crate::dashboard::DashboardConfig;
use crate::endpoint::SheetOptions;
use crate::guests::{GuestClientConfig, GuestVariant, PLACEHOLDER_ENDPOINT};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countdowns: CountdownsConfig,

    #[serde(default)]
    pub guests: GuestsConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Countdown targets
#[derive(Debug, Clone, Deserialize)]
pub struct CountdownsConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_dinner")]
    pub dinner: CountdownEntry,

    #[serde(default = "default_registration")]
    pub registration: CountdownEntry,
}

/// One countdown target
#[derive(Debug, Clone, Deserialize)]
pub struct CountdownEntry {
    /// RFC 3339 instant with offset, e.g. "2025-12-24T18:30:00+08:00"
    pub target: String,

    pub label: Option<String>,

    pub finished_message: Option<String>,
}

const DEFAULT_DINNER_TARGET: &str = "2025-12-24T18:30:00+08:00";
const DEFAULT_DINNER_MESSAGE: &str = "🎉 It's dinner time!";
const DEFAULT_REGISTRATION_TARGET: &str = "2025-12-16T23:59:00+08:00";
const DEFAULT_REGISTRATION_MESSAGE: &str = "Registration & payment period has ended.";

fn default_tick_interval() -> u64 {
    1000 // 1 second
}

fn default_dinner() -> CountdownEntry {
    CountdownEntry {
        target: DEFAULT_DINNER_TARGET.to_string(),
        label: None,
        finished_message: None,
    }
}

fn default_registration() -> CountdownEntry {
    CountdownEntry {
        target: DEFAULT_REGISTRATION_TARGET.to_string(),
        label: None,
        finished_message: None,
    }
}

impl Default for CountdownsConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            dinner: default_dinner(),
            registration: default_registration(),
        }
    }
}

/// Guest data endpoint polling
#[derive(Debug, Clone, Deserialize)]
pub struct GuestsConfig {
    /// Endpoint URL; the placeholder disables polling
    #[serde(default = "default_guest_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub variant: GuestVariant,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_guest_endpoint() -> String {
    PLACEHOLDER_ENDPOINT.to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for GuestsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_guest_endpoint(),
            variant: GuestVariant::default(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Chart surface
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_enabled")]
    pub enabled: bool,

    #[serde(default = "default_chart_width")]
    pub width: f64,

    #[serde(default = "default_chart_height")]
    pub height: f64,

    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,

    #[serde(default = "default_chart_output")]
    pub output: String,

    /// Average label character advance, in layout units
    #[serde(default = "default_char_width")]
    pub char_width: f64,
}

fn default_chart_enabled() -> bool {
    true
}

fn default_chart_width() -> f64 {
    400.0
}

fn default_chart_height() -> f64 {
    200.0
}

fn default_pixel_ratio() -> f64 {
    1.0
}

fn default_chart_output() -> String {
    "guests.svg".to_string()
}

fn default_char_width() -> f64 {
    MonospaceMeasure::default().char_width
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: default_chart_enabled(),
            width: default_chart_width(),
            height: default_chart_height(),
            pixel_ratio: default_pixel_ratio(),
            output: default_chart_output(),
            char_width: default_char_width(),
        }
    }
}

/// Sheet endpoint server
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// CSV export of the guest sheet
    #[serde(default = "default_sheet_path")]
    pub sheet_path: String,

    /// 0-indexed column whose non-empty cells count as confirmed (2 = column C)
    #[serde(default = "default_confirmed_column")]
    pub confirmed_column: usize,

    /// 0-indexed column to group confirmed guests by
    pub category_column: Option<usize>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_sheet_path() -> String {
    "guests.csv".to_string()
}

fn default_confirmed_column() -> usize {
    2
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sheet_path: default_sheet_path(),
            confirmed_column: default_confirmed_column(),
            category_column: None,
        }
    }
}

impl EndpointConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            path: PathBuf::from(&self.sheet_path),
            confirmed_column: self.confirmed_column,
            category_column: self.category_column,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("guestboard").join("config.toml")),
            Some(PathBuf::from("/etc/guestboard/config.toml")),
            Some(PathBuf::from("./guestboard.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Guest overrides
        if let Some(endpoint) = var("GUESTBOARD_ENDPOINT") {
            self.guests.endpoint = endpoint;
        }
        if let Some(variant) = var("GUESTBOARD_VARIANT") {
            match variant.parse() {
                Ok(v) => self.guests.variant = v,
                Err(e) => tracing::warn!("Ignoring GUESTBOARD_VARIANT: {}", e),
            }
        }

        // Chart overrides
        if let Some(output) = var("GUESTBOARD_CHART_OUTPUT") {
            self.chart.output = output;
        }

        // Endpoint overrides
        if let Some(sheet_path) = var("GUESTBOARD_SHEET_PATH") {
            self.endpoint.sheet_path = sheet_path;
        }
        if let Some(port) = var("GUESTBOARD_PORT") {
            if let Ok(p) = port.parse() {
                self.endpoint.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = var("GUESTBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("GUESTBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate and convert into the runtime dashboard configuration
    pub fn dashboard(&self) -> Result<DashboardConfig, ConfigError> {
        let dinner = countdown(
            "dinner",
            &self.countdowns.dinner,
            "Dinner",
            DEFAULT_DINNER_MESSAGE,
        )?;
        let registration = countdown(
            "registration",
            &self.countdowns.registration,
            "Registration",
            DEFAULT_REGISTRATION_MESSAGE,
        )?;

        if self.countdowns.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "countdowns.tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.guests.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "guests.poll_interval_secs must be positive".to_string(),
            ));
        }
        if self.guests.request_timeout_secs == 0
            || self.guests.request_timeout_secs >= self.guests.poll_interval_secs
        {
            return Err(ConfigError::Invalid(format!(
                "guests.request_timeout_secs must be between 1 and {} (below poll_interval_secs)",
                self.guests.poll_interval_secs.saturating_sub(1)
            )));
        }
        if !(self.chart.width > 0.0 && self.chart.height > 0.0) {
            return Err(ConfigError::Invalid(
                "chart.width and chart.height must be positive".to_string(),
            ));
        }
        if !(self.chart.char_width > 0.0) {
            return Err(ConfigError::Invalid(
                "chart.char_width must be positive".to_string(),
            ));
        }

        Ok(DashboardConfig {
            dinner,
            registration,
            tick_interval: Duration::from_millis(self.countdowns.tick_interval_ms),
            guests: GuestClientConfig {
                endpoint: self.guests.endpoint.clone(),
                variant: self.guests.variant,
                request_timeout: Duration::from_secs(self.guests.request_timeout_secs),
            },
            poll_interval: Duration::from_secs(self.guests.poll_interval_secs),
            surface: Surface::new(self.chart.width, self.chart.height)
                .with_pixel_ratio(self.chart.pixel_ratio),
            measure: MonospaceMeasure {
                char_width: self.chart.char_width,
            },
        })
    }
}

fn countdown(
    name: &str,
    entry: &CountdownEntry,
    default_label: &str,
    default_message: &str,
) -> Result<Countdown, ConfigError> {
    let target = parse_target(&entry.target).map_err(|e| ConfigError::InvalidTarget {
        name: name.to_string(),
        value: entry.target.clone(),
        error: e.to_string(),
    })?;

    Ok(Countdown::new(
        entry.label.as_deref().unwrap_or(default_label),
        target,
        entry
            .finished_message
            .as_deref()
            .unwrap_or(default_message),
    ))
}

/// Parse an RFC 3339 instant with an explicit offset
pub fn parse_target(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid {name} target {value:?}: {error}")]
    InvalidTarget {
        name: String,
        value: String,
        error: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Guestboard Configuration
#
# Environment variables override these settings:
# - GUESTBOARD_ENDPOINT
# - GUESTBOARD_VARIANT
# - GUESTBOARD_CHART_OUTPUT
# - GUESTBOARD_SHEET_PATH
# - GUESTBOARD_PORT
# - GUESTBOARD_LOG_LEVEL
# - GUESTBOARD_LOG_FORMAT

[countdowns]
# How often the countdowns refresh (ms)
tick_interval_ms = 1000

[countdowns.dinner]
# Event time with UTC offset
target = "2025-12-24T18:30:00+08:00"
label = "Dinner"
finished_message = "🎉 It's dinner time!"

[countdowns.registration]
target = "2025-12-16T23:59:00+08:00"
label = "Registration"
finished_message = "Registration & payment period has ended."

[guests]
# Guest data endpoint (GET, JSON). Leave the placeholder to disable polling.
endpoint = "PASTE_YOUR_WEB_APP_URL_HERE"

# Response shape: count, chart or auto
variant = "auto"

# How often to poll the endpoint (seconds)
poll_interval_secs = 30

# Request timeout (seconds, must stay below poll_interval_secs)
request_timeout_secs = 10

[chart]
# Write the attendance chart as SVG
enabled = true

# Surface size in layout units
width = 400
height = 200

# Device pixels per layout unit
pixel_ratio = 1.0

# Output file
output = "guests.svg"

# Average label character width used for word wrapping
char_width = 6.5

[endpoint]
# Sheet endpoint server host and port
host = "0.0.0.0"
port = 8090

# CSV export of the guest sheet (first row is the header)
sheet_path = "guests.csv"

# Column whose non-empty cells count as confirmed guests (0 = A, 2 = C)
confirmed_column = 2

# Optional column to group confirmed guests by
# category_column = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.countdowns.tick_interval_ms, 1000);
        assert_eq!(config.guests.endpoint, PLACEHOLDER_ENDPOINT);
        assert_eq!(config.guests.poll_interval_secs, 30);
        assert_eq!(config.chart.width, 400.0);
        assert_eq!(config.endpoint.confirmed_column, 2);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_matches_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.countdowns.dinner.target, defaults.countdowns.dinner.target);
        assert_eq!(config.guests.endpoint, defaults.guests.endpoint);
        assert_eq!(config.guests.variant, defaults.guests.variant);
        assert_eq!(config.chart.output, defaults.chart.output);
        assert_eq!(config.endpoint.port, defaults.endpoint.port);
        assert!(config.dashboard().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [countdowns.dinner]
            target = "2026-01-01T19:00:00+01:00"

            [guests]
            endpoint = "http://localhost:8090/"
            variant = "chart"
            "#,
        )
        .unwrap();

        assert_eq!(config.guests.variant, GuestVariant::Chart);
        assert_eq!(config.countdowns.registration.target, DEFAULT_REGISTRATION_TARGET);

        let dashboard = config.dashboard().unwrap();
        assert_eq!(dashboard.dinner.name(), "Dinner");
        assert_eq!(dashboard.dinner.finished_message(), DEFAULT_DINNER_MESSAGE);
        assert_eq!(
            dashboard.dinner.target_ms(),
            parse_target("2026-01-01T18:00:00Z").unwrap().timestamp_millis()
        );
        assert!(dashboard.guests.is_configured());
        assert_eq!(dashboard.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_target() {
        let mut config = Config::default();
        config.countdowns.registration.target = "next tuesday".to_string();

        let err = config.dashboard().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget { ref name, .. } if name == "registration"));
    }

    #[test]
    fn test_target_requires_offset() {
        assert!(parse_target("2025-12-24T18:30:00").is_err());
        assert!(parse_target("2025-12-24T18:30:00+08:00").is_ok());
    }

    #[test]
    fn test_invalid_intervals() {
        let mut config = Config::default();
        config.guests.poll_interval_secs = 0;
        assert!(matches!(config.dashboard(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.chart.height = -5.0;
        assert!(matches!(config.dashboard(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_request_timeout_below_poll_interval() {
        let mut config = Config::default();
        config.guests.poll_interval_secs = 5;
        config.guests.request_timeout_secs = 5;
        assert!(matches!(config.dashboard(), Err(ConfigError::Invalid(_))));

        config.guests.request_timeout_secs = 0;
        assert!(matches!(config.dashboard(), Err(ConfigError::Invalid(_))));

        config.guests.request_timeout_secs = 4;
        let dashboard = config.dashboard().unwrap();
        assert_eq!(dashboard.guests.request_timeout, Duration::from_secs(4));
        assert_eq!(dashboard.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_default_finished_messages() {
        let dashboard = Config::default().dashboard().unwrap();
        assert_eq!(dashboard.dinner.finished_message(), "🎉 It's dinner time!");
        assert_eq!(
            dashboard.registration.finished_message(),
            "Registration & payment period has ended."
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GUESTBOARD_ENDPOINT", "http://sheet.local/guests"),
            ("GUESTBOARD_VARIANT", "count"),
            ("GUESTBOARD_PORT", "9000"),
            ("GUESTBOARD_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.guests.endpoint, "http://sheet.local/guests");
        assert_eq!(config.guests.variant, GuestVariant::Count);
        assert_eq!(config.endpoint.port, 9000);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_variant_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "GUESTBOARD_VARIANT").then(|| "pie".to_string()));
        assert_eq!(config.guests.variant, GuestVariant::Auto);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nwidth = 640\noutput = \"out.svg\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.chart.width, 640.0);
        assert_eq!(config.chart.output, "out.svg");
    }

    #[test]
    fn test_load_errors() {
        let err = Config::load(Path::new("/nonexistent/guestboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[guests\nendpoint = 1").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
