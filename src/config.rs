//! Runtime configuration
//!
//! The settings live in `config.toml` at the crate root, which `build.rs`
//! embeds into the firmware. See `config.example.toml` for every key.
//! Missing keys fall back to the defaults below.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Configuration document embedded at build time (may be empty)
pub const EMBEDDED_CONFIG: &str = include_str!(concat!(env!("OUT_DIR"), "/config.toml"));

/// Forecast page that the QR code points to when no explicit text is set
const FORECAST_PAGE_URL: &str = "https://www.yr.no/nb/v%C3%A6rvarsel/daglegvarsel";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debug mode, raises the log level
    pub debug: bool,
    pub wifi: WifiConfig,
    pub forecast: ForecastConfig,
    pub battery: BatteryConfig,
    pub qrcode: QrCodeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Sent to YR.no, change it to avoid getting blocked
    pub user_agent: String,
    pub location_id: String,
    /// When false, the graph is replaced with a "no precipitation" message
    pub show_graph_on_no_precipitation: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            user_agent: String::from("epaper/1.0 [YOUR_GITHUB_USERNAME]"),
            location_id: String::new(),
            show_graph_on_no_precipitation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Voltage of a full cell
    pub max_voltage: f32,
    /// Voltage at which the cell counts as empty
    pub min_voltage: f32,
    pub show_indicator: bool,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            max_voltage: 4.2,
            min_voltage: 3.3,
            show_indicator: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QrCodeConfig {
    /// Payload, defaults to the forecast page
    pub text: Option<String>,
    /// Nudge added to the centering offset, in pixels
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration compiled into the firmware
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_CONFIG)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.battery.max_voltage > self.battery.min_voltage,
            "battery.max_voltage ({}) must be greater than battery.min_voltage ({})",
            self.battery.max_voltage,
            self.battery.min_voltage
        );
        ensure!(
            self.battery.min_voltage >= 0.0,
            "battery.min_voltage must not be negative"
        );
        Ok(())
    }

    /// Whether Wi-Fi credentials were configured at all
    ///
    /// The firmware does not use the network yet, the credentials are only
    /// parsed and validated.
    pub fn has_wifi(&self) -> bool {
        !self.wifi.ssid.is_empty()
    }

    /// Text encoded into the QR code
    pub fn qr_text(&self) -> String {
        match &self.qrcode.text {
            Some(text) => text.clone(),
            None if self.forecast.location_id.is_empty() => String::from("https://www.yr.no"),
            None => format!("{}/{}", FORECAST_PAGE_URL, self.forecast.location_id),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}
