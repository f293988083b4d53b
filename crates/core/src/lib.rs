//! Aero Core Library
//!
//! Shared utilities for the aero air-quality service:
//! - Configuration loading (XDG-compliant)
//! - App-wide constants

mod config;

pub use config::{find_config_file, load_config, ConfigSource};

/// Application name used for XDG paths
pub const APP_NAME: &str = "aero";

/// Default server port
pub const DEFAULT_PORT: u16 = 9810;

/// Default upstream hourly air-quality provider
pub const DEFAULT_PROVIDER_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Default timeout for forecast provider calls (seconds)
pub const DEFAULT_FORECAST_TIMEOUT: u64 = 30;

/// Default timeout for historical provider calls (seconds)
pub const DEFAULT_HISTORICAL_TIMEOUT: u64 = 60;
