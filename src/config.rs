//! Panel configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Numeric values that are missing or unparsable fall back to
//! their defaults; only the device host is validated.

use std::time::Duration;

use crate::connection::Endpoint;
use crate::domain::Rgb;
use crate::error::PanelError;

/// Default device host: the ESP32 soft-AP gateway address.
pub const DEFAULT_DEVICE_HOST: &str = "192.168.4.1";

/// Default delay before a reconnect attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Default sync/transmit period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level panel configuration.
///
/// Loaded once at startup via [`PanelConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// WebSocket endpoint derived from `DEVICE_HOST`.
    pub endpoint: Endpoint,

    /// One-shot delay between a close and the next connection attempt.
    pub reconnect_delay: Duration,

    /// Period of the sync/transmit tick.
    pub tick_interval: Duration,

    /// Slider positions at startup.
    pub initial: Rgb,

    /// Log line format.
    pub log_format: LogFormat,
}

impl PanelConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `DEVICE_HOST` is set but invalid, or if
    /// `LOG_FORMAT` names an unknown format.
    pub fn from_env() -> Result<Self, PanelError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PanelConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PanelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("DEVICE_HOST").unwrap_or_else(|| DEFAULT_DEVICE_HOST.to_string());
        let endpoint = Endpoint::from_host(&host)?;

        let reconnect_delay = Duration::from_millis(parse_or(
            &lookup,
            "RECONNECT_DELAY_MS",
            duration_millis(DEFAULT_RECONNECT_DELAY),
        ));
        let tick_interval = Duration::from_millis(parse_or(
            &lookup,
            "TICK_INTERVAL_MS",
            duration_millis(DEFAULT_TICK_INTERVAL),
        ));
        if tick_interval.is_zero() {
            return Err(PanelError::Config(
                "TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        let initial = Rgb::new(
            parse_or(&lookup, "INITIAL_RED", 0),
            parse_or(&lookup, "INITIAL_GREEN", 0),
            parse_or(&lookup, "INITIAL_BLUE", 0),
        );

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") | Some("TEXT") => LogFormat::Text,
            Some("json") | Some("JSON") => LogFormat::Json,
            Some(other) => {
                return Err(PanelError::Config(format!("unknown LOG_FORMAT {other:?}")));
            }
        };

        Ok(Self {
            endpoint,
            reconnect_delay,
            tick_interval,
            initial,
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
