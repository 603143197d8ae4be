//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! ```text
//! ┌──────────────────────────┬───────────────┬─────────────────────────────┐
//! │ Variable                 │ Default       │ Meaning                     │
//! ├──────────────────────────┼───────────────┼─────────────────────────────┤
//! │ HTTP_BIND_ADDR           │ 0.0.0.0       │ bind address                │
//! │ HTTP_PORT                │ 3000          │ port                        │
//! │ DATABASE_PATH            │ ./gastro.db   │ SQLite file                 │
//! │ DB_MAX_CONNECTIONS       │ 5             │ pool size                   │
//! │ BUSINESS_UTC_OFFSET      │ -05:00        │ offset for day arithmetic   │
//! │ BUSINESS_DAY_START_HOUR  │ 6             │ business-day rollover hour  │
//! │ REPORT_DEFAULT_DAYS      │ 30            │ default report look-back    │
//! │ REPORT_MAX_DAYS          │ 366           │ largest accepted look-back  │
//! │ MOVING_AVERAGE_WINDOW    │ 7             │ default moving avg window   │
//! │ LOG_LEVEL                │ info          │ filter when RUST_LOG unset  │
//! └──────────────────────────┴───────────────┴─────────────────────────────┘
//! ```

use std::env;
use std::str::FromStr;

use chrono::FixedOffset;
use gastro_core::{BusinessClock, DEFAULT_BUSINESS_DAY_START_HOUR, MAX_MOVING_AVERAGE_WINDOW};

/// Upper bound for `REPORT_MAX_DAYS`, ten years of history.
pub const REPORT_MAX_DAYS_LIMIT: i64 = 3650;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Fixed UTC offset of the venue
    pub utc_offset: FixedOffset,

    /// Local hour at which a new business day starts (0..=23)
    pub day_start_hour: u32,

    /// Look-back used by `/sales/daily` when `days` is omitted
    pub report_default_days: i64,

    /// Largest `days` accepted by `/sales/daily`
    pub report_max_days: i64,

    /// Moving-average window used when `window` is omitted
    pub moving_average_window: usize,

    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let offset_raw = lookup("BUSINESS_UTC_OFFSET").unwrap_or_else(|| "-05:00".to_string());
        let utc_offset =
            BusinessClock::parse_offset(&offset_raw).map_err(|_| ConfigError::InvalidValue {
                name: "BUSINESS_UTC_OFFSET".to_string(),
                value: offset_raw.clone(),
            })?;

        let config = ApiConfig {
            bind_addr: lookup("HTTP_BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "HTTP_PORT", 3000)?,
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "./gastro.db".to_string()),
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            utc_offset,
            day_start_hour: parse_var(
                &lookup,
                "BUSINESS_DAY_START_HOUR",
                DEFAULT_BUSINESS_DAY_START_HOUR,
            )?,
            report_default_days: parse_var(&lookup, "REPORT_DEFAULT_DAYS", 30)?,
            report_max_days: parse_var(&lookup, "REPORT_MAX_DAYS", 366)?,
            moving_average_window: parse_var(&lookup, "MOVING_AVERAGE_WINDOW", 7)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.day_start_hour > 23 {
            return Err(ConfigError::Inconsistent(
                "BUSINESS_DAY_START_HOUR must be between 0 and 23".to_string(),
            ));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::Inconsistent(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if self.report_max_days < 1 || self.report_max_days > REPORT_MAX_DAYS_LIMIT {
            return Err(ConfigError::Inconsistent(format!(
                "REPORT_MAX_DAYS must be between 1 and {}",
                REPORT_MAX_DAYS_LIMIT
            )));
        }
        if self.report_default_days < 1 || self.report_default_days > self.report_max_days {
            return Err(ConfigError::Inconsistent(format!(
                "REPORT_DEFAULT_DAYS must be between 1 and REPORT_MAX_DAYS ({})",
                self.report_max_days
            )));
        }
        if self.moving_average_window == 0 || self.moving_average_window > MAX_MOVING_AVERAGE_WINDOW {
            return Err(ConfigError::Inconsistent(format!(
                "MOVING_AVERAGE_WINDOW must be between 1 and {}",
                MAX_MOVING_AVERAGE_WINDOW
            )));
        }
        Ok(())
    }

    /// The clock used for calendar-day and business-day arithmetic.
    pub fn clock(&self) -> BusinessClock {
        BusinessClock::new(self.utc_offset, self.day_start_hour)
    }

    /// `host:port` for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let clock = BusinessClock::default();
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            database_path: "./gastro.db".to_string(),
            db_max_connections: 5,
            utc_offset: clock.offset(),
            day_start_hour: clock.day_start_hour(),
            report_default_days: 30,
            report_max_days: 366,
            moving_average_window: 7,
            log_level: "info".to_string(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("Inconsistent configuration: {0}")]
    Inconsistent(String),
}
