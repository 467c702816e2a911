use std::{env, str::FromStr, time::Duration};

use chrono::TimeDelta;

use slotsync_core::calendar::{validate_time_zone, CalendarId, ChangeError};
use slotsync_core::schedule::{
    SlotPolicy, DEFAULT_BUFFER_MINUTES, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_HORIZON_DAYS,
};
use thiserror::Error;

/// Zone applied to changes that carry none.
pub const DEFAULT_TIME_ZONE: &str = "America/Toronto";
/// Header carrying the authenticated principal's address.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-email";
pub const DEFAULT_GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Errors found while checking a loaded configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DEFAULT_TIME_ZONE is invalid: {0}")]
    DefaultTimeZone(#[from] ChangeError),
    #[error("SLOT_BUFFER_MINUTES must not be negative, got {0}")]
    NegativeBuffer(i64),
    #[error("SLOT_MAX_ATTEMPTS must be at least 1")]
    NoAttempts,
    #[error("SLOT_MAX_HORIZON_DAYS must not be negative, got {0}")]
    NegativeHorizon(i64),
    #[error("{name} is out of range, got {value}")]
    OutOfRange { name: &'static str, value: i64 },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// IANA zone for changes without one (default: "America/Toronto")
    pub default_time_zone: String,
    /// Gap after a conflicting event, in minutes (default: 15)
    pub slot_buffer_minutes: i64,
    /// Store queries per slot search (default: 48)
    pub slot_max_attempts: u32,
    /// Forward-shift limit for a slot search, in days (default: 14)
    pub slot_max_horizon_days: i64,
    /// Trusted header naming the principal (default: "x-user-email")
    pub identity_header: String,
    /// Fixed calendar used for every principal when set
    pub calendar_id_override: Option<String>,
    /// Whole-request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
    /// Path to a Google service account key file
    /// Note: Only used when the `google` feature is enabled.
    #[cfg_attr(not(feature = "google"), allow(dead_code))]
    pub google_service_account_file: Option<String>,
    /// Pre-issued Google bearer token, used instead of a service account
    #[cfg_attr(not(feature = "google"), allow(dead_code))]
    pub google_access_token: Option<String>,
    /// Google Calendar REST root (default: "https://www.googleapis.com/calendar/v3")
    #[cfg_attr(not(feature = "google"), allow(dead_code))]
    pub google_calendar_api_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DEFAULT_TIME_ZONE` - Zone for changes without one (default: "America/Toronto")
    /// - `SLOT_BUFFER_MINUTES` - Gap after a conflicting event (default: 15)
    /// - `SLOT_MAX_ATTEMPTS` - Store queries per slot search (default: 48)
    /// - `SLOT_MAX_HORIZON_DAYS` - Forward-shift limit (default: 14)
    /// - `IDENTITY_HEADER` - Principal header name (default: "x-user-email")
    /// - `CALENDAR_ID_OVERRIDE` - Calendar used for every principal (optional)
    /// - `REQUEST_TIMEOUT_SECONDS` - Whole-request timeout (default: 30)
    /// - `GOOGLE_SERVICE_ACCOUNT_FILE` - Service account key path (optional)
    /// - `GOOGLE_ACCESS_TOKEN` - Static bearer token (optional)
    /// - `GOOGLE_CALENDAR_API_BASE` - REST root (default: Google's public endpoint)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_time_zone: env::var("DEFAULT_TIME_ZONE")
                .unwrap_or(defaults.default_time_zone),
            slot_buffer_minutes: parse_var(
                env::var("SLOT_BUFFER_MINUTES").ok(),
                defaults.slot_buffer_minutes,
            ),
            slot_max_attempts: parse_var(
                env::var("SLOT_MAX_ATTEMPTS").ok(),
                defaults.slot_max_attempts,
            ),
            slot_max_horizon_days: parse_var(
                env::var("SLOT_MAX_HORIZON_DAYS").ok(),
                defaults.slot_max_horizon_days,
            ),
            identity_header: env::var("IDENTITY_HEADER")
                .map(|v| v.to_ascii_lowercase())
                .unwrap_or(defaults.identity_header),
            calendar_id_override: non_blank(env::var("CALENDAR_ID_OVERRIDE").ok()),
            request_timeout_seconds: parse_var(
                env::var("REQUEST_TIMEOUT_SECONDS").ok(),
                defaults.request_timeout_seconds,
            ),
            google_service_account_file: non_blank(env::var("GOOGLE_SERVICE_ACCOUNT_FILE").ok()),
            google_access_token: non_blank(env::var("GOOGLE_ACCESS_TOKEN").ok()),
            google_calendar_api_base: env::var("GOOGLE_CALENDAR_API_BASE")
                .unwrap_or(defaults.google_calendar_api_base),
        }
    }

    /// Rejects values the reconciler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_time_zone(&self.default_time_zone)?;
        if self.slot_buffer_minutes < 0 {
            return Err(ConfigError::NegativeBuffer(self.slot_buffer_minutes));
        }
        if self.slot_max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.slot_max_horizon_days < 0 {
            return Err(ConfigError::NegativeHorizon(self.slot_max_horizon_days));
        }
        self.slot_policy()?;
        Ok(())
    }

    /// Slot search limits.
    pub fn slot_policy(&self) -> Result<SlotPolicy, ConfigError> {
        let buffer = TimeDelta::try_minutes(self.slot_buffer_minutes).ok_or(
            ConfigError::OutOfRange {
                name: "SLOT_BUFFER_MINUTES",
                value: self.slot_buffer_minutes,
            },
        )?;
        let max_horizon = TimeDelta::try_days(self.slot_max_horizon_days).ok_or(
            ConfigError::OutOfRange {
                name: "SLOT_MAX_HORIZON_DAYS",
                value: self.slot_max_horizon_days,
            },
        )?;

        Ok(SlotPolicy::default()
            .with_buffer(buffer)
            .with_max_attempts(self.slot_max_attempts)
            .with_max_horizon(max_horizon))
    }

    /// Get request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Calendar used for every principal, if one is pinned.
    pub fn calendar_override(&self) -> Option<CalendarId> {
        self.calendar_id_override.clone().map(CalendarId::new)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
            slot_buffer_minutes: DEFAULT_BUFFER_MINUTES,
            slot_max_attempts: DEFAULT_MAX_ATTEMPTS,
            slot_max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            calendar_id_override: None,
            request_timeout_seconds: 30,
            google_service_account_file: None,
            google_access_token: None,
            google_calendar_api_base: DEFAULT_GOOGLE_CALENDAR_API_BASE.to_string(),
        }
    }
}

fn parse_var<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.default_time_zone, "America/Toronto");
        assert_eq!(config.slot_buffer_minutes, 15);
        assert_eq!(config.slot_max_attempts, 48);
        assert_eq!(config.slot_max_horizon_days, 14);
        assert_eq!(config.identity_header, "x-user-email");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        assert_eq!(parse_var(Some("20".to_string()), 15i64), 20);
        assert_eq!(parse_var(Some(" 20 ".to_string()), 15i64), 20);
        assert_eq!(parse_var(Some("soon".to_string()), 15i64), 15);
        assert_eq!(parse_var(None, 48u32), 48);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" primary ".to_string())), Some("primary".to_string()));
    }

    #[test]
    fn test_slot_policy_conversion() {
        let config = Config {
            slot_buffer_minutes: 5,
            slot_max_attempts: 3,
            slot_max_horizon_days: 1,
            ..Config::default()
        };

        let policy = config.slot_policy().unwrap();

        assert_eq!(policy.buffer, chrono::Duration::minutes(5));
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.max_horizon, chrono::Duration::days(1));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let unknown_zone = Config {
            default_time_zone: "Nowhere/Special".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            unknown_zone.validate(),
            Err(ConfigError::DefaultTimeZone(_))
        ));

        let negative_buffer = Config {
            slot_buffer_minutes: -1,
            ..Config::default()
        };
        assert_eq!(
            negative_buffer.validate(),
            Err(ConfigError::NegativeBuffer(-1))
        );

        let no_attempts = Config {
            slot_max_attempts: 0,
            ..Config::default()
        };
        assert_eq!(no_attempts.validate(), Err(ConfigError::NoAttempts));
    }

    #[test]
    fn test_validate_rejects_oversized_durations() {
        let huge_horizon = Config {
            slot_max_horizon_days: 200_000_000_000,
            ..Config::default()
        };
        let expected = Err(ConfigError::OutOfRange {
            name: "SLOT_MAX_HORIZON_DAYS",
            value: 200_000_000_000,
        });
        assert_eq!(huge_horizon.validate(), expected);
        assert_eq!(huge_horizon.slot_policy().map(|_| ()), expected);

        let huge_buffer = Config {
            slot_buffer_minutes: i64::MAX,
            ..Config::default()
        };
        assert_eq!(
            huge_buffer.validate(),
            Err(ConfigError::OutOfRange {
                name: "SLOT_BUFFER_MINUTES",
                value: i64::MAX,
            })
        );
    }

    #[test]
    fn test_calendar_override() {
        assert_eq!(Config::default().calendar_override(), None);

        let config = Config {
            calendar_id_override: Some("team@group.calendar.google.com".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.calendar_override(),
            Some(CalendarId::new("team@group.calendar.google.com"))
        );
    }
}
