//! Configuration management for the cinema engine.
//!
//! Loads configuration from `CINEMA_*` environment variables with sensible
//! defaults. Unlike a missing variable, a present but malformed one is an
//! error.

use crate::retry::RetryPolicy;
use cinema_core::film_year::FilmYearRule;
use cinema_core::reservation::{DEFAULT_CUTOFF_HOURS, DEFAULT_TICKET_PRICE_CENTS, ReservationPolicy};
use cinema_core::types::Money;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        /// Environment variable name
        key: &'static str,
        /// Raw value found
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CinemaConfig {
    /// Booking and cancellation rules
    pub reservation: ReservationConfig,
    /// Screening scheduling rules
    pub scheduling: SchedulingConfig,
    /// Conflict retry policy
    pub retry: RetryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Reservation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Hours before a screening after which bookings are frozen (default: 24)
    pub cutoff_hours: i64,
    /// Basic ticket price in cents (default: 1000)
    pub ticket_price_cents: u64,
}

/// Scheduling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Which screening years are accepted (default: `current_or_next`)
    pub year_rule: FilmYearRule,
}

/// Conflict retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after a conflict (default: 3)
    pub max_retries: usize,
    /// First backoff in milliseconds (default: 10)
    pub initial_delay_ms: u64,
    /// Backoff cap in milliseconds (default: 1000)
    pub max_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (default: `info`)
    pub level: String,
}

impl Default for CinemaConfig {
    fn default() -> Self {
        Self {
            reservation: ReservationConfig {
                cutoff_hours: DEFAULT_CUTOFF_HOURS,
                ticket_price_cents: DEFAULT_TICKET_PRICE_CENTS,
            },
            scheduling: SchedulingConfig {
                year_rule: FilmYearRule::default(),
            },
            retry: RetryConfig {
                max_retries: 3,
                initial_delay_ms: 10,
                max_delay_ms: 1_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl CinemaConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to a value that
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a `.env` file if present, then read the environment.
    ///
    /// # Errors
    ///
    /// Same as [`CinemaConfig::from_env`].
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_env()
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable values and for a
    /// negative cutoff.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cutoff_hours: i64 =
            parse_or(&lookup, "CINEMA_CUTOFF_HOURS", defaults.reservation.cutoff_hours)?;
        // A negative cutoff would reopen screenings that already started.
        if cutoff_hours < 0 {
            return Err(ConfigError::Invalid {
                key: "CINEMA_CUTOFF_HOURS",
                value: cutoff_hours.to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        Ok(Self {
            reservation: ReservationConfig {
                cutoff_hours,
                ticket_price_cents: parse_or(
                    &lookup,
                    "CINEMA_TICKET_PRICE_CENTS",
                    defaults.reservation.ticket_price_cents,
                )?,
            },
            scheduling: SchedulingConfig {
                year_rule: parse_or(
                    &lookup,
                    "CINEMA_SCREENING_YEAR_RULE",
                    defaults.scheduling.year_rule,
                )?,
            },
            retry: RetryConfig {
                max_retries: parse_or(&lookup, "CINEMA_RETRY_MAX", defaults.retry.max_retries)?,
                initial_delay_ms: parse_or(
                    &lookup,
                    "CINEMA_RETRY_INITIAL_DELAY_MS",
                    defaults.retry.initial_delay_ms,
                )?,
                max_delay_ms: parse_or(
                    &lookup,
                    "CINEMA_RETRY_MAX_DELAY_MS",
                    defaults.retry.max_delay_ms,
                )?,
            },
            logging: LoggingConfig {
                level: lookup("CINEMA_LOG_LEVEL").unwrap_or(defaults.logging.level),
            },
        })
    }

    /// The reservation rules this configuration describes.
    #[must_use]
    pub const fn reservation_policy(&self) -> ReservationPolicy {
        ReservationPolicy {
            cutoff_hours: self.reservation.cutoff_hours,
            ticket_price: Money::from_cents(self.reservation.ticket_price_cents),
        }
    }

    /// The rule for acceptable screening years.
    #[must_use]
    pub const fn year_rule(&self) -> FilmYearRule {
        self.scheduling.year_rule
    }

    /// The conflict retry policy this configuration describes.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_retries(self.retry.max_retries)
            .initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
            .max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .build()
    }
}

fn parse_or<L, T>(lookup: &L, key: &'static str, default: T) -> Result<T, ConfigError>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
    }
}
