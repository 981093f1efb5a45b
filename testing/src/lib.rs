//! # Cinema Testing
//!
//! Testing utilities for the cinema scheduling engine.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time
//! - [`InMemoryCinemaStore`]: `HashMap`-backed store with real optimistic
//!   concurrency and conflict injection
//! - [`StaticFilmCatalog`]: fixed set of films
//! - Fixture helpers for dates and patrons
//!
//! ## Example
//!
//! ```
//! use cinema_testing::{at, FixedClock};
//! use cinema_core::environment::Clock;
//! use chrono::Duration;
//!
//! let screening_date = at(2025, 6, 1, 20, 0);
//! let clock = FixedClock::new(screening_date - Duration::hours(48));
//! assert_eq!(clock.now() + Duration::hours(48), screening_date);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use cinema_core::environment::Clock;

mod catalog;
mod in_memory;

pub use catalog::StaticFilmCatalog;
pub use in_memory::InMemoryCinemaStore;

/// Mock implementations of collaborator traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use cinema_testing::mocks::FixedClock;
    /// use cinema_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(super::at(2025, 1, 1, 0, 0))
    }
}

/// Test data helpers
pub mod helpers {
    use cinema_core::types::Patron;

    /// An 18-year-old patron
    #[must_use]
    pub fn adult_patron() -> Patron {
        Patron::new("Jan", "Kowalski", 18)
    }

    /// A patron of the given age
    #[must_use]
    pub fn patron_aged(age: u32) -> Patron {
        Patron::new("Anna", "Nowak", age)
    }

    /// Installs a test-friendly `tracing` subscriber.
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// A UTC timestamp from calendar parts.
///
/// Out-of-range parts fall back to the Unix epoch, which no fixture relies on.
#[must_use]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

// Re-export commonly used items
pub use helpers::{adult_patron, init_test_tracing, patron_aged};
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(clock.current_year(), 2025);
    }
}
