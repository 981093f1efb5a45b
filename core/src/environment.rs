//! Time abstraction injected into every time-sensitive operation.
//!
//! Booking and cancellation rules compare "now" against a screening date. The
//! current time is never read from ambient system state inside the domain; it
//! is always supplied through a [`Clock`] so tests can pin "now" to any value.

use chrono::{DateTime, Datelike, Utc};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use cinema_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let before = clock.now();
/// assert!(clock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// The calendar year of [`Clock::now`]
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
