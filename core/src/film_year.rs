//! Acceptance rule for calendar years relative to the current year.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for [`FilmYearRule`] parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown film year rule: {0}")]
pub struct ParseFilmYearRuleError(String);

/// Which calendar years are acceptable relative to "now".
///
/// Screenings use [`FilmYearRule::CurrentOrNext`]. The film catalog accepts
/// release years one year either side of the current one, which is what
/// [`FilmYearRule::PreviousCurrentOrNext`] expresses.
///
/// # Examples
///
/// ```
/// use cinema_core::film_year::FilmYearRule;
///
/// let rule = FilmYearRule::CurrentOrNext;
/// assert!(rule.is_acceptable(2024, 2024));
/// assert!(rule.is_acceptable(2025, 2024));
/// assert!(!rule.is_acceptable(2023, 2024));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmYearRule {
    /// The current year or the next one
    #[default]
    CurrentOrNext,
    /// The previous, current or next year
    PreviousCurrentOrNext,
}

impl FilmYearRule {
    /// Is `candidate_year` acceptable when the clock says `current_year`?
    #[must_use]
    pub const fn is_acceptable(self, candidate_year: i32, current_year: i32) -> bool {
        let earliest = match self {
            Self::CurrentOrNext => current_year,
            Self::PreviousCurrentOrNext => current_year.saturating_sub(1),
        };
        candidate_year >= earliest && candidate_year <= current_year.saturating_add(1)
    }
}

impl fmt::Display for FilmYearRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentOrNext => f.write_str("current_or_next"),
            Self::PreviousCurrentOrNext => f.write_str("previous_current_or_next"),
        }
    }
}

impl FromStr for FilmYearRule {
    type Err = ParseFilmYearRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current_or_next" => Ok(Self::CurrentOrNext),
            "previous_current_or_next" => Ok(Self::PreviousCurrentOrNext),
            other => Err(ParseFilmYearRuleError(other.to_string())),
        }
    }
}
