//! A single addressable seat of a screening.

use crate::types::SeatId;
use serde::{Deserialize, Serialize};

/// Occupancy of a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    /// Available for booking
    Free,
    /// Held by an open booking
    Busy,
}

/// One seat of a screening, addressed by row and number (both 1-based).
///
/// The setters are unconditional. Guarding against double booking is the
/// reservation rules' job, so that the rejection carries booking semantics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    id: SeatId,
    row: u32,
    number: u32,
    status: SeatStatus,
}

impl Seat {
    /// Creates a free seat at `row`/`number`
    #[must_use]
    pub fn free(row: u32, number: u32) -> Self {
        Self {
            id: SeatId::new(),
            row,
            number,
            status: SeatStatus::Free,
        }
    }

    /// Seat identifier
    #[must_use]
    pub const fn id(&self) -> SeatId {
        self.id
    }

    /// Row number (1-based)
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Seat number within the row (1-based)
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> SeatStatus {
        self.status
    }

    /// Whether the seat can be booked
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self.status, SeatStatus::Free)
    }

    pub(crate) const fn mark_busy(&mut self) {
        self.status = SeatStatus::Busy;
    }

    pub(crate) const fn mark_free(&mut self) {
        self.status = SeatStatus::Free;
    }
}
