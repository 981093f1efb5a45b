//! A patron's claim on one seat of one screening.

use crate::types::{BookingId, Money, Patron, ScreeningId, SeatId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a booking. `Cancelled` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Holds its seat
    Open,
    /// Released its seat
    Cancelled,
}

/// A booking of a single seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatBooking {
    id: BookingId,
    screening_id: ScreeningId,
    seat_id: SeatId,
    first_name: String,
    last_name: String,
    status: BookingStatus,
    price: Money,
    booked_at: DateTime<Utc>,
}

impl SeatBooking {
    pub(crate) fn open(
        screening_id: ScreeningId,
        seat_id: SeatId,
        patron: &Patron,
        price: Money,
        booked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BookingId::new(),
            screening_id,
            seat_id,
            first_name: patron.first_name.clone(),
            last_name: patron.last_name.clone(),
            status: BookingStatus::Open,
            price,
            booked_at,
        }
    }

    /// Booking identifier
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// Screening the seat belongs to
    #[must_use]
    pub const fn screening_id(&self) -> ScreeningId {
        self.screening_id
    }

    /// Booked seat
    #[must_use]
    pub const fn seat_id(&self) -> SeatId {
        self.seat_id
    }

    /// Patron first name
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Patron last name
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        self.status
    }

    /// Whether the booking still holds its seat
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, BookingStatus::Open)
    }

    /// Ticket price
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// When the booking was made
    #[must_use]
    pub const fn booked_at(&self) -> DateTime<Utc> {
        self.booked_at
    }

    pub(crate) const fn mark_cancelled(&mut self) {
        self.status = BookingStatus::Cancelled;
    }
}
