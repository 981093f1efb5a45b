//! Error taxonomy for scheduling and reservation.
//!
//! Each business rule owns exactly one variant so callers can map failures to
//! stable messages without string matching. Only [`CinemaError::Store`] wrapping
//! a [`StoreError::Conflict`] is transient; everything else is a rule violation
//! and must not be retried.

use crate::store::StoreError;
use crate::types::{BookingId, ScreeningId, SeatId};
use std::fmt;
use thiserror::Error;

/// Kind of entity a lookup failed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A film in the external catalog
    Film,
    /// A screening room
    Room,
    /// A screening
    Screening,
    /// A seat within a screening
    Seat,
    /// A seat booking
    Booking,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Film => "film",
            Self::Room => "room",
            Self::Screening => "screening",
            Self::Seat => "seat",
            Self::Booking => "booking",
        };
        f.write_str(name)
    }
}

/// Errors returned by scheduling and reservation operations.
#[derive(Error, Debug)]
pub enum CinemaError {
    /// A film, room, screening, seat or booking lookup missed.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What was looked up
        entity: Entity,
        /// The identifier that missed
        id: String,
    },

    /// The screening year is outside the accepted window.
    #[error("Screening year {year} is not accepted (current year: {current_year})")]
    InvalidYear {
        /// Year of the requested screening date
        year: i32,
        /// Year reported by the clock
        current_year: i32,
    },

    /// The requested screening overlaps another one in the same room.
    #[error("Screening collides with screening {conflicting} in the same room")]
    SchedulingCollision {
        /// The already scheduled screening that overlaps
        conflicting: ScreeningId,
    },

    /// A room with the same number already exists.
    #[error("Screening room {number} already exists")]
    RoomAlreadyExists {
        /// The duplicated room number
        number: u32,
    },

    /// Room dimensions must be at least one row of one seat.
    #[error("Invalid room layout: {rows} rows x {seats_per_row} seats per row")]
    InvalidRoomLayout {
        /// Requested row count
        rows: u32,
        /// Requested seats per row
        seats_per_row: u32,
    },

    /// No free seats remain for the screening.
    #[error("No free seats for screening {screening_id}")]
    SoldOut {
        /// The sold out screening
        screening_id: ScreeningId,
    },

    /// The targeted seat is already booked.
    #[error("Seat already booked: {seat_id}")]
    SeatUnavailable {
        /// The busy seat
        seat_id: SeatId,
    },

    /// The patron is younger than the screening's minimum age.
    #[error("Patron age {age} is below the minimum age {min_age}")]
    AgeRestricted {
        /// Age of the patron
        age: u32,
        /// Minimum age of the screening
        min_age: u32,
    },

    /// Booking attempted inside the cutoff window.
    #[error("Too late for seat booking: {seat_id}")]
    TooLateToBook {
        /// The seat the booking targeted
        seat_id: SeatId,
    },

    /// Cancellation attempted inside the cutoff window.
    #[error("Too late to cancel booking {booking_id}")]
    TooLateToCancel {
        /// The booking that could not be cancelled
        booking_id: BookingId,
    },

    /// The booking was already cancelled.
    #[error("Booking already cancelled: {booking_id}")]
    AlreadyCancelled {
        /// The cancelled booking
        booking_id: BookingId,
    },

    /// The persistence boundary failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CinemaError {
    /// Shorthand for a [`CinemaError::NotFound`].
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the caller's transaction boundary may retry the operation.
    ///
    /// Only optimistic-concurrency conflicts are transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Conflict { .. }))
    }

    /// Stable, low-cardinality label for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidYear { .. } => "invalid_year",
            Self::SchedulingCollision { .. } => "scheduling_collision",
            Self::RoomAlreadyExists { .. } => "room_already_exists",
            Self::InvalidRoomLayout { .. } => "invalid_room_layout",
            Self::SoldOut { .. } => "sold_out",
            Self::SeatUnavailable { .. } => "seat_unavailable",
            Self::AgeRestricted { .. } => "age_restricted",
            Self::TooLateToBook { .. } => "too_late_to_book",
            Self::TooLateToCancel { .. } => "too_late_to_cancel",
            Self::AlreadyCancelled { .. } => "already_cancelled",
            Self::Store(StoreError::Conflict { .. }) => "conflict",
            Self::Store(_) => "store",
        }
    }
}

/// Result alias for cinema operations.
pub type Result<T> = std::result::Result<T, CinemaError>;
