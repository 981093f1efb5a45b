//! Collaborator contracts: the film catalog and the persistence boundary.
//!
//! The domain never talks to a database directly. Orchestration code loads
//! aggregates through [`CinemaStore`], mutates them in memory with the rules
//! in this crate, and hands every resulting write to [`CinemaStore::commit`]
//! as one [`UnitOfWork`].
//!
//! # Concurrency
//!
//! Stores implement optimistic concurrency. Each screening carries a
//! [`Version`] that advances on every committed write, and each room carries a
//! schedule version that advances whenever a screening is added to it. A unit
//! of work states the versions it was computed against; if any of them moved,
//! the commit fails with [`StoreError::Conflict`] and applies nothing. That
//! makes a seat-status flip and its booking record linearizable per
//! screening, and closes the write-skew window between a collision check and
//! the insert it guards.
//!
//! # Dyn Compatibility
//!
//! Both traits return explicit `Pin<Box<dyn Future>>` values instead of using
//! `async fn` so they can be shared as `Arc<dyn CinemaStore>` and
//! `Arc<dyn FilmCatalog>`.

use crate::booking::SeatBooking;
use crate::room::ScreeningRoom;
use crate::screening::Screening;
use crate::types::{BookingId, FilmId, RoomId, ScreeningId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors raised by a store or catalog implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Optimistic concurrency conflict: the data changed since it was read.
    ///
    /// The whole operation may be retried from the read.
    #[error("Concurrent modification of {resource}")]
    Conflict {
        /// What changed underneath the unit of work
        resource: String,
    },

    /// A uniqueness guard rejected the write.
    #[error("Duplicate {0}")]
    Duplicate(String),

    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Future returned by store and catalog operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Aggregate version for optimistic concurrency control.
///
/// Versions start at [`Version::INITIAL`] and increase by one per commit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// The version of something that has never been written.
    pub const INITIAL: Self = Self(0);

    /// Create a new `Version` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the version number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next version (current + 1).
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loaded aggregate together with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    /// The aggregate
    pub value: T,
    /// Version it was read at
    pub version: Version,
}

impl<T> Versioned<T> {
    /// Pairs `value` with `version`
    pub const fn new(value: T, version: Version) -> Self {
        Self { value, version }
    }
}

/// Every screening of one room, read at one schedule version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomSchedule {
    /// Room the schedule belongs to
    pub room_id: RoomId,
    /// Schedule version the screenings were read at
    pub version: Version,
    /// Screenings in the room
    pub screenings: Vec<Screening>,
}

/// A screening write guarded by the version it was computed against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreeningWrite {
    /// New state of the screening
    pub screening: Screening,
    /// `None` inserts a new screening; `Some` updates one read at that version
    pub expected: Option<Version>,
}

/// An atomic set of writes.
///
/// Either every write is applied and every guard holds, or nothing changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct UnitOfWork {
    /// Room schedules that must still be at the given version
    pub schedule_guards: Vec<(RoomId, Version)>,
    /// Screening inserts and updates
    pub screenings: Vec<ScreeningWrite>,
    /// Booking upserts
    pub bookings: Vec<SeatBooking>,
}

impl UnitOfWork {
    /// An empty unit of work
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the room's schedule to be unchanged since `version`.
    pub fn guard_schedule(mut self, room_id: RoomId, version: Version) -> Self {
        self.schedule_guards.push((room_id, version));
        self
    }

    /// Insert a new screening.
    pub fn insert_screening(mut self, screening: Screening) -> Self {
        self.screenings.push(ScreeningWrite {
            screening,
            expected: None,
        });
        self
    }

    /// Update a screening previously read at `expected`.
    pub fn update_screening(mut self, screening: Screening, expected: Version) -> Self {
        self.screenings.push(ScreeningWrite {
            screening,
            expected: Some(expected),
        });
        self
    }

    /// Insert or replace a booking.
    pub fn save_booking(mut self, booking: SeatBooking) -> Self {
        self.bookings.push(booking);
        self
    }

    /// Whether the unit of work writes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.screenings.is_empty() && self.bookings.is_empty()
    }
}

/// What the domain needs to know about films.
pub trait FilmCatalog: Send + Sync {
    /// Whether the film exists.
    fn exists(&self, film_id: FilmId) -> StoreFuture<'_, bool>;

    /// Running time in minutes, `None` if the film does not exist.
    fn duration_of(&self, film_id: FilmId) -> StoreFuture<'_, Option<u32>>;
}

/// Persistence for rooms, screenings and bookings.
pub trait CinemaStore: Send + Sync {
    /// Load a room.
    fn room(&self, room_id: RoomId) -> StoreFuture<'_, Option<ScreeningRoom>>;

    /// All rooms, ordered by number.
    fn rooms(&self) -> StoreFuture<'_, Vec<ScreeningRoom>>;

    /// Whether a room with `number` exists.
    fn room_number_taken(&self, number: u32) -> StoreFuture<'_, bool>;

    /// Insert a room.
    ///
    /// Fails with [`StoreError::Duplicate`] if the number is taken.
    fn insert_room(&self, room: ScreeningRoom) -> StoreFuture<'_, ()>;

    /// Load a screening with its current version.
    fn screening(&self, screening_id: ScreeningId) -> StoreFuture<'_, Option<Versioned<Screening>>>;

    /// All screenings, ordered by date.
    fn screenings(&self) -> StoreFuture<'_, Vec<Screening>>;

    /// Screenings of a film, ordered by date.
    fn screenings_for_film(&self, film_id: FilmId) -> StoreFuture<'_, Vec<Screening>>;

    /// Screenings starting on a calendar day (UTC), ordered by date.
    fn screenings_on(&self, date: NaiveDate) -> StoreFuture<'_, Vec<Screening>>;

    /// Screenings of a room with the room's current schedule version.
    fn room_schedule(&self, room_id: RoomId) -> StoreFuture<'_, RoomSchedule>;

    /// Load a booking.
    fn booking(&self, booking_id: BookingId) -> StoreFuture<'_, Option<SeatBooking>>;

    /// Bookings of a screening, in booking order.
    fn bookings_for_screening(&self, screening_id: ScreeningId) -> StoreFuture<'_, Vec<SeatBooking>>;

    /// Apply a unit of work atomically.
    ///
    /// Fails with [`StoreError::Conflict`] and applies nothing if any guard or
    /// expected version no longer holds.
    fn commit(&self, work: UnitOfWork) -> StoreFuture<'_, ()>;
}
