//! # Cinema Core
//!
//! Domain model for screening scheduling and seat reservation.
//!
//! This crate holds the rules with real invariants: where a screening may be
//! placed in a room's timetable, which seats a screening owns, and when a seat
//! may be booked or released. It performs no I/O. Orchestration (loading,
//! committing, logging) lives in `cinema-runtime`; test doubles live in
//! `cinema-testing`.
//!
//! ## Core Concepts
//!
//! - **Room**: a [`room::ScreeningRoom`] with a rectangular [`room::RoomLayout`]
//! - **Screening**: a [`screening::Screening`] that owns a fresh copy of its
//!   room's seats
//! - **Seat**: a [`seat::Seat`] that is either free or busy
//! - **Booking**: a [`booking::SeatBooking`] holding one seat until cancelled
//! - **Rules**: [`film_year::FilmYearRule`], [`collision::CollisionChecker`]
//!   and [`reservation::ReservationPolicy`]
//! - **Collaborators**: [`environment::Clock`], [`store::FilmCatalog`] and
//!   [`store::CinemaStore`]
//!
//! ## Example
//!
//! ```
//! use cinema_core::reservation::ReservationPolicy;
//! use cinema_core::room::ScreeningRoom;
//! use cinema_core::screening::Screening;
//! use cinema_core::types::{FilmId, Patron};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! # fn main() -> Result<(), cinema_core::CinemaError> {
//! let room = ScreeningRoom::new(1, 2, 3)?;
//! let date = Utc.with_ymd_and_hms(2030, 5, 1, 20, 0, 0).single().unwrap_or_default();
//! let mut screening = Screening::created_with(date, 13, FilmId::new(), &room, room.create_seats());
//!
//! let seat = screening.seats()[0].id();
//! let policy = ReservationPolicy::default();
//! let booking = policy.book(&mut screening, seat, &Patron::new("Ada", "Lovelace", 18), date - Duration::hours(48))?;
//!
//! assert_eq!(screening.free_seat_count(), 5);
//! assert!(booking.is_open());
//! # Ok(())
//! # }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Seat bookings
pub mod booking;

/// Overlap detection for room timetables
pub mod collision;

/// Clock abstraction
pub mod environment;

/// Error taxonomy
pub mod error;

/// Year acceptance rule
pub mod film_year;

/// Booking and cancellation rules
pub mod reservation;

/// Rooms and seat layouts
pub mod room;

/// The screening aggregate
pub mod screening;

/// Seats
pub mod seat;

/// Collaborator contracts
pub mod store;

/// Identifiers and value objects
pub mod types;

pub use error::{CinemaError, Entity};
