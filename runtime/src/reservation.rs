//! Seat booking and cancellation against stored screenings.

use crate::metrics::{self, BOOKINGS, CANCELLATIONS, counter};
use cinema_core::booking::SeatBooking;
use cinema_core::environment::Clock;
use cinema_core::error::Result;
use cinema_core::reservation::ReservationPolicy;
use cinema_core::store::{CinemaStore, UnitOfWork, Versioned};
use cinema_core::screening::Screening;
use cinema_core::types::{BookingId, Patron, ScreeningId, SeatId};
use cinema_core::{CinemaError, Entity};
use std::sync::Arc;
use std::time::Instant;

/// Request to book one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSeat {
    /// Screening to book
    pub screening_id: ScreeningId,
    /// Seat within that screening
    pub seat_id: SeatId,
    /// Who is booking
    pub patron: Patron,
}

/// Books and cancels seats.
///
/// Each operation loads the screening with its version, applies the
/// [`ReservationPolicy`] in memory and commits the changed screening and
/// booking as one unit of work. A concurrent change to the same screening
/// makes the commit fail with a retryable conflict and leaves the store
/// untouched; see [`crate::retry::retry_on_conflict`].
#[derive(Clone)]
pub struct ReservationEngine {
    store: Arc<dyn CinemaStore>,
    policy: ReservationPolicy,
}

impl std::fmt::Debug for ReservationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ReservationEngine {
    /// Create an engine with the default 24 hour cutoff and ticket price.
    #[must_use]
    pub fn new(store: Arc<dyn CinemaStore>) -> Self {
        Self {
            store,
            policy: ReservationPolicy::default(),
        }
    }

    /// Use different booking rules.
    #[must_use]
    pub const fn with_policy(mut self, policy: ReservationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The booking rules in force.
    #[must_use]
    pub const fn policy(&self) -> ReservationPolicy {
        self.policy
    }

    /// Book a seat for a patron.
    ///
    /// # Errors
    ///
    /// - [`CinemaError::NotFound`] for an unknown screening or seat
    /// - [`CinemaError::TooLateToBook`] within the cutoff window
    /// - [`CinemaError::SeatUnavailable`] if the seat is taken
    /// - [`CinemaError::AgeRestricted`] if the patron is too young
    /// - [`CinemaError::SoldOut`] if nothing is free
    /// - a retryable store conflict if the screening changed concurrently
    #[tracing::instrument(
        skip(self, request, clock),
        fields(screening_id = %request.screening_id, seat_id = %request.seat_id)
    )]
    pub async fn book(&self, request: BookSeat, clock: &dyn Clock) -> Result<SeatBooking> {
        let started = Instant::now();
        let result = self.try_book(request, clock).await;
        metrics::observe("book_seat", started, &result);
        result
    }

    async fn try_book(&self, request: BookSeat, clock: &dyn Clock) -> Result<SeatBooking> {
        let Versioned {
            value: mut screening,
            version,
        } = self.load_screening(request.screening_id).await?;

        let booking = self
            .policy
            .book(&mut screening, request.seat_id, &request.patron, clock.now())?;

        let free_seats = screening.free_seat_count();
        self.store
            .commit(
                UnitOfWork::new()
                    .update_screening(screening, version)
                    .save_booking(booking.clone()),
            )
            .await?;

        counter!(BOOKINGS).increment(1);
        tracing::info!(booking_id = %booking.id(), free_seats, "Seat booked");
        Ok(booking)
    }

    /// Cancel an open booking and free its seat.
    ///
    /// # Errors
    ///
    /// - [`CinemaError::NotFound`] for an unknown booking, or if its screening
    ///   or seat no longer exists
    /// - [`CinemaError::AlreadyCancelled`] if the booking was cancelled before
    /// - [`CinemaError::TooLateToCancel`] within the cutoff window
    /// - a retryable store conflict if the screening changed concurrently
    #[tracing::instrument(skip(self, clock))]
    pub async fn cancel(&self, booking_id: BookingId, clock: &dyn Clock) -> Result<()> {
        let started = Instant::now();
        let result = self.try_cancel(booking_id, clock).await;
        metrics::observe("cancel_booking", started, &result);
        result
    }

    async fn try_cancel(&self, booking_id: BookingId, clock: &dyn Clock) -> Result<()> {
        let mut booking = self.booking(booking_id).await?;
        if !booking.is_open() {
            return Err(CinemaError::AlreadyCancelled { booking_id });
        }

        let Versioned {
            value: mut screening,
            version,
        } = self.load_screening(booking.screening_id()).await?;

        self.policy.cancel(&mut screening, &mut booking, clock.now())?;

        self.store
            .commit(
                UnitOfWork::new()
                    .update_screening(screening, version)
                    .save_booking(booking),
            )
            .await?;

        counter!(CANCELLATIONS).increment(1);
        tracing::info!("Booking cancelled");
        Ok(())
    }

    /// Look up a booking.
    ///
    /// # Errors
    ///
    /// [`CinemaError::NotFound`] if no such booking exists.
    pub async fn booking(&self, booking_id: BookingId) -> Result<SeatBooking> {
        self.store
            .booking(booking_id)
            .await?
            .ok_or_else(|| CinemaError::not_found(Entity::Booking, booking_id))
    }

    /// All bookings for a screening, open and cancelled, in booking order.
    ///
    /// # Errors
    ///
    /// [`CinemaError::NotFound`] if the screening does not exist.
    pub async fn bookings_for_screening(&self, screening_id: ScreeningId) -> Result<Vec<SeatBooking>> {
        self.load_screening(screening_id).await?;
        Ok(self.store.bookings_for_screening(screening_id).await?)
    }

    async fn load_screening(&self, screening_id: ScreeningId) -> Result<Versioned<Screening>> {
        self.store
            .screening(screening_id)
            .await?
            .ok_or_else(|| CinemaError::not_found(Entity::Screening, screening_id))
    }
}
