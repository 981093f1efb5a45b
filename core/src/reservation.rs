//! Seat reservation rules.
//!
//! These are the only transitions that change seat status. Every rule is
//! checked before anything is mutated, so a rejected call leaves both the
//! screening and the booking exactly as they were.

use crate::booking::SeatBooking;
use crate::error::{CinemaError, Entity, Result};
use crate::screening::Screening;
use crate::types::{Money, Patron, SeatId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hours before a screening after which bookings and cancellations close.
pub const DEFAULT_CUTOFF_HOURS: i64 = 24;

/// Price of a basic ticket, in cents.
pub const DEFAULT_TICKET_PRICE_CENTS: u64 = 1_000;

/// Cutoff and pricing applied to bookings.
///
/// The cutoff compares the signed number of whole hours between "now" and the
/// screening start; anything below `cutoff_hours`, including screenings that
/// already started, is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPolicy {
    /// Minimum whole hours left before the screening
    pub cutoff_hours: i64,
    /// Price stamped on new bookings
    pub ticket_price: Money,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            cutoff_hours: DEFAULT_CUTOFF_HOURS,
            ticket_price: Money::from_cents(DEFAULT_TICKET_PRICE_CENTS),
        }
    }
}

impl ReservationPolicy {
    /// Whether the screening is still outside the cutoff window at `now`.
    #[must_use]
    pub fn is_open_for_changes(&self, screening: &Screening, now: DateTime<Utc>) -> bool {
        screening.hours_until(now) >= self.cutoff_hours
    }

    /// Books `seat_id` of `screening` for `patron`.
    ///
    /// On success the seat is busy and the returned booking is open. The
    /// caller persists both in one unit of work.
    ///
    /// # Errors
    ///
    /// In order of evaluation:
    /// - [`CinemaError::TooLateToBook`] inside the cutoff window
    /// - [`CinemaError::NotFound`] if the seat is not part of the screening
    /// - [`CinemaError::SeatUnavailable`] if the seat is busy
    /// - [`CinemaError::AgeRestricted`] if the patron is too young
    /// - [`CinemaError::SoldOut`] if no seat is free
    pub fn book(
        &self,
        screening: &mut Screening,
        seat_id: SeatId,
        patron: &Patron,
        now: DateTime<Utc>,
    ) -> Result<SeatBooking> {
        if !self.is_open_for_changes(screening, now) {
            return Err(CinemaError::TooLateToBook { seat_id });
        }

        let seat = screening
            .seat(seat_id)
            .ok_or_else(|| CinemaError::not_found(Entity::Seat, seat_id))?;
        if !seat.is_free() {
            return Err(CinemaError::SeatUnavailable { seat_id });
        }

        if !screening.age_gate_satisfied(patron.age) {
            return Err(CinemaError::AgeRestricted {
                age: patron.age,
                min_age: screening.min_age(),
            });
        }

        if !screening.has_free_seats() {
            return Err(CinemaError::SoldOut {
                screening_id: screening.id(),
            });
        }

        let screening_id = screening.id();
        let seat = screening
            .seat_mut(seat_id)
            .ok_or_else(|| CinemaError::not_found(Entity::Seat, seat_id))?;
        seat.mark_busy();

        Ok(SeatBooking::open(
            screening_id,
            seat_id,
            patron,
            self.ticket_price,
            now,
        ))
    }

    /// Cancels `booking` and frees its seat in `screening`.
    ///
    /// # Errors
    ///
    /// In order of evaluation:
    /// - [`CinemaError::AlreadyCancelled`] if the booking is cancelled
    /// - [`CinemaError::NotFound`] if `screening` is not the booking's screening
    ///   or does not contain the booked seat
    /// - [`CinemaError::TooLateToCancel`] inside the cutoff window
    pub fn cancel(
        &self,
        screening: &mut Screening,
        booking: &mut SeatBooking,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !booking.is_open() {
            return Err(CinemaError::AlreadyCancelled {
                booking_id: booking.id(),
            });
        }

        if booking.screening_id() != screening.id() {
            return Err(CinemaError::not_found(
                Entity::Screening,
                booking.screening_id(),
            ));
        }

        if !self.is_open_for_changes(screening, now) {
            return Err(CinemaError::TooLateToCancel {
                booking_id: booking.id(),
            });
        }

        let seat = screening
            .seat_mut(booking.seat_id())
            .ok_or_else(|| CinemaError::not_found(Entity::Seat, booking.seat_id()))?;
        seat.mark_free();
        booking.mark_cancelled();

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::booking::BookingStatus;
    use crate::room::ScreeningRoom;
    use crate::seat::Seat;
    use crate::types::FilmId;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn screening_at(date: DateTime<Utc>, rows: u32, per_row: u32, min_age: u32) -> Screening {
        let room = ScreeningRoom::new(1, rows, per_row).unwrap();
        Screening::created_with(date, min_age, FilmId::new(), &room, room.create_seats())
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 20, 19, 30, 0).unwrap()
    }

    fn adult() -> Patron {
        Patron::new("Ada", "Lovelace", 18)
    }

    #[test]
    fn book_then_cancel_restores_seat() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 2, 3, 13);
        let seat_id = screening.seat_at(1, 1).unwrap().id();

        let mut booking = policy
            .book(&mut screening, seat_id, &adult(), date() - Duration::hours(48))
            .unwrap();
        assert_eq!(screening.free_seat_count(), 5);
        assert!(!screening.seat(seat_id).unwrap().is_free());
        assert_eq!(booking.status(), BookingStatus::Open);
        assert_eq!(booking.price(), Money::from_cents(1_000));

        policy
            .cancel(&mut screening, &mut booking, date() - Duration::hours(30))
            .unwrap();
        assert_eq!(screening.free_seat_count(), 6);
        assert!(screening.seat(seat_id).unwrap().is_free());
        assert_eq!(booking.status(), BookingStatus::Cancelled);

        let again = policy.cancel(&mut screening, &mut booking, date() - Duration::hours(30));
        assert!(matches!(again, Err(CinemaError::AlreadyCancelled { .. })));
    }

    #[test]
    fn cutoff_boundary() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 1, 2, 0);
        let first = screening.seats()[0].id();
        let second = screening.seats()[1].id();

        let too_late = policy.book(&mut screening, first, &adult(), date() - Duration::minutes(23 * 60 + 59));
        assert!(matches!(too_late, Err(CinemaError::TooLateToBook { .. })));
        assert_eq!(screening.free_seat_count(), 2);

        let exactly = policy.book(&mut screening, first, &adult(), date() - Duration::hours(24));
        assert!(exactly.is_ok());

        let just_outside = policy.book(
            &mut screening,
            second,
            &adult(),
            date() - Duration::hours(24) - Duration::seconds(1),
        );
        assert!(just_outside.is_ok());
    }

    #[test]
    fn past_screenings_are_closed() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 1, 1, 0);
        let seat = screening.seats()[0].id();

        let result = policy.book(&mut screening, seat, &adult(), date() + Duration::hours(48));
        assert!(matches!(result, Err(CinemaError::TooLateToBook { .. })));

        let mut booking = policy
            .book(&mut screening, seat, &adult(), date() - Duration::days(3))
            .unwrap();
        let result = policy.cancel(&mut screening, &mut booking, date() + Duration::hours(1));
        assert!(matches!(result, Err(CinemaError::TooLateToCancel { .. })));
        assert!(booking.is_open());
        assert!(!screening.seat(seat).unwrap().is_free());
    }

    #[test]
    fn busy_seat_is_unavailable() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 1, 2, 0);
        let seat = screening.seats()[0].id();
        let now = date() - Duration::days(3);

        policy.book(&mut screening, seat, &adult(), now).unwrap();
        let second = policy.book(&mut screening, seat, &adult(), now);
        assert!(matches!(second, Err(CinemaError::SeatUnavailable { seat_id }) if seat_id == seat));
        assert_eq!(screening.free_seat_count(), 1);
    }

    #[test]
    fn unknown_seat_is_not_found() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 1, 1, 0);

        let result = policy.book(&mut screening, SeatId::new(), &adult(), date() - Duration::days(2));
        assert!(matches!(
            result,
            Err(CinemaError::NotFound { entity: Entity::Seat, .. })
        ));
    }

    #[test]
    fn too_young_patron_is_rejected_without_side_effects() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 1, 1, 16);
        let seat = screening.seats()[0].id();

        let result = policy.book(
            &mut screening,
            seat,
            &Patron::new("Tom", "Sawyer", 12),
            date() - Duration::days(2),
        );
        assert!(matches!(
            result,
            Err(CinemaError::AgeRestricted { age: 12, min_age: 16 })
        ));
        assert!(screening.seat(seat).unwrap().is_free());
    }

    #[test]
    fn cancel_inside_cutoff_keeps_booking_open() {
        let policy = ReservationPolicy::default();
        let mut screening = screening_at(date(), 1, 1, 0);
        let seat = screening.seats()[0].id();
        let mut booking = policy
            .book(&mut screening, seat, &adult(), date() - Duration::days(5))
            .unwrap();

        let result = policy.cancel(&mut screening, &mut booking, date() - Duration::hours(2));
        assert!(matches!(result, Err(CinemaError::TooLateToCancel { .. })));
        assert!(booking.is_open());
        assert_eq!(screening.free_seat_count(), 0);
    }

    #[test]
    fn cancel_against_wrong_screening_is_rejected() {
        let policy = ReservationPolicy::default();
        let mut booked = screening_at(date(), 1, 1, 0);
        let mut other = screening_at(date(), 1, 1, 0);
        let seat = booked.seats()[0].id();
        let mut booking = policy
            .book(&mut booked, seat, &adult(), date() - Duration::days(5))
            .unwrap();

        let result = policy.cancel(&mut other, &mut booking, date() - Duration::days(4));
        assert!(matches!(
            result,
            Err(CinemaError::NotFound { entity: Entity::Screening, .. })
        ));
        assert!(booking.is_open());
    }

    proptest! {
        #[test]
        fn free_count_never_drifts(ops in proptest::collection::vec((0usize..12, any::<bool>()), 1..60)) {
            let policy = ReservationPolicy::default();
            let mut screening = screening_at(date(), 3, 4, 0);
            let seat_ids: Vec<SeatId> = screening.seats().iter().map(Seat::id).collect();
            let mut bookings: Vec<Option<SeatBooking>> = vec![None; seat_ids.len()];
            let now = date() - Duration::days(7);

            for (index, book) in ops {
                let before = screening.free_seat_count();
                if book {
                    match policy.book(&mut screening, seat_ids[index], &adult(), now) {
                        Ok(booking) => {
                            prop_assert_eq!(screening.free_seat_count(), before - 1);
                            bookings[index] = Some(booking);
                        }
                        Err(_) => prop_assert_eq!(screening.free_seat_count(), before),
                    }
                } else if let Some(booking) = bookings[index].as_mut() {
                    match policy.cancel(&mut screening, booking, now) {
                        Ok(()) => prop_assert_eq!(screening.free_seat_count(), before + 1),
                        Err(_) => prop_assert_eq!(screening.free_seat_count(), before),
                    }
                }

                let busy = screening.seats().iter().filter(|seat| !seat.is_free()).count();
                let open = bookings.iter().flatten().filter(|booking| booking.is_open()).count();
                prop_assert_eq!(busy, open);
                prop_assert_eq!(screening.free_seat_count() + busy, screening.capacity());
            }
        }
    }
}
