//! The screening aggregate: a film shown in a room at a time, with its seats.

use crate::collision::{ScheduledSlot, TimeWindow};
use crate::room::ScreeningRoom;
use crate::seat::{Seat, SeatStatus};
use crate::types::{FilmId, RoomId, ScreeningId, SeatId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled showing of a film.
///
/// The seat collection is generated once, when the screening is created, and
/// is owned exclusively by it. The free-seat count is derived from the seats
/// on every read, so it can never drift from their statuses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screening {
    id: ScreeningId,
    date: DateTime<Utc>,
    min_age: u32,
    film_id: FilmId,
    room_id: RoomId,
    seats: Vec<Seat>,
}

impl Screening {
    /// Creates a screening with a fresh identity.
    #[must_use]
    pub fn created_with(
        date: DateTime<Utc>,
        min_age: u32,
        film_id: FilmId,
        room: &ScreeningRoom,
        seats: Vec<Seat>,
    ) -> Self {
        Self {
            id: ScreeningId::new(),
            date,
            min_age,
            film_id,
            room_id: room.id(),
            seats,
        }
    }

    /// Screening identifier
    #[must_use]
    pub const fn id(&self) -> ScreeningId {
        self.id
    }

    /// Scheduled start
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Minimum patron age
    #[must_use]
    pub const fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Film shown
    #[must_use]
    pub const fn film_id(&self) -> FilmId {
        self.film_id
    }

    /// Room the screening takes place in
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Seats in row-major order
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Total number of seats
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    /// Number of seats currently free
    #[must_use]
    pub fn free_seat_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_free()).count()
    }

    /// Whether at least one seat is free
    #[must_use]
    pub fn has_free_seats(&self) -> bool {
        self.seats.iter().any(Seat::is_free)
    }

    /// Looks up a seat by identity
    #[must_use]
    pub fn seat(&self, seat_id: SeatId) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.id() == seat_id)
    }

    /// Looks up a seat by position
    #[must_use]
    pub fn seat_at(&self, row: u32, number: u32) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|seat| seat.row() == row && seat.number() == number)
    }

    pub(crate) fn seat_mut(&mut self, seat_id: SeatId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.id() == seat_id)
    }

    /// Time the screening occupies its room for a film of `film_duration`.
    #[must_use]
    pub fn time_window(&self, film_duration: Duration) -> TimeWindow {
        TimeWindow::starting_at(self.date, film_duration)
    }

    /// The screening as a collision-check slot.
    #[must_use]
    pub fn slot(&self, film_duration: Duration) -> ScheduledSlot {
        ScheduledSlot {
            screening_id: self.id,
            room_id: self.room_id,
            window: self.time_window(film_duration),
        }
    }

    /// `patron_age >= min_age`
    #[must_use]
    pub const fn age_gate_satisfied(&self, patron_age: u32) -> bool {
        patron_age >= self.min_age
    }

    /// Whole hours from `now` until the screening starts.
    ///
    /// Truncates toward zero and is negative once the screening has started.
    #[must_use]
    pub fn hours_until(&self, now: DateTime<Utc>) -> i64 {
        (self.date - now).num_hours()
    }

    /// Read-model of the screening with its derived free-seat count.
    #[must_use]
    pub fn view(&self) -> ScreeningView {
        ScreeningView {
            id: self.id,
            date: self.date,
            free_seats: self.free_seat_count(),
            min_age: self.min_age,
            film_id: self.film_id,
            room_id: self.room_id,
            seats: self.seats.iter().map(SeatView::from).collect(),
        }
    }
}

/// Flat representation of a seat for callers that render screenings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    /// Seat identifier
    pub id: SeatId,
    /// Row number
    pub row: u32,
    /// Seat number within the row
    pub number: u32,
    /// Current status
    pub status: SeatStatus,
}

impl From<&Seat> for SeatView {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id(),
            row: seat.row(),
            number: seat.number(),
            status: seat.status(),
        }
    }
}

/// Flat representation of a screening for callers that render screenings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningView {
    /// Screening identifier
    pub id: ScreeningId,
    /// Scheduled start (ISO-8601 on the wire)
    pub date: DateTime<Utc>,
    /// Seats currently free
    pub free_seats: usize,
    /// Minimum patron age
    pub min_age: u32,
    /// Film shown
    pub film_id: FilmId,
    /// Room used
    pub room_id: RoomId,
    /// All seats in row-major order
    pub seats: Vec<SeatView>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn screening(rows: u32, per_row: u32) -> Screening {
        let room = ScreeningRoom::new(1, rows, per_row).unwrap();
        let date = Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap();
        Screening::created_with(date, 13, FilmId::new(), &room, room.create_seats())
    }

    #[test]
    fn fresh_screening_is_fully_free() {
        let screening = screening(2, 3);
        assert_eq!(screening.capacity(), 6);
        assert_eq!(screening.free_seat_count(), 6);
        assert!(screening.has_free_seats());
    }

    #[test]
    fn free_count_follows_seat_statuses() {
        let mut screening = screening(1, 2);
        let ids: Vec<SeatId> = screening.seats().iter().map(Seat::id).collect();
        for id in &ids {
            screening.seat_mut(*id).unwrap().mark_busy();
        }
        assert_eq!(screening.free_seat_count(), 0);
        assert!(!screening.has_free_seats());
    }

    #[test]
    fn seat_lookup_by_id_and_position() {
        let screening = screening(2, 2);
        let seat = screening.seat_at(2, 1).unwrap();
        assert_eq!(screening.seat(seat.id()), Some(seat));
        assert!(screening.seat(SeatId::new()).is_none());
        assert!(screening.seat_at(3, 1).is_none());
    }

    #[test]
    fn age_gate() {
        let screening = screening(1, 1);
        assert!(screening.age_gate_satisfied(13));
        assert!(screening.age_gate_satisfied(40));
        assert!(!screening.age_gate_satisfied(12));
    }

    #[test]
    fn hours_until_truncates_and_goes_negative() {
        let screening = screening(1, 1);
        let date = screening.date();
        assert_eq!(screening.hours_until(date - Duration::minutes(24 * 60 + 1)), 24);
        assert_eq!(screening.hours_until(date - Duration::minutes(24 * 60 - 1)), 23);
        assert_eq!(screening.hours_until(date + Duration::hours(2)), -2);
    }

    #[test]
    fn window_spans_film_duration() {
        let screening = screening(1, 1);
        let window = screening.time_window(Duration::minutes(95));
        assert_eq!(window.start(), screening.date());
        assert_eq!(window.end(), screening.date() + Duration::minutes(95));
    }

    #[test]
    fn view_serializes_iso_dates() {
        let screening = screening(1, 2);
        let json = serde_json::to_value(screening.view()).unwrap();
        assert_eq!(json["date"], "2025-06-01T20:00:00Z");
        assert_eq!(json["free_seats"], 2);
        assert_eq!(json["seats"][0]["status"], "FREE");
    }
}
