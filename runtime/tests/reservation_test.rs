//! Integration tests for booking and cancelling seats.
//!
//! The scenario mirrors a patron's timeline: a screening at 20:00 on
//! 2025-06-01 in a 2x3 room, booked two days ahead and cancelled the next
//! day, then attempts inside the 24 hour window.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, Utc};
use cinema_core::booking::BookingStatus;
use cinema_core::screening::Screening;
use cinema_core::types::{BookingId, Money, ScreeningId, SeatId};
use cinema_core::{CinemaError, Entity};
use cinema_runtime::{BookSeat, CinemaConfig, NewRoom, NewScreening, ReservationEngine, SchedulingFacade};
use cinema_testing::{
    FixedClock, InMemoryCinemaStore, StaticFilmCatalog, adult_patron, at, init_test_tracing, patron_aged,
};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    facade: SchedulingFacade,
    engine: ReservationEngine,
    store: Arc<InMemoryCinemaStore>,
    screening: Screening,
}

fn screening_date() -> DateTime<Utc> {
    at(2025, 6, 1, 20, 0)
}

fn hours_before(hours: i64) -> FixedClock {
    FixedClock::new(screening_date() - Duration::hours(hours))
}

async fn fixture_with_min_age(min_age: u32) -> Fixture {
    init_test_tracing();
    let mut catalog = StaticFilmCatalog::new();
    let film_id = catalog.add_film(120);
    let store = Arc::new(InMemoryCinemaStore::new());
    let facade = SchedulingFacade::new(store.clone(), Arc::new(catalog));
    let engine = ReservationEngine::new(store.clone());

    let room = facade
        .add_room(NewRoom {
            number: 1,
            rows: 2,
            seats_per_row: 3,
        })
        .await
        .unwrap();
    let screening = facade
        .add_screening(
            NewScreening {
                date: screening_date(),
                min_age,
                film_id,
                room_id: room.id(),
            },
            &hours_before(72),
        )
        .await
        .unwrap();

    Fixture {
        facade,
        engine,
        store,
        screening,
    }
}

async fn fixture() -> Fixture {
    fixture_with_min_age(13).await
}

fn first_seat(screening: &Screening) -> SeatId {
    screening.seat_at(1, 1).unwrap().id()
}

fn request(screening_id: ScreeningId, seat_id: SeatId) -> BookSeat {
    BookSeat {
        screening_id,
        seat_id,
        patron: adult_patron(),
    }
}

async fn free_seats(fx: &Fixture) -> usize {
    fx.facade
        .by_id(fx.screening.id())
        .await
        .unwrap()
        .free_seat_count()
}

// ============================================================================
// Booking lifecycle
// ============================================================================

#[tokio::test]
async fn book_then_cancel_then_cancel_again() {
    let fx = fixture().await;
    let seat_id = first_seat(&fx.screening);
    assert_eq!(free_seats(&fx).await, 6);

    let booking = fx
        .engine
        .book(request(fx.screening.id(), seat_id), &hours_before(48))
        .await
        .unwrap();
    assert_eq!(booking.status(), BookingStatus::Open);
    assert_eq!(booking.first_name(), "Jan");
    assert_eq!(booking.price(), Money::from_cents(1_000));
    assert_eq!(free_seats(&fx).await, 5);

    fx.engine.cancel(booking.id(), &hours_before(30)).await.unwrap();
    assert_eq!(free_seats(&fx).await, 6);
    assert_eq!(
        fx.engine.booking(booking.id()).await.unwrap().status(),
        BookingStatus::Cancelled
    );

    let again = fx.engine.cancel(booking.id(), &hours_before(29)).await;
    assert!(matches!(again, Err(CinemaError::AlreadyCancelled { booking_id }) if booking_id == booking.id()));
    assert_eq!(free_seats(&fx).await, 6);
}

#[tokio::test]
async fn booking_inside_cutoff_is_too_late() {
    let fx = fixture().await;
    let seat_id = first_seat(&fx.screening);

    let result = fx
        .engine
        .book(request(fx.screening.id(), seat_id), &hours_before(23))
        .await;

    assert!(matches!(result, Err(CinemaError::TooLateToBook { .. })));
    assert_eq!(free_seats(&fx).await, 6);
    assert_eq!(fx.store.booking_count().await, 0);
}

#[tokio::test]
async fn booking_exactly_at_cutoff_is_allowed() {
    let fx = fixture().await;
    let seat_id = first_seat(&fx.screening);

    let result = fx
        .engine
        .book(request(fx.screening.id(), seat_id), &hours_before(24))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn cancelling_inside_cutoff_keeps_seat_busy() {
    let fx = fixture().await;
    let seat_id = first_seat(&fx.screening);
    let booking = fx
        .engine
        .book(request(fx.screening.id(), seat_id), &hours_before(48))
        .await
        .unwrap();

    let result = fx.engine.cancel(booking.id(), &hours_before(10)).await;

    assert!(matches!(result, Err(CinemaError::TooLateToCancel { .. })));
    assert!(fx.engine.booking(booking.id()).await.unwrap().is_open());
    assert_eq!(free_seats(&fx).await, 5);
}

#[tokio::test]
async fn busy_seat_is_unavailable() {
    let fx = fixture().await;
    let seat_id = first_seat(&fx.screening);
    fx.engine
        .book(request(fx.screening.id(), seat_id), &hours_before(48))
        .await
        .unwrap();

    let result = fx
        .engine
        .book(request(fx.screening.id(), seat_id), &hours_before(47))
        .await;

    assert!(matches!(result, Err(CinemaError::SeatUnavailable { seat_id: s }) if s == seat_id));
    assert_eq!(fx.store.booking_count().await, 1);
}

#[tokio::test]
async fn too_young_patron_is_rejected() {
    let fx = fixture_with_min_age(18).await;
    let seat_id = first_seat(&fx.screening);

    let result = fx
        .engine
        .book(
            BookSeat {
                screening_id: fx.screening.id(),
                seat_id,
                patron: patron_aged(15),
            },
            &hours_before(48),
        )
        .await;

    assert!(matches!(result, Err(CinemaError::AgeRestricted { age: 15, min_age: 18 })));
    assert_eq!(free_seats(&fx).await, 6);
}

#[tokio::test]
async fn last_seat_then_full_house() {
    let fx = fixture().await;
    let seats: Vec<SeatId> = fx.screening.seats().iter().map(|s| s.id()).collect();

    for seat_id in &seats {
        fx.engine
            .book(request(fx.screening.id(), *seat_id), &hours_before(48))
            .await
            .unwrap();
    }

    assert_eq!(free_seats(&fx).await, 0);
    let result = fx
        .engine
        .book(request(fx.screening.id(), seats[0]), &hours_before(48))
        .await;
    assert!(matches!(result, Err(CinemaError::SeatUnavailable { .. })));
}

#[tokio::test]
async fn ticket_price_follows_configuration() {
    let fx = fixture().await;
    let config = CinemaConfig::from_lookup(|key| {
        (key == "CINEMA_TICKET_PRICE_CENTS").then(|| "1250".to_string())
    })
    .unwrap();
    let engine = ReservationEngine::new(fx.store.clone()).with_policy(config.reservation_policy());

    let booking = engine
        .book(
            request(fx.screening.id(), first_seat(&fx.screening)),
            &hours_before(48),
        )
        .await
        .unwrap();
    assert_eq!(booking.price().to_string(), "12.50");
}

// ============================================================================
// Lookups
// ============================================================================

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let fx = fixture().await;

    let result = fx
        .engine
        .book(request(ScreeningId::new(), SeatId::new()), &hours_before(48))
        .await;
    assert!(matches!(
        result,
        Err(CinemaError::NotFound {
            entity: Entity::Screening,
            ..
        })
    ));

    let result = fx
        .engine
        .book(request(fx.screening.id(), SeatId::new()), &hours_before(48))
        .await;
    assert!(matches!(
        result,
        Err(CinemaError::NotFound {
            entity: Entity::Seat,
            ..
        })
    ));

    let result = fx.engine.cancel(BookingId::new(), &hours_before(48)).await;
    assert!(matches!(
        result,
        Err(CinemaError::NotFound {
            entity: Entity::Booking,
            ..
        })
    ));

    let result = fx.engine.bookings_for_screening(ScreeningId::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn bookings_are_listed_per_screening_in_order() {
    let fx = fixture().await;
    let first = fx
        .engine
        .book(request(fx.screening.id(), first_seat(&fx.screening)), &hours_before(50))
        .await
        .unwrap();
    let second_seat = fx.screening.seat_at(2, 2).unwrap().id();
    let second = fx
        .engine
        .book(request(fx.screening.id(), second_seat), &hours_before(49))
        .await
        .unwrap();
    fx.engine.cancel(first.id(), &hours_before(48)).await.unwrap();

    let bookings = fx.engine.bookings_for_screening(fx.screening.id()).await.unwrap();
    let ids: Vec<BookingId> = bookings.iter().map(|b| b.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert!(!bookings[0].is_open());
    assert!(bookings[1].is_open());
}
