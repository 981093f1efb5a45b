//! # Cinema Runtime
//!
//! Orchestration for the cinema domain: the [`SchedulingFacade`] creates
//! rooms and screenings, the [`ReservationEngine`] books and cancels seats.
//! Both load state through a [`CinemaStore`](cinema_core::store::CinemaStore),
//! apply the rules from `cinema-core`, and commit the result as a single
//! unit of work guarded by optimistic concurrency.
//!
//! Around that sit the ambient pieces:
//! - [`config`]: `CINEMA_*` environment configuration
//! - [`telemetry`]: `tracing` subscriber setup
//! - [`metrics`]: Prometheus counters and latency histogram
//! - [`retry`]: backoff for conflicting commits
//!
//! ## Example
//!
//! ```
//! use cinema_runtime::{BookSeat, CinemaConfig, NewRoom, NewScreening, ReservationEngine, SchedulingFacade};
//! use cinema_runtime::retry::retry_on_conflict;
//! use cinema_testing::{FixedClock, InMemoryCinemaStore, StaticFilmCatalog, adult_patron, at};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let config = CinemaConfig::default();
//! let mut films = StaticFilmCatalog::new();
//! let film_id = films.add_film(120);
//! let store = Arc::new(InMemoryCinemaStore::new());
//!
//! let facade = SchedulingFacade::new(store.clone(), Arc::new(films));
//! let engine = ReservationEngine::new(store).with_policy(config.reservation_policy());
//! let clock = FixedClock::new(at(2025, 5, 1, 12, 0));
//!
//! let room = facade.add_room(NewRoom { number: 1, rows: 2, seats_per_row: 3 }).await?;
//! let screening = facade
//!     .add_screening(
//!         NewScreening { date: at(2025, 6, 1, 20, 0), min_age: 13, film_id, room_id: room.id() },
//!         &clock,
//!     )
//!     .await?;
//!
//! let seat_id = screening.seats()[0].id();
//! let booking = retry_on_conflict(&config.retry_policy(), || {
//!     engine.book(
//!         BookSeat { screening_id: screening.id(), seat_id, patron: adult_patron() },
//!         &clock,
//!     )
//! })
//! .await?;
//!
//! assert!(booking.is_open());
//! assert_eq!(facade.by_id(screening.id()).await?.free_seat_count(), 5);
//! # Ok::<(), cinema_core::CinemaError>(())
//! # }).unwrap_or_else(|e| panic!("{e}"));
//! ```

pub mod config;
pub mod metrics;
pub mod reservation;
pub mod retry;
pub mod scheduling;
pub mod telemetry;

pub use config::{CinemaConfig, ConfigError};
pub use reservation::{BookSeat, ReservationEngine};
pub use retry::{RetryPolicy, retry_on_conflict};
pub use scheduling::{NewRoom, NewScreening, SchedulingFacade};
