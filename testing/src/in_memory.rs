//! In-memory store with optimistic concurrency.

use cinema_core::booking::SeatBooking;
use cinema_core::room::ScreeningRoom;
use cinema_core::screening::Screening;
use cinema_core::store::{
    CinemaStore, RoomSchedule, StoreError, StoreFuture, UnitOfWork, Version, Versioned,
};
use cinema_core::types::{BookingId, FilmId, RoomId, ScreeningId};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    rooms: HashMap<RoomId, ScreeningRoom>,
    screenings: HashMap<ScreeningId, Versioned<Screening>>,
    schedule_versions: HashMap<RoomId, Version>,
    bookings: HashMap<BookingId, SeatBooking>,
    booking_order: Vec<BookingId>,
    injected_conflicts: usize,
    commits: usize,
}

impl State {
    fn schedule_version(&self, room_id: RoomId) -> Version {
        self.schedule_versions
            .get(&room_id)
            .copied()
            .unwrap_or(Version::INITIAL)
    }

    fn sorted_screenings(&self, keep: impl Fn(&Screening) -> bool) -> Vec<Screening> {
        let mut screenings: Vec<Screening> = self
            .screenings
            .values()
            .map(|versioned| &versioned.value)
            .filter(|screening| keep(screening))
            .cloned()
            .collect();
        screenings.sort_by_key(|screening| (screening.date(), screening.id()));
        screenings
    }

    fn check(&self, work: &UnitOfWork) -> Result<(), StoreError> {
        for (room_id, expected) in &work.schedule_guards {
            if self.schedule_version(*room_id) != *expected {
                return Err(StoreError::Conflict {
                    resource: format!("schedule of room {room_id}"),
                });
            }
        }

        for write in &work.screenings {
            let current = self
                .screenings
                .get(&write.screening.id())
                .map(|versioned| versioned.version);
            if current != write.expected {
                return Err(StoreError::Conflict {
                    resource: format!("screening {}", write.screening.id()),
                });
            }
        }

        Ok(())
    }

    fn apply(&mut self, work: UnitOfWork) {
        for write in work.screenings {
            let id = write.screening.id();
            let room_id = write.screening.room_id();
            let version = write.expected.unwrap_or(Version::INITIAL).next();
            if write.expected.is_none() {
                let schedule = self.schedule_version(room_id).next();
                self.schedule_versions.insert(room_id, schedule);
            }
            self.screenings
                .insert(id, Versioned::new(write.screening, version));
        }

        for booking in work.bookings {
            let id = booking.id();
            if self.bookings.insert(id, booking).is_none() {
                self.booking_order.push(id);
            }
        }

        self.commits += 1;
    }
}

/// `HashMap`-backed [`CinemaStore`] for fast, deterministic tests.
///
/// Commits are serialized by a single lock and enforce the same version
/// guards a database-backed store would, so concurrency tests exercise real
/// conflicts. [`InMemoryCinemaStore::inject_conflicts`] forces the next
/// commits to fail for retry tests.
///
/// # Example
///
/// ```
/// use cinema_testing::InMemoryCinemaStore;
/// use cinema_core::room::ScreeningRoom;
/// use cinema_core::store::CinemaStore;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryCinemaStore::new();
/// let room = ScreeningRoom::new(1, 10, 12).unwrap_or_else(|_| unreachable!());
/// store.insert_room(room.clone()).await.unwrap_or_default();
///
/// assert!(store.room_number_taken(1).await.unwrap_or(false));
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryCinemaStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryCinemaStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` commits fail with [`StoreError::Conflict`].
    pub async fn inject_conflicts(&self, count: usize) {
        self.state.write().await.injected_conflicts = count;
    }

    /// Number of successfully applied units of work
    pub async fn commit_count(&self) -> usize {
        self.state.read().await.commits
    }

    /// Number of stored bookings
    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }
}

impl CinemaStore for InMemoryCinemaStore {
    fn room(&self, room_id: RoomId) -> StoreFuture<'_, Option<ScreeningRoom>> {
        Box::pin(async move { Ok(self.state.read().await.rooms.get(&room_id).cloned()) })
    }

    fn rooms(&self) -> StoreFuture<'_, Vec<ScreeningRoom>> {
        Box::pin(async move {
            let mut rooms: Vec<ScreeningRoom> =
                self.state.read().await.rooms.values().cloned().collect();
            rooms.sort_by_key(ScreeningRoom::number);
            Ok(rooms)
        })
    }

    fn room_number_taken(&self, number: u32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            Ok(self
                .state
                .read()
                .await
                .rooms
                .values()
                .any(|room| room.number() == number))
        })
    }

    fn insert_room(&self, room: ScreeningRoom) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            if state.rooms.values().any(|existing| existing.number() == room.number()) {
                return Err(StoreError::Duplicate(format!("room number {}", room.number())));
            }
            state.rooms.insert(room.id(), room);
            Ok(())
        })
    }

    fn screening(&self, screening_id: ScreeningId) -> StoreFuture<'_, Option<Versioned<Screening>>> {
        Box::pin(async move {
            Ok(self.state.read().await.screenings.get(&screening_id).cloned())
        })
    }

    fn screenings(&self) -> StoreFuture<'_, Vec<Screening>> {
        Box::pin(async move { Ok(self.state.read().await.sorted_screenings(|_| true)) })
    }

    fn screenings_for_film(&self, film_id: FilmId) -> StoreFuture<'_, Vec<Screening>> {
        Box::pin(async move {
            Ok(self
                .state
                .read()
                .await
                .sorted_screenings(|screening| screening.film_id() == film_id))
        })
    }

    fn screenings_on(&self, date: NaiveDate) -> StoreFuture<'_, Vec<Screening>> {
        Box::pin(async move {
            Ok(self
                .state
                .read()
                .await
                .sorted_screenings(|screening| screening.date().date_naive() == date))
        })
    }

    fn room_schedule(&self, room_id: RoomId) -> StoreFuture<'_, RoomSchedule> {
        Box::pin(async move {
            let state = self.state.read().await;
            Ok(RoomSchedule {
                room_id,
                version: state.schedule_version(room_id),
                screenings: state.sorted_screenings(|screening| screening.room_id() == room_id),
            })
        })
    }

    fn booking(&self, booking_id: BookingId) -> StoreFuture<'_, Option<SeatBooking>> {
        Box::pin(async move { Ok(self.state.read().await.bookings.get(&booking_id).cloned()) })
    }

    fn bookings_for_screening(&self, screening_id: ScreeningId) -> StoreFuture<'_, Vec<SeatBooking>> {
        Box::pin(async move {
            let state = self.state.read().await;
            Ok(state
                .booking_order
                .iter()
                .filter_map(|id| state.bookings.get(id))
                .filter(|booking| booking.screening_id() == screening_id)
                .cloned()
                .collect())
        })
    }

    fn commit(&self, work: UnitOfWork) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            if state.injected_conflicts > 0 {
                state.injected_conflicts -= 1;
                return Err(StoreError::Conflict {
                    resource: "injected conflict".to_string(),
                });
            }
            state.check(&work)?;
            state.apply(work);
            Ok(())
        })
    }
}
