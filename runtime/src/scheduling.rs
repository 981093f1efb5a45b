//! Room management and screening scheduling.

use crate::metrics::{self, ROOMS_CREATED, SCREENINGS_CREATED, counter};
use chrono::{Datelike, Duration, NaiveDate};
use cinema_core::collision::{CollisionChecker, ScheduledSlot, TimeWindow};
use cinema_core::environment::Clock;
use cinema_core::error::Result;
use cinema_core::film_year::FilmYearRule;
use cinema_core::room::ScreeningRoom;
use cinema_core::screening::Screening;
use cinema_core::store::{CinemaStore, FilmCatalog, StoreError, UnitOfWork};
use cinema_core::types::{FilmId, RoomId, ScreeningId};
use cinema_core::{CinemaError, DateTime, Entity, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Request to create a screening room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRoom {
    /// Human-facing room number, unique across rooms
    pub number: u32,
    /// Number of seat rows
    pub rows: u32,
    /// Seats in each row
    pub seats_per_row: u32,
}

/// Request to schedule a screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewScreening {
    /// Start time
    pub date: DateTime<Utc>,
    /// Minimum patron age
    pub min_age: u32,
    /// Film to show
    pub film_id: FilmId,
    /// Room to show it in
    pub room_id: RoomId,
}

/// Creates rooms and screenings and answers screening queries.
///
/// Scheduling is a read-check-write sequence: the room's timetable is read,
/// the new slot is checked against it, and the insert is committed together
/// with a guard on the timetable version. Two racing inserts into the same
/// room therefore cannot both succeed; the loser fails with a retryable
/// conflict and, on retry, sees the winner's slot.
#[derive(Clone)]
pub struct SchedulingFacade {
    store: Arc<dyn CinemaStore>,
    films: Arc<dyn FilmCatalog>,
    year_rule: FilmYearRule,
    collisions: CollisionChecker,
}

impl std::fmt::Debug for SchedulingFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulingFacade")
            .field("year_rule", &self.year_rule)
            .finish_non_exhaustive()
    }
}

impl SchedulingFacade {
    /// Create a facade with the default year rule.
    #[must_use]
    pub fn new(store: Arc<dyn CinemaStore>, films: Arc<dyn FilmCatalog>) -> Self {
        Self {
            store,
            films,
            year_rule: FilmYearRule::default(),
            collisions: CollisionChecker::new(),
        }
    }

    /// Use a different rule for acceptable screening years.
    #[must_use]
    pub const fn with_year_rule(mut self, year_rule: FilmYearRule) -> Self {
        self.year_rule = year_rule;
        self
    }

    /// Create a room with a rectangular seat layout.
    ///
    /// # Errors
    ///
    /// - [`CinemaError::InvalidRoomLayout`] if either dimension is zero
    /// - [`CinemaError::RoomAlreadyExists`] if the number is taken
    #[tracing::instrument(skip(self), fields(number = request.number))]
    pub async fn add_room(&self, request: NewRoom) -> Result<ScreeningRoom> {
        let started = Instant::now();
        let result = self.try_add_room(request).await;
        metrics::observe("add_room", started, &result);
        result
    }

    async fn try_add_room(&self, request: NewRoom) -> Result<ScreeningRoom> {
        let room = ScreeningRoom::new(request.number, request.rows, request.seats_per_row)?;

        if self.store.room_number_taken(room.number()).await? {
            return Err(CinemaError::RoomAlreadyExists {
                number: room.number(),
            });
        }

        // A racing insert of the same number is caught by the store.
        self.store
            .insert_room(room.clone())
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => CinemaError::RoomAlreadyExists {
                    number: room.number(),
                },
                other => CinemaError::Store(other),
            })?;

        counter!(ROOMS_CREATED).increment(1);
        tracing::info!(room_id = %room.id(), capacity = room.capacity(), "Room created");
        Ok(room)
    }

    /// Look up a room.
    ///
    /// # Errors
    ///
    /// [`CinemaError::NotFound`] if no such room exists.
    pub async fn room(&self, room_id: RoomId) -> Result<ScreeningRoom> {
        self.store
            .room(room_id)
            .await?
            .ok_or_else(|| CinemaError::not_found(Entity::Room, room_id))
    }

    /// All rooms, ordered by number.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn rooms_all(&self) -> Result<Vec<ScreeningRoom>> {
        Ok(self.store.rooms().await?)
    }

    /// Schedule a screening.
    ///
    /// Checks run in order, and nothing is persisted unless all pass:
    /// film exists, room exists, the screening year is acceptable, and the
    /// film's running window does not overlap another screening in the room.
    /// The new screening gets a fresh set of free seats copied from the room
    /// layout.
    ///
    /// # Errors
    ///
    /// - [`CinemaError::NotFound`] for an unknown film or room
    /// - [`CinemaError::InvalidYear`] if the year rule rejects the date
    /// - [`CinemaError::SchedulingCollision`] naming the earliest overlapping
    ///   screening
    /// - a retryable store conflict if the room's timetable changed
    ///   concurrently
    #[tracing::instrument(
        skip(self, request, clock),
        fields(film_id = %request.film_id, room_id = %request.room_id, date = %request.date)
    )]
    pub async fn add_screening(&self, request: NewScreening, clock: &dyn Clock) -> Result<Screening> {
        let started = Instant::now();
        let result = self.try_add_screening(request, clock).await;
        metrics::observe("add_screening", started, &result);
        result
    }

    async fn try_add_screening(&self, request: NewScreening, clock: &dyn Clock) -> Result<Screening> {
        if !self.films.exists(request.film_id).await? {
            return Err(CinemaError::not_found(Entity::Film, request.film_id));
        }

        let room = self.room(request.room_id).await?;

        let current_year = clock.current_year();
        let year = request.date.year();
        if !self.year_rule.is_acceptable(year, current_year) {
            return Err(CinemaError::InvalidYear { year, current_year });
        }

        let schedule = self.store.room_schedule(room.id()).await?;
        let mut durations = HashMap::new();
        let candidate = Duration::minutes(i64::from(
            self.duration_of(request.film_id, &mut durations).await?,
        ));

        let existing = self.slots_of(&schedule.screenings, &mut durations).await?;

        let window = TimeWindow::starting_at(request.date, candidate);
        if let Some(conflicting) = self.collisions.first_collision(room.id(), window, &existing) {
            return Err(CinemaError::SchedulingCollision { conflicting });
        }

        let screening = Screening::created_with(
            request.date,
            request.min_age,
            request.film_id,
            &room,
            room.create_seats(),
        );
        self.store
            .commit(
                UnitOfWork::new()
                    .guard_schedule(room.id(), schedule.version)
                    .insert_screening(screening.clone()),
            )
            .await?;

        counter!(SCREENINGS_CREATED).increment(1);
        tracing::info!(
            screening_id = %screening.id(),
            seats = screening.capacity(),
            "Screening scheduled"
        );
        Ok(screening)
    }

    async fn slots_of(
        &self,
        screenings: &[Screening],
        durations: &mut HashMap<FilmId, u32>,
    ) -> Result<Vec<ScheduledSlot>> {
        let mut slots = Vec::with_capacity(screenings.len());
        for screening in screenings {
            let minutes = self.duration_of(screening.film_id(), durations).await?;
            slots.push(screening.slot(Duration::minutes(i64::from(minutes))));
        }
        Ok(slots)
    }

    async fn duration_of(&self, film_id: FilmId, cache: &mut HashMap<FilmId, u32>) -> Result<u32> {
        if let Some(minutes) = cache.get(&film_id) {
            return Ok(*minutes);
        }
        let minutes = self
            .films
            .duration_of(film_id)
            .await?
            .ok_or_else(|| CinemaError::not_found(Entity::Film, film_id))?;
        cache.insert(film_id, minutes);
        Ok(minutes)
    }

    /// Look up a screening.
    ///
    /// # Errors
    ///
    /// [`CinemaError::NotFound`] if no such screening exists.
    pub async fn by_id(&self, screening_id: ScreeningId) -> Result<Screening> {
        self.store
            .screening(screening_id)
            .await?
            .map(|versioned| versioned.value)
            .ok_or_else(|| CinemaError::not_found(Entity::Screening, screening_id))
    }

    /// All screenings, ordered by date.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn all(&self) -> Result<Vec<Screening>> {
        Ok(self.store.screenings().await?)
    }

    /// Screenings of one film, ordered by date. Empty for an unknown film.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn by_film(&self, film_id: FilmId) -> Result<Vec<Screening>> {
        Ok(self.store.screenings_for_film(film_id).await?)
    }

    /// Screenings starting on a calendar day (UTC), ordered by time.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<Screening>> {
        Ok(self.store.screenings_on(date).await?)
    }

    /// Timetable slots of one room, for callers that render schedules.
    ///
    /// # Errors
    ///
    /// [`CinemaError::NotFound`] if the room or a scheduled film is unknown.
    pub async fn slots_in_room(&self, room_id: RoomId) -> Result<Vec<ScheduledSlot>> {
        let room = self.room(room_id).await?;
        let schedule = self.store.room_schedule(room.id()).await?;
        self.slots_of(&schedule.screenings, &mut HashMap::new()).await
    }
}
