//! Temporal collision detection between screenings sharing a room.

use crate::types::{RoomId, ScreeningId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time interval `[start, end)` occupied by a screening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window starting at `start` and lasting `length`.
    ///
    /// A negative length is treated as zero.
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        let length = length.max(Duration::zero());
        Self {
            start,
            end: start + length,
        }
    }

    /// Inclusive start
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && s2 < e1`.
    ///
    /// Back-to-back windows (one ends exactly when the other starts) do not
    /// overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An already scheduled screening, reduced to what collision checks need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledSlot {
    /// The scheduled screening
    pub screening_id: ScreeningId,
    /// Room it occupies
    pub room_id: RoomId,
    /// Time it occupies
    pub window: TimeWindow,
}

/// Decides whether a candidate screening fits into a room's timetable.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionChecker;

impl CollisionChecker {
    /// Creates a new `CollisionChecker`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether `candidate` in `room_id` overlaps any of `existing`.
    #[must_use]
    pub fn collides(&self, room_id: RoomId, candidate: TimeWindow, existing: &[ScheduledSlot]) -> bool {
        self.first_collision(room_id, candidate, existing).is_some()
    }

    /// The earliest-starting scheduled screening that overlaps `candidate`.
    ///
    /// Slots in other rooms are ignored regardless of time.
    #[must_use]
    pub fn first_collision(
        &self,
        room_id: RoomId,
        candidate: TimeWindow,
        existing: &[ScheduledSlot],
    ) -> Option<ScreeningId> {
        existing
            .iter()
            .filter(|slot| slot.room_id == room_id && slot.window.overlaps(&candidate))
            .min_by_key(|slot| slot.window.start())
            .map(|slot| slot.screening_id)
    }
}
