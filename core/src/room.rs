//! Screening rooms and the seat grid they generate.

use crate::error::{CinemaError, Result};
use crate::seat::Seat;
use crate::types::RoomId;
use serde::{Deserialize, Serialize};

/// Rectangular seat grid of a room.
///
/// Seats are generated row-major: row 1 seats `1..=seats_per_row`, then row 2,
/// and so on. Every generated seat starts free and gets a fresh identity, so
/// each screening owns its own copy of the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLayout {
    rows: u32,
    seats_per_row: u32,
}

impl RoomLayout {
    /// Creates a layout with at least one row of one seat.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::InvalidRoomLayout`] if either dimension is zero.
    pub fn new(rows: u32, seats_per_row: u32) -> Result<Self> {
        if rows == 0 || seats_per_row == 0 {
            return Err(CinemaError::InvalidRoomLayout {
                rows,
                seats_per_row,
            });
        }
        Ok(Self {
            rows,
            seats_per_row,
        })
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Seats in each row
    #[must_use]
    pub const fn seats_per_row(&self) -> u32 {
        self.seats_per_row
    }

    /// `rows × seats_per_row`
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.rows as usize * self.seats_per_row as usize
    }

    /// Generates the free seat grid for one screening.
    #[must_use]
    pub fn create_seats(&self) -> Vec<Seat> {
        let mut seats = Vec::with_capacity(self.capacity());
        for row in 1..=self.rows {
            for number in 1..=self.seats_per_row {
                seats.push(Seat::free(row, number));
            }
        }
        seats
    }
}

/// A physical room screenings are scheduled into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningRoom {
    id: RoomId,
    number: u32,
    layout: RoomLayout,
}

impl ScreeningRoom {
    /// Creates a room with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::InvalidRoomLayout`] if either dimension is zero.
    pub fn new(number: u32, rows: u32, seats_per_row: u32) -> Result<Self> {
        Ok(Self {
            id: RoomId::new(),
            number,
            layout: RoomLayout::new(rows, seats_per_row)?,
        })
    }

    /// Room identifier
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Room number, unique across the cinema
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Seat grid of the room
    #[must_use]
    pub const fn layout(&self) -> RoomLayout {
        self.layout
    }

    /// Total seats in the room
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// Generates the free seat grid for a new screening in this room.
    #[must_use]
    pub fn create_seats(&self) -> Vec<Seat> {
        self.layout.create_seats()
    }
}
