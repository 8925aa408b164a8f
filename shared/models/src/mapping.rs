//! Room ↔ 12NC relationship models for the Matchwise system.
//!
//! These are the strictly-typed entities produced from a CBOM quantity
//! matrix. Both directions are built from the same matrix cells, so for any
//! room `r` and 12NC `p` present in both collections the quantities agree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// All 12NCs installed in a single room, keyed by normalized 12NC.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct RoomPartMap {
    #[validate(length(min = 1, message = "Room identifier cannot be empty"))]
    pub room: String,
    #[validate(length(min = 1, message = "Room must reference at least one 12NC"))]
    pub parts: BTreeMap<String, i64>,
}

/// All rooms a single 12NC is installed in, keyed by normalized room.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct PartRoomMap {
    #[validate(length(min = 1, message = "12NC cannot be empty"))]
    pub part: String,
    #[validate(length(min = 1, message = "12NC must reference at least one room"))]
    pub rooms: BTreeMap<String, i64>,
}

impl RoomPartMap {
    pub fn new(room: impl Into<String>, parts: BTreeMap<String, i64>) -> Self {
        Self {
            room: room.into(),
            parts,
        }
    }

    /// Total number of items installed in the room, saturating at the
    /// `i64` bounds
    pub fn total_quantity(&self) -> i64 {
        saturating_total(self.parts.values())
    }

    pub fn has_part(&self, part: &str) -> bool {
        self.parts.contains_key(part)
    }

    pub fn quantity_of(&self, part: &str) -> Option<i64> {
        self.parts.get(part).copied()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

impl PartRoomMap {
    pub fn new(part: impl Into<String>, rooms: BTreeMap<String, i64>) -> Self {
        Self {
            part: part.into(),
            rooms,
        }
    }

    /// Total number of items of this 12NC across all rooms, saturating at
    /// the `i64` bounds
    pub fn total_quantity(&self) -> i64 {
        saturating_total(self.rooms.values())
    }

    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn quantity_in(&self, room: &str) -> Option<i64> {
        self.rooms.get(room).copied()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

fn saturating_total<'a>(quantities: impl Iterator<Item = &'a i64>) -> i64 {
    let wide: i128 = quantities.map(|q| i128::from(*q)).sum();
    wide.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
