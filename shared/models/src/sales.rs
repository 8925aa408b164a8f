//! Sales history models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single sales transaction of a 12NC delivered to a room.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct SalesRecord {
    #[validate(length(min = 1, message = "12NC cannot be empty"))]
    pub part: String,
    #[validate(length(min = 1, message = "Room cannot be empty"))]
    pub room: String,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i64,
    pub date: NaiveDate,
}

impl SalesRecord {
    pub fn new(part: impl Into<String>, room: impl Into<String>, quantity: i64, date: NaiveDate) -> Self {
        Self {
            part: part.into(),
            room: room.into(),
            quantity,
            date,
        }
    }
}

/// Which side of the room/12NC relationship an identifier refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    #[serde(alias = "12nc")]
    Part,
    Room,
}

impl IdentifierKind {
    /// Pick the identifier of this kind from a sales record
    pub fn select<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            Self::Part => &record.part,
            Self::Room => &record.room,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Part => "12NC",
            Self::Room => "ROOM",
        }
    }
}
