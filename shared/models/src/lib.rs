//! # Matchwise Core Domain Models
//!
//! This module contains the core domain models for the Room-12NC performance
//! center. All models implement serialization/deserialization with serde and
//! validation with the validator crate.
//!
//! ## Key Models
//!
//! - **RoomPartMap**: the 12NCs (with quantities) installed in a room
//! - **PartRoomMap**: the rooms (with quantities) a 12NC is installed in
//! - **SalesRecord**: a single historical sales transaction
//! - **PerformanceData**: sales of one identifier bucketed by calendar period
//! - **Prediction**: a buffered forecast for the next period

pub mod mapping;
pub mod sales;
pub mod performance;
pub mod prediction;

#[cfg(test)]
pub mod property_tests;

pub use mapping::*;
pub use sales::*;
pub use performance::*;
pub use prediction::*;
