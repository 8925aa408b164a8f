//! Relationship Mapping Transformer
//!
//! Converts the loosely-typed extraction tables into validated
//! [`RoomPartMap`] / [`PartRoomMap`] entities.

use matchwise_models::{PartRoomMap, RoomPartMap};
use std::collections::BTreeMap;

use super::extractor::CbomTables;
use super::grid::CellValue;
use crate::error::{MatchwiseError, MatchwiseResult};
use crate::validation::IdentifierGrammars;

pub struct MappingTransformer<'a> {
    grammars: &'a IdentifierGrammars,
}

impl<'a> MappingTransformer<'a> {
    pub fn new(grammars: &'a IdentifierGrammars) -> Self {
        Self { grammars }
    }

    /// Validate both tables and build the typed mappings.
    ///
    /// Rooms are checked against the room grammar here for the first time;
    /// 12NCs are checked again even though the extractor already did.
    /// Empty input tables are a caller error.
    pub fn transform(&self, tables: &CbomTables) -> MatchwiseResult<(Vec<RoomPartMap>, Vec<PartRoomMap>)> {
        if tables.rooms.is_empty() || tables.parts.is_empty() {
            return Err(MatchwiseError::invalid_input("CBOM tables cannot be empty"));
        }

        let mut room_maps = Vec::with_capacity(tables.rooms.len());
        for (room, entries) in &tables.rooms {
            if !self.grammars.is_valid_room(room) {
                tracing::warn!(room = %room, "Room does not match expected format, skipping");
                continue;
            }

            let parts = collect_valid(
                entries
                    .iter()
                    .map(|e| (e.part_id_normalized.as_str(), &e.quantity)),
                |part| self.grammars.is_valid_part(part),
            );

            if parts.is_empty() {
                tracing::warn!(room = %room, "No valid 12NCs found for room, skipping");
                continue;
            }
            room_maps.push(RoomPartMap::new(room.clone(), parts));
        }

        let mut part_maps = Vec::with_capacity(tables.parts.len());
        for (part, entries) in &tables.parts {
            if !self.grammars.is_valid_part(part) {
                tracing::warn!(part = %part, "12NC does not match expected format, skipping");
                continue;
            }

            let rooms = collect_valid(
                entries
                    .iter()
                    .map(|e| (e.room_id_normalized.as_str(), &e.quantity)),
                |room| self.grammars.is_valid_room(room),
            );

            if rooms.is_empty() {
                tracing::warn!(part = %part, "No valid rooms found for 12NC, skipping");
                continue;
            }
            part_maps.push(PartRoomMap::new(part.clone(), rooms));
        }

        tracing::debug!(
            rooms = room_maps.len(),
            parts = part_maps.len(),
            "Transformed CBOM tables into mappings"
        );

        Ok((room_maps, part_maps))
    }
}

/// Later entries override earlier ones with the same key.
fn collect_valid<'e>(
    entries: impl Iterator<Item = (&'e str, &'e CellValue)>,
    is_valid: impl Fn(&str) -> bool,
) -> BTreeMap<String, i64> {
    entries
        .filter(|(key, _)| is_valid(*key))
        .map(|(key, quantity)| (key.to_string(), coerce_quantity(quantity)))
        .collect()
}

/// Integer quantity of a matrix cell.
///
/// Numbers truncate toward zero; text counts only when it is made of ASCII
/// digits; everything else is 0.
pub fn coerce_quantity(value: &CellValue) -> i64 {
    match value {
        CellValue::Missing => 0,
        CellValue::Number(n) if n.is_nan() => 0,
        // `as` saturates at the i64 bounds
        CellValue::Number(n) => n.trunc() as i64,
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                trimmed.parse().unwrap_or(0)
            } else {
                0
            }
        }
    }
}
