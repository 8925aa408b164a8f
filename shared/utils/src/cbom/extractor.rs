//! CBOM Matrix Extractor
//!
//! Slices the room band, the 12NC band and the quantity submatrix out of a
//! grid, then inverts the matrix both ways: room → 12NCs and 12NC → rooms.
//! Malformed cells are skipped, never reported as errors.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::coordinates::Coordinates;
use super::grid::{CellGrid, CellValue};
use super::normalize::normalize;
use crate::validation::IdentifierGrammars;

/// The four header vectors and the quantity submatrix, borrowed from a grid.
///
/// `quantities[i][j]` is the cell at part row `i`, room column `j`.
#[derive(Debug, Clone)]
pub struct MatrixSlices<'g> {
    pub room_headers: Vec<&'g CellValue>,
    pub room_descriptions: Vec<&'g CellValue>,
    pub part_ids: Vec<&'g CellValue>,
    pub part_descriptions: Vec<&'g CellValue>,
    pub quantities: Vec<Vec<&'g CellValue>>,
}

impl MatrixSlices<'_> {
    pub fn room_count(&self) -> usize {
        self.room_headers.len()
    }

    pub fn part_count(&self) -> usize {
        self.part_ids.len()
    }
}

/// One 12NC found in a room's column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomPartEntry {
    pub part_id_normalized: String,
    pub part_id_original: String,
    pub description: String,
    pub quantity: CellValue,
}

/// One room found in a 12NC's row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartRoomEntry {
    pub room_id_normalized: String,
    pub room_id_original: String,
    pub description: String,
    pub quantity: CellValue,
}

/// Both inversions of the quantity matrix, keyed by normalized identifier.
///
/// Every key maps to a non-empty entry list. Headers that collide after
/// normalization share one key; each (room, 12NC) pair appears at most once
/// in each table, with the same quantity cell on both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CbomTables {
    pub rooms: BTreeMap<String, Vec<RoomPartEntry>>,
    pub parts: BTreeMap<String, Vec<PartRoomEntry>>,
}

impl CbomTables {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.parts.is_empty()
    }
}

pub struct MatrixExtractor<'a> {
    grammars: &'a IdentifierGrammars,
}

impl<'a> MatrixExtractor<'a> {
    pub fn new(grammars: &'a IdentifierGrammars) -> Self {
        Self { grammars }
    }

    /// Slice the configured bands out of the grid.
    ///
    /// The room band runs from the room column to the grid's right edge and
    /// the 12NC band from the first part row to the bottom. A band anchored
    /// past the edge is empty.
    pub fn extract<'g, G>(&self, grid: &'g G, coords: &Coordinates) -> MatrixSlices<'g>
    where
        G: CellGrid + ?Sized,
    {
        let room_cols: Vec<usize> = (coords.room_col_idx..grid.width()).collect();
        let part_rows: Vec<usize> = (coords.part_row_start_idx..grid.height()).collect();

        MatrixSlices {
            room_headers: row_slice(grid, coords.room_number_row_idx, &room_cols),
            room_descriptions: row_slice(grid, coords.room_desc_row_idx, &room_cols),
            part_ids: col_slice(grid, coords.part_col_idx, &part_rows),
            part_descriptions: col_slice(grid, coords.part_desc_col_idx, &part_rows),
            quantities: part_rows
                .iter()
                .map(|&row| row_slice(grid, row, &room_cols))
                .collect(),
        }
    }

    /// Build the room → 12NC and 12NC → room tables.
    ///
    /// When headers collide after normalization, a (room, 12NC) pair can be
    /// backed by several cells. The last non-empty one in row-major order
    /// is the only cell either table keeps for that pair.
    pub fn invert(&self, slices: &MatrixSlices<'_>) -> CbomTables {
        let room_keys: Vec<Option<String>> =
            slices.room_headers.iter().map(|cell| room_key(cell)).collect();
        let part_keys: Vec<Option<String>> = slices
            .part_ids
            .iter()
            .map(|cell| self.part_key(cell))
            .collect();
        let winners = winning_cells(slices, &room_keys, &part_keys);
        let is_winner = |room: &str, part: &str, i: usize, j: usize| {
            winners.get(&(room, part)) == Some(&(i, j))
        };

        let mut tables = CbomTables::default();

        for (j, room) in room_keys.iter().enumerate() {
            let Some(room) = room else { continue };

            let entries: Vec<RoomPartEntry> = part_keys
                .iter()
                .enumerate()
                .filter_map(|(i, part)| {
                    let part = part.as_ref()?;
                    if !is_winner(room.as_str(), part.as_str(), i, j) {
                        return None;
                    }
                    Some(RoomPartEntry {
                        part_id_normalized: part.clone(),
                        part_id_original: slices.part_ids[i].trimmed_text(),
                        description: slices.part_descriptions[i].trimmed_text(),
                        quantity: slices.quantities[i][j].clone(),
                    })
                })
                .collect();

            if !entries.is_empty() {
                tables.rooms.entry(room.clone()).or_default().extend(entries);
            }
        }

        for (i, part) in part_keys.iter().enumerate() {
            let Some(part) = part else { continue };

            let entries: Vec<PartRoomEntry> = room_keys
                .iter()
                .enumerate()
                .filter_map(|(j, room)| {
                    let room = room.as_ref()?;
                    if !is_winner(room.as_str(), part.as_str(), i, j) {
                        return None;
                    }
                    Some(PartRoomEntry {
                        room_id_normalized: room.clone(),
                        room_id_original: slices.room_headers[j].trimmed_text(),
                        description: slices.room_descriptions[j].trimmed_text(),
                        quantity: slices.quantities[i][j].clone(),
                    })
                })
                .collect();

            if !entries.is_empty() {
                tables.parts.entry(part.clone()).or_default().extend(entries);
            }
        }

        tracing::debug!(
            room_headers = slices.room_count(),
            part_rows = slices.part_count(),
            rooms = tables.rooms.len(),
            parts = tables.parts.len(),
            "Inverted CBOM quantity matrix"
        );

        tables
    }

    /// Extract and invert in one step
    pub fn run<G>(&self, grid: &G, coords: &Coordinates) -> CbomTables
    where
        G: CellGrid + ?Sized,
    {
        let slices = self.extract(grid, coords);
        self.invert(&slices)
    }

    /// Normalized 12NC of a part row, or `None` when the row is skipped
    fn part_key(&self, cell: &CellValue) -> Option<String> {
        if cell.is_missing() {
            return None;
        }
        let normalized = normalize(cell);
        self.grammars
            .is_valid_part(&normalized)
            .then_some(normalized)
    }
}

fn row_slice<'g, G: CellGrid + ?Sized>(grid: &'g G, row: usize, cols: &[usize]) -> Vec<&'g CellValue> {
    cols.iter().map(|&col| grid.cell(row, col)).collect()
}

fn col_slice<'g, G: CellGrid + ?Sized>(grid: &'g G, col: usize, rows: &[usize]) -> Vec<&'g CellValue> {
    rows.iter().map(|&row| grid.cell(row, col)).collect()
}

/// Cell `(i, j)` backing each (room, 12NC) pair: the last non-empty one
/// in row-major order.
fn winning_cells<'k>(
    slices: &MatrixSlices<'_>,
    room_keys: &'k [Option<String>],
    part_keys: &'k [Option<String>],
) -> HashMap<(&'k str, &'k str), (usize, usize)> {
    let mut winners = HashMap::new();
    for (i, part) in part_keys.iter().enumerate() {
        let Some(part) = part else { continue };
        for (j, room) in room_keys.iter().enumerate() {
            let Some(room) = room else { continue };
            if slices.quantities[i][j].is_empty_quantity() {
                continue;
            }
            if let Some(previous) = winners.insert((room.as_str(), part.as_str()), (i, j)) {
                tracing::debug!(
                    room = %room,
                    part = %part,
                    replaced = ?previous,
                    cell = ?(i, j),
                    "Colliding headers; later cell wins"
                );
            }
        }
    }
    winners
}

/// Normalized room of a header column. Rooms are only shape-checked later,
/// by the transformer.
fn room_key(cell: &CellValue) -> Option<String> {
    if cell.is_missing() {
        return None;
    }
    let normalized = normalize(cell);
    (!normalized.is_empty()).then_some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbom::grid::Grid;

    fn coords() -> Coordinates {
        Coordinates {
            room_col_idx: 2,
            part_col_idx: 0,
            part_desc_col_idx: 1,
            room_number_row_idx: 1,
            room_desc_row_idx: 0,
            part_row_start_idx: 2,
        }
    }

    fn grid() -> Grid {
        let mut grid = Grid::default();
        grid.set(0, 2, "Kitchen".into());
        grid.set(1, 2, "Room-001".into());
        grid.set(1, 3, "R 2".into());
        grid.set(2, 0, "1234-567-89012".into());
        grid.set(2, 1, " Lamp ".into());
        grid.set(2, 2, 5.0.into());
        grid.set(2, 3, 1.0.into());
        grid.set(3, 0, CellValue::Number(987654321098.0));
        grid.set(3, 3, 2.0.into());
        grid
    }

    #[test]
    fn test_extract_slices_bands() {
        let grammars = IdentifierGrammars::default();
        let grid = grid();
        let slices = MatrixExtractor::new(&grammars).extract(&grid, &coords());

        assert_eq!(slices.room_count(), 2);
        assert_eq!(slices.part_count(), 2);
        assert_eq!(slices.room_headers[0], &CellValue::from("Room-001"));
        assert!(slices.room_descriptions[1].is_missing());
        assert_eq!(slices.quantities[1][1], &CellValue::Number(2.0));
        assert!(slices.quantities[1][0].is_missing());
    }

    #[test]
    fn test_invert_builds_both_tables() {
        let grammars = IdentifierGrammars::default();
        let tables = MatrixExtractor::new(&grammars).run(&grid(), &coords());

        let room = &tables.rooms["Room001"];
        assert_eq!(room.len(), 1);
        assert_eq!(room[0].part_id_normalized, "123456789012");
        assert_eq!(room[0].part_id_original, "1234-567-89012");
        assert_eq!(room[0].description, "Lamp");
        assert_eq!(room[0].quantity, CellValue::Number(5.0));

        let r2 = &tables.rooms["R2"];
        assert_eq!(r2.len(), 2);
        assert_eq!(r2[1].part_id_normalized, "987654321098");
        assert_eq!(r2[1].description, "");

        let part = &tables.parts["123456789012"];
        assert_eq!(part.len(), 2);
        assert_eq!(part[0].room_id_original, "Room-001");
        assert_eq!(part[0].description, "Kitchen");
        assert_eq!(part[1].room_id_normalized, "R2");
        assert_eq!(tables.parts["987654321098"].len(), 1);
    }

    #[test]
    fn test_band_past_grid_edge_is_empty() {
        let grammars = IdentifierGrammars::default();
        let mut far = coords();
        far.room_col_idx = 40;
        let tables = MatrixExtractor::new(&grammars).run(&grid(), &far);
        assert!(tables.is_empty());

        let tables = MatrixExtractor::new(&grammars).run(&Grid::default(), &coords());
        assert!(tables.is_empty());
    }

    #[test]
    fn test_colliding_room_headers_merge_under_one_key() {
        let grammars = IdentifierGrammars::default();
        let mut grid = grid();
        grid.set(1, 4, "Room 001".into());
        grid.set(2, 4, 9.0.into());
        grid.set(3, 4, 4.0.into());

        let tables = MatrixExtractor::new(&grammars).run(&grid, &coords());
        let room = &tables.rooms["Room001"];
        assert_eq!(room.len(), 2);
        assert_eq!(room[0].part_id_normalized, "123456789012");
        assert_eq!(room[0].quantity, CellValue::Number(9.0));
        assert_eq!(room[1].part_id_normalized, "987654321098");
        assert_eq!(room[1].quantity, CellValue::Number(4.0));

        let part = &tables.parts["123456789012"];
        assert_eq!(part.len(), 2);
        assert_eq!(part[0].room_id_normalized, "R2");
        assert_eq!(part[1].room_id_original, "Room 001");
        assert_eq!(part[1].quantity, CellValue::Number(9.0));
    }

    #[test]
    fn test_rooms_and_parts_colliding_together_agree_on_quantity() {
        let grammars = IdentifierGrammars::default();
        let mut grid = Grid::default();
        grid.set(1, 2, "Room-001".into());
        grid.set(1, 3, "Room 001".into());
        grid.set(2, 0, "1234-567-89012".into());
        grid.set(2, 2, 1.0.into());
        grid.set(2, 3, 3.0.into());
        grid.set(3, 0, "123456789012".into());
        grid.set(3, 2, 5.0.into());

        let tables = MatrixExtractor::new(&grammars).run(&grid, &coords());

        let room = &tables.rooms["Room001"];
        assert_eq!(room.len(), 1);
        assert_eq!(room[0].quantity, CellValue::Number(5.0));
        assert_eq!(room[0].part_id_original, "123456789012");

        let part = &tables.parts["123456789012"];
        assert_eq!(part.len(), 1);
        assert_eq!(part[0].quantity, CellValue::Number(5.0));
        assert_eq!(part[0].room_id_original, "Room-001");
    }

    #[test]
    fn test_empty_cell_never_wins_a_collision() {
        let grammars = IdentifierGrammars::default();
        let mut grid = Grid::default();
        grid.set(1, 2, "R1".into());
        grid.set(1, 3, "R-1".into());
        grid.set(2, 0, "123456789012".into());
        grid.set(2, 2, 7.0.into());
        grid.set(2, 3, 0.0.into());

        let tables = MatrixExtractor::new(&grammars).run(&grid, &coords());
        assert_eq!(tables.rooms["R1"][0].quantity, CellValue::Number(7.0));
        assert_eq!(tables.parts["123456789012"].len(), 1);
        assert_eq!(tables.parts["123456789012"][0].room_id_original, "R1");
    }

    #[test]
    fn test_part_rows_failing_grammar_are_skipped() {
        let grammars = IdentifierGrammars::default();
        let mut grid = grid();
        grid.set(4, 0, "12345".into());
        grid.set(4, 2, 3.0.into());
        grid.set(5, 0, "  ".into());
        grid.set(5, 2, 3.0.into());

        let tables = MatrixExtractor::new(&grammars).run(&grid, &coords());
        assert_eq!(tables.parts.len(), 2);
        assert_eq!(tables.rooms["Room001"].len(), 1);
    }
}
