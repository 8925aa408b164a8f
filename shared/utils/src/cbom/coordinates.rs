//! Grid coordinate resolution for the CBOM layout.

use serde::Serialize;

use crate::config::CbomConfig;
use crate::error::{MatchwiseError, MatchwiseResult};

/// Zero-based anchors of the quantity matrix inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coordinates {
    pub room_col_idx: usize,
    pub part_col_idx: usize,
    pub part_desc_col_idx: usize,
    pub room_number_row_idx: usize,
    pub room_desc_row_idx: usize,
    pub part_row_start_idx: usize,
}

impl Coordinates {
    pub fn resolve(config: &CbomConfig) -> MatchwiseResult<Self> {
        Ok(Self {
            room_col_idx: column_index(&config.columns.room_start)
                .map_err(|e| field_error("columns.room_start", e))?,
            part_col_idx: column_index(&config.columns.part)
                .map_err(|e| field_error("columns.part", e))?,
            part_desc_col_idx: column_index(&config.columns.part_description)
                .map_err(|e| field_error("columns.part_description", e))?,
            room_number_row_idx: row_index(config.rows.room_numbers)
                .map_err(|e| field_error("rows.room_numbers", e))?,
            room_desc_row_idx: row_index(config.rows.room_descriptions)
                .map_err(|e| field_error("rows.room_descriptions", e))?,
            part_row_start_idx: row_index(config.rows.part_start)
                .map_err(|e| field_error("rows.part_start", e))?,
        })
    }
}

/// Spreadsheet column letters to a zero-based index (`A` → 0, `AA` → 26).
pub fn column_index(letters: &str) -> MatchwiseResult<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(MatchwiseError::configuration("column letter is empty"));
    }

    let mut col: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(MatchwiseError::configuration(format!(
                "column '{}' contains non-letter characters",
                letters
            )));
        }
        let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(digit))
            .ok_or_else(|| {
                MatchwiseError::configuration(format!("column '{}' is out of range", letters))
            })?;
    }
    Ok(col - 1)
}

/// Zero-based index back to spreadsheet column letters.
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn row_index(row: i64) -> MatchwiseResult<usize> {
    if row < 1 {
        return Err(MatchwiseError::configuration(format!(
            "row number must be at least 1, got {}",
            row
        )));
    }
    usize::try_from(row - 1)
        .map_err(|_| MatchwiseError::configuration(format!("row number {} is out of range", row)))
}

fn field_error(field: &str, error: MatchwiseError) -> MatchwiseError {
    match error {
        MatchwiseError::Configuration { message } => {
            MatchwiseError::configuration(format!("cbom.{}: {}", field, message))
        }
        other => other,
    }
}
