//! 12NC Dictionary Loader
//!
//! A dictionary workbook maps each 12NC, written `1234 567 89012`, to the
//! comma-separated item codes it stands for. The sheet carries a header
//! row naming a `12NC` column and a `Mapped Items` column; every row below
//! it is one entry.
//!
//! Loading is all or nothing: one malformed key or item code rejects the
//! whole dictionary with a [`MatchwiseError::Validation`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::grid::{CellGrid, CellValue};
use super::loader::{GridLoader, SourceFormat};
use crate::config::DictionaryConfig;
use crate::error::{MatchwiseError, MatchwiseResult};
use crate::validation::Grammar;

pub const KEY_COLUMN: &str = "12NC";
pub const ITEMS_COLUMN: &str = "Mapped Items";

/// Offending values quoted per error message
const MAX_REPORTED: usize = 10;

/// 12NC → mapped item codes, ordered by 12NC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PartDictionary {
    entries: BTreeMap<String, Vec<String>>,
}

impl PartDictionary {
    pub fn items(&self, part: &str) -> Option<&[String]> {
        self.entries.get(part).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of item codes across all keys
    pub fn total_items(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.entries
    }
}

pub struct DictionaryLoader {
    sheet: String,
    grid_loader: GridLoader,
    key: Grammar,
    item: Grammar,
}

impl DictionaryLoader {
    /// Fails with `Configuration` when either pattern does not compile.
    pub fn new(config: &DictionaryConfig) -> MatchwiseResult<Self> {
        Ok(Self {
            sheet: config.sheet.clone(),
            grid_loader: GridLoader::for_sheet(config.sheet.clone()),
            key: Grammar::new(&config.key_pattern)?,
            item: Grammar::new(&config.item_pattern)?,
        })
    }

    pub fn load_path(&self, path: &Path) -> MatchwiseResult<PartDictionary> {
        let loaded = self.grid_loader.load_path(path)?;
        self.parse(&loaded.grid)
    }

    pub fn load_bytes(
        &self,
        filename: &str,
        data: &[u8],
        format: Option<SourceFormat>,
    ) -> MatchwiseResult<PartDictionary> {
        let loaded = self.grid_loader.load_bytes(filename, data, format)?;
        self.parse(&loaded.grid)
    }

    /// Read the dictionary out of an already loaded sheet.
    ///
    /// The first non-empty row is the header row. Rows with neither a key
    /// nor items are skipped; a repeated key keeps its last row.
    pub fn parse<G>(&self, grid: &G) -> MatchwiseResult<PartDictionary>
    where
        G: CellGrid + ?Sized,
    {
        let header = (0..grid.height())
            .find(|&row| (0..grid.width()).any(|col| !grid.cell(row, col).is_missing()));
        let columns = header.and_then(|row| {
            let find = |name: &str| (0..grid.width()).find(|&col| grid.cell(row, col).trimmed_text() == name);
            Some((row, find(KEY_COLUMN)?, find(ITEMS_COLUMN)?))
        });
        let Some((header_row, key_col, items_col)) = columns else {
            return Err(MatchwiseError::validation(
                &self.sheet,
                format!("sheet must contain columns: {}, {}", KEY_COLUMN, ITEMS_COLUMN),
            ));
        };

        let mut entries = BTreeMap::new();
        let mut invalid_keys = Vec::new();
        let mut invalid_items = Vec::new();

        for row in header_row + 1..grid.height() {
            let key_cell = grid.cell(row, key_col);
            let items_cell = grid.cell(row, items_col);
            if key_cell.is_missing() && items_cell.is_missing() {
                continue;
            }

            let key = key_cell.trimmed_text();
            if !self.key.is_match(&key) {
                invalid_keys.push(key.clone());
            }

            let items = split_items(items_cell);
            invalid_items.extend(items.iter().filter(|item| !self.item.is_match(item)).cloned());

            if entries.insert(key, items).is_some() {
                tracing::debug!(row = row + 1, "Repeated dictionary key; later row wins");
            }
        }

        let mut problems = Vec::new();
        if !invalid_keys.is_empty() {
            problems.push(format!("invalid keys: {}", quote_some(&invalid_keys)));
        }
        if !invalid_items.is_empty() {
            problems.push(format!("invalid values: {}", quote_some(&invalid_items)));
        }
        if !problems.is_empty() {
            tracing::warn!(
                sheet = %self.sheet,
                invalid_keys = invalid_keys.len(),
                invalid_items = invalid_items.len(),
                "Rejected 12NC dictionary"
            );
            return Err(MatchwiseError::validation(&self.sheet, problems.join("; ")));
        }

        let dictionary = PartDictionary { entries };
        tracing::info!(
            sheet = %self.sheet,
            keys = dictionary.len(),
            items = dictionary.total_items(),
            "Loaded 12NC dictionary"
        );
        Ok(dictionary)
    }
}

fn split_items(cell: &CellValue) -> Vec<String> {
    let text = cell.trimmed_text();
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(|item| item.trim().to_string()).collect()
}

fn quote_some(values: &[String]) -> String {
    let mut quoted: Vec<String> = values
        .iter()
        .take(MAX_REPORTED)
        .map(|v| format!("{:?}", v))
        .collect();
    if values.len() > MAX_REPORTED {
        quoted.push(format!("and {} more", values.len() - MAX_REPORTED));
    }
    quoted.join(", ")
}
