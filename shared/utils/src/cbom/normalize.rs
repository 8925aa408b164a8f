//! Identifier normalization for room numbers and 12NCs.

use super::grid::CellValue;

const SEPARATORS: [char; 3] = [' ', '-', '_'];

/// Canonical comparison key for a cell: separators removed, whitespace
/// trimmed. Missing cells normalize to an empty string.
///
/// No shape validation happens here; callers check the result against an
/// [`IdentifierGrammars`](crate::validation::IdentifierGrammars).
pub fn normalize(value: &CellValue) -> String {
    value
        .as_text()
        .map(|text| normalize_str(&text))
        .unwrap_or_default()
}

pub fn normalize_str(value: &str) -> String {
    value
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
