//! CBOM (Customer Bill of Materials) matrix extraction
//!
//! A CBOM sheet carries a room × 12NC quantity matrix: room identifiers run
//! along a header row, 12NCs down a column, and each cell holds how many of
//! a 12NC are installed in a room. This module turns such a sheet into
//! [`RoomPartMap`](matchwise_models::RoomPartMap) and
//! [`PartRoomMap`](matchwise_models::PartRoomMap) views of the same matrix.
//!
//! ## Flow
//!
//! 1. [`GridLoader`] reads a CSV or Excel file into a [`Grid`]
//! 2. [`Coordinates`] resolves the configured column letters and row numbers
//! 3. [`MatrixExtractor`] slices the bands and inverts the matrix both ways
//! 4. [`MappingTransformer`] validates identifiers and coerces quantities
//!
//! [`CbomPipeline`] runs steps 2–4 for an already loaded grid.
//! [`DictionaryLoader`] reads the companion 12NC → item code dictionary.

pub mod coordinates;
pub mod dictionary;
pub mod extractor;
pub mod grid;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod transformer;

pub use coordinates::{column_index, column_name, Coordinates};
pub use dictionary::{DictionaryLoader, PartDictionary};
pub use extractor::{CbomTables, MatrixExtractor, MatrixSlices, PartRoomEntry, RoomPartEntry};
pub use grid::{CellGrid, CellValue, Grid};
pub use loader::{GridLoader, LoadedGrid, SourceFormat, CSV_SHEET};
pub use normalize::{normalize, normalize_str};
pub use pipeline::{CbomExtraction, CbomPipeline, ExtractionSummary};
pub use transformer::{coerce_quantity, MappingTransformer};
