//! End-to-end CBOM extraction: coordinates → matrix → mappings.

use matchwise_models::{PartRoomMap, RoomPartMap};
use serde::Serialize;

use super::coordinates::Coordinates;
use super::extractor::MatrixExtractor;
use super::grid::CellGrid;
use super::transformer::MappingTransformer;
use crate::config::AppConfig;
use crate::error::MatchwiseResult;
use crate::validation::IdentifierGrammars;

/// Header counts against mapped entity counts, for callers that want to
/// report how much of a sheet was dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub room_headers: usize,
    pub part_rows: usize,
    pub rooms_mapped: usize,
    pub parts_mapped: usize,
}

impl ExtractionSummary {
    pub fn rooms_dropped(&self) -> usize {
        self.room_headers.saturating_sub(self.rooms_mapped)
    }

    pub fn parts_dropped(&self) -> usize {
        self.part_rows.saturating_sub(self.parts_mapped)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CbomExtraction {
    pub room_maps: Vec<RoomPartMap>,
    pub part_maps: Vec<PartRoomMap>,
    pub summary: ExtractionSummary,
}

/// Resolved layout and grammars, reusable across grids.
#[derive(Debug, Clone)]
pub struct CbomPipeline {
    coordinates: Coordinates,
    grammars: IdentifierGrammars,
}

impl CbomPipeline {
    /// Fails with a configuration error before any grid is touched.
    pub fn new(config: &AppConfig) -> MatchwiseResult<Self> {
        Ok(Self {
            coordinates: Coordinates::resolve(&config.cbom)?,
            grammars: IdentifierGrammars::from_config(&config.validation)?,
        })
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn grammars(&self) -> &IdentifierGrammars {
        &self.grammars
    }

    pub fn run<G>(&self, grid: &G) -> MatchwiseResult<CbomExtraction>
    where
        G: CellGrid + ?Sized,
    {
        let extractor = MatrixExtractor::new(&self.grammars);
        let slices = extractor.extract(grid, &self.coordinates);
        let tables = extractor.invert(&slices);

        let mut summary = ExtractionSummary {
            room_headers: slices.room_headers.iter().filter(|c| !c.is_missing()).count(),
            part_rows: slices.part_ids.iter().filter(|c| !c.is_missing()).count(),
            ..Default::default()
        };

        // Nothing to map is a legitimate result for a sparse sheet
        if tables.rooms.is_empty() || tables.parts.is_empty() {
            tracing::info!(
                room_headers = summary.room_headers,
                part_rows = summary.part_rows,
                "CBOM matrix contains no quantities"
            );
            return Ok(CbomExtraction {
                summary,
                ..Default::default()
            });
        }

        let (room_maps, part_maps) = MappingTransformer::new(&self.grammars).transform(&tables)?;
        summary.rooms_mapped = room_maps.len();
        summary.parts_mapped = part_maps.len();

        tracing::info!(
            rooms = summary.rooms_mapped,
            parts = summary.parts_mapped,
            rooms_dropped = summary.rooms_dropped(),
            parts_dropped = summary.parts_dropped(),
            "CBOM extraction complete"
        );

        Ok(CbomExtraction {
            room_maps,
            part_maps,
            summary,
        })
    }
}
