//! CBOM Upload Handler
//!
//! Accepts a CBOM spreadsheet as multipart upload and returns both
//! relationship views of its quantity matrix.

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use matchwise_models::{PartRoomMap, RoomPartMap};
use matchwise_utils::{CbomConfig, Coordinates, ExtractionSummary, GridLoader, MatchwiseError};
use serde::Serialize;

use super::{api_error, read_upload, ApiResult, Upload};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CbomExtractResponse {
    pub filename: String,
    pub format: String,
    pub sheet: String,
    pub summary: ExtractionSummary,
    pub rooms: Vec<RoomPartMap>,
    pub parts: Vec<PartRoomMap>,
}

/// Extract room/12NC mappings from an uploaded CBOM
///
/// POST /api/v1/cbom/extract
pub async fn extract_cbom(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<CbomExtractResponse> {
    let Upload { filename, format, data } = read_upload(&mut multipart).await?;

    let loader = GridLoader::new(&state.config.cbom);
    let pipeline = state.pipeline.clone();
    let name = filename.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let loaded = loader.load_bytes(&name, &data, format)?;
        let extraction = pipeline.run(&loaded.grid)?;
        Ok::<_, MatchwiseError>((loaded, extraction))
    })
    .await
    .map_err(|e| api_error(MatchwiseError::internal(format!("Extraction task failed: {}", e))))?;

    let (loaded, extraction) = match outcome {
        Ok(result) => result,
        Err(e) => {
            state
                .metrics
                .extractions
                .with_label_values(&[format.map(|f| f.name()).unwrap_or("unknown"), "error"])
                .inc();
            return Err(api_error(e));
        }
    };

    state
        .metrics
        .extractions
        .with_label_values(&[loaded.format.name(), "ok"])
        .inc();
    state.metrics.rooms_mapped.inc_by(extraction.room_maps.len() as u64);
    state.metrics.parts_mapped.inc_by(extraction.part_maps.len() as u64);

    Ok(Json(CbomExtractResponse {
        filename,
        format: loaded.format.name().to_string(),
        sheet: loaded.sheet,
        summary: extraction.summary,
        rooms: extraction.room_maps,
        parts: extraction.part_maps,
    }))
}

#[derive(Debug, Serialize)]
pub struct CbomLayoutResponse {
    #[serde(flatten)]
    pub layout: CbomConfig,
    pub coordinates: Coordinates,
}

/// Configured sheet layout and its resolved zero-based coordinates
///
/// GET /api/v1/cbom/layout
pub async fn cbom_layout(State(state): State<AppState>) -> Json<CbomLayoutResponse> {
    Json(CbomLayoutResponse {
        layout: state.config.cbom.clone(),
        coordinates: *state.pipeline.coordinates(),
    })
}
