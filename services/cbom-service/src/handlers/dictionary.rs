//! 12NC Dictionary Upload Handler

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use matchwise_utils::{MatchwiseError, PartDictionary};
use serde::Serialize;

use super::{api_error, read_upload, ApiResult, Upload};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DictionaryResponse {
    pub filename: String,
    pub keys: usize,
    pub items: usize,
    pub entries: PartDictionary,
}

/// Validate and return an uploaded 12NC dictionary
///
/// POST /api/v1/dictionary/load
pub async fn load_dictionary(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<DictionaryResponse> {
    let Upload { filename, format, data } = read_upload(&mut multipart).await?;

    let loader = state.dictionary.clone();
    let name = filename.clone();
    let outcome = tokio::task::spawn_blocking(move || loader.load_bytes(&name, &data, format))
        .await
        .map_err(|e| api_error(MatchwiseError::internal(format!("Dictionary task failed: {}", e))))?;

    let outcome_label = if outcome.is_ok() { "ok" } else { "rejected" };
    state
        .metrics
        .dictionary_loads
        .with_label_values(&[outcome_label])
        .inc();

    let entries = outcome.map_err(api_error)?;
    Ok(Json(DictionaryResponse {
        filename,
        keys: entries.len(),
        items: entries.total_items(),
        entries,
    }))
}
