use axum::{body::Bytes, extract::Multipart, http::StatusCode, response::Json};
use matchwise_utils::{ErrorResponse, MatchwiseError, SourceFormat};

pub mod cbom;
pub mod dictionary;
pub mod health;
pub mod performance;

pub use cbom::*;
pub use dictionary::*;
pub use health::*;
pub use performance::*;

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn api_error(error: MatchwiseError) -> ApiError {
    let status =
        StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(code = error.error_code(), "{}", error);
    } else {
        tracing::warn!(code = error.error_code(), "{}", error);
    }
    (status, Json(ErrorResponse::from(error)))
}

/// A spreadsheet file taken from a multipart form
pub struct Upload {
    pub filename: String,
    pub format: Option<SourceFormat>,
    pub data: Bytes,
}

/// First form field that carries a file name
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        api_error(MatchwiseError::invalid_input(format!("Failed to read upload: {}", e)))
    })? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let format = field.content_type().and_then(SourceFormat::from_content_type);
        let data = field.bytes().await.map_err(|e| {
            api_error(MatchwiseError::invalid_input(format!("Failed to read file data: {}", e)))
        })?;
        return Ok(Upload { filename, format, data });
    }
    Err(api_error(MatchwiseError::invalid_input("No file provided")))
}
