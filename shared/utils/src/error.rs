use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MatchwiseError {
    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Analysis error: {message}")]
    Analysis { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MatchwiseError {
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Analysis { .. } => "ANALYSIS_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::SourceUnavailable { .. } => 422,
            Self::Configuration { .. } => 500,
            Self::InvalidInput { .. } => 400,
            Self::Validation { .. } => 400,
            Self::Analysis { .. } => 422,
            Self::Internal { .. } => 500,
        }
    }
}

pub type MatchwiseResult<T> = Result<T, MatchwiseError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<MatchwiseError> for ErrorResponse {
    fn from(error: MatchwiseError) -> Self {
        let details = match &error {
            MatchwiseError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            _ => None,
        };

        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for MatchwiseError {
    fn from(error: std::io::Error) -> Self {
        Self::source_unavailable(error.to_string())
    }
}

impl From<csv::Error> for MatchwiseError {
    fn from(error: csv::Error) -> Self {
        Self::source_unavailable(format!("CSV: {}", error))
    }
}

impl From<regex::Error> for MatchwiseError {
    fn from(error: regex::Error) -> Self {
        Self::configuration(format!("invalid validation pattern: {}", error))
    }
}

impl From<config::ConfigError> for MatchwiseError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<calamine::Error> for MatchwiseError {
    fn from(error: calamine::Error) -> Self {
        Self::source_unavailable(format!("Excel: {}", error))
    }
}

impl From<calamine::XlsxError> for MatchwiseError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::source_unavailable(format!("XLSX: {}", error))
    }
}

impl From<calamine::XlsError> for MatchwiseError {
    fn from(error: calamine::XlsError) -> Self {
        Self::source_unavailable(format!("XLS: {}", error))
    }
}

impl From<serde_json::Error> for MatchwiseError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON: {}", error))
    }
}
