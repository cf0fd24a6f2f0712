use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use super::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Request contains no documents")]
    NoDocuments,

    #[error("Request contains {count} documents, at most {max} are accepted")]
    TooManyDocuments { count: usize, max: usize },

    #[error("Document key cannot be empty")]
    EmptyKey,

    #[error("Document key is too long")]
    KeyTooLong,

    #[error("Document {key} sets both boxes and ocr_text")]
    AmbiguousInput { key: String },

    #[error("Document {key} sets neither boxes nor ocr_text")]
    MissingInput { key: String },

    #[error("OCR text of document {key} is too large")]
    OcrTextTooLarge { key: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::Validation { source } => (
                StatusCode::BAD_REQUEST,
                "Bad Request".to_string(),
                Some(source.to_string()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
                Some(msg),
            ),
        };

        let mut error_response = ErrorResponse::new(error_message);
        if let Some(details) = details {
            error_response = error_response.with_details(details);
        }

        (status, Json(error_response)).into_response()
    }
}
