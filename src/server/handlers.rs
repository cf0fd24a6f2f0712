use axum::extract::State;
use axum::response::Json;

use super::error::AppError;
use super::models::{DocumentResult, ExtractRequest, ExtractResponse, HealthResponse};
use super::AppState;
use crate::pipeline::Extractor;

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.extractor.field_names()))
}

/// Field extraction endpoint
///
/// Each document succeeds or fails on its own; only a malformed request as a
/// whole is rejected.
pub async fn extract_fields(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    request.validate()?;
    tracing::info!(
        "Received extraction request for {} document(s)",
        request.documents.len()
    );

    let extractor = state.extractor.clone();
    let documents = tokio::task::spawn_blocking(move || extract_all(&extractor, request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!("Extraction completed");

    Ok(Json(ExtractResponse::success(documents)))
}

fn extract_all(extractor: &Extractor, request: ExtractRequest) -> Vec<DocumentResult> {
    request
        .documents
        .into_iter()
        .map(|document| {
            let key = document.sanitized_key();
            let outcome = match document.into_boxes() {
                Ok(boxes) => extractor.extract(boxes).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(result) => DocumentResult::success(key, result),
                Err(message) => {
                    tracing::warn!("Document {} failed: {}", key, message);
                    DocumentResult::failure(key, message)
                }
            }
        })
        .collect()
}
