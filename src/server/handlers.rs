//! Request handlers
//!
//! The engine is synchronous; each call runs on the blocking pool.

use super::error::ApiError;
use super::AppState;
use crate::domain::{
    BulkDeidentifyPayload, BulkDeidentifyResponse, DeidentifyPayload, DeidentifyResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Response body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
}

/// `POST /deidentify`
pub async fn deidentify(
    State(state): State<AppState>,
    payload: Result<Json<DeidentifyPayload>, JsonRejection>,
) -> Result<Json<DeidentifyResponse>, ApiError> {
    let Json(payload) = payload?;
    let deidentifier = state.deidentifier.clone();

    let response = tokio::task::spawn_blocking(move || deidentifier.deidentify_payload(&payload))
        .await
        .map_err(|e| ApiError::Internal(format!("De-identification task failed: {e}")))??;

    Ok(Json(response))
}

/// `POST /deidentify_bulk`
pub async fn deidentify_bulk(
    State(state): State<AppState>,
    payload: Result<Json<BulkDeidentifyPayload>, JsonRejection>,
) -> Result<Json<BulkDeidentifyResponse>, ApiError> {
    let Json(payload) = payload?;

    if payload.texts.len() > state.max_bulk_texts {
        return Err(ApiError::PayloadTooLarge(format!(
            "Bulk request holds {} texts, limit is {}",
            payload.texts.len(),
            state.max_bulk_texts
        )));
    }

    tracing::debug!(texts = payload.texts.len(), "Processing bulk request");

    let deidentifier = state.deidentifier.clone();
    let response = tokio::task::spawn_blocking(move || deidentifier.deidentify_bulk(payload))
        .await
        .map_err(|e| ApiError::Internal(format!("De-identification task failed: {e}")))??;

    Ok(Json(response))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: state.deidentifier.engine_name(),
    })
}
