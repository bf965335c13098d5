use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use super::{ApiError, AppState};
use crate::errors::AppError;
use crate::models::{RemoveOutcome, RemoveResponse, VehicleLookup, VehicleRecord, VinRequest};

pub async fn lookup(
    State(state): State<AppState>,
    Json(payload): Json<VinRequest>,
) -> Result<Json<VehicleLookup>, ApiError> {
    let result = state.lookup_service.lookup(&payload.vin).await?;
    Ok(Json(result))
}

pub async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<VinRequest>,
) -> Response {
    match state.lookup_service.remove(&payload.vin).await {
        Ok(RemoveOutcome::Removed) => Json(RemoveResponse::removed(payload.vin)).into_response(),
        Ok(RemoveOutcome::NotFound) => Json(RemoveResponse::not_found(payload.vin)).into_response(),
        Err(e) if e.is_client_error() => ApiError(e).into_response(),
        Err(e) => {
            error!("Failed to remove VIN {}: {}", payload.vin, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RemoveResponse::failed(payload.vin, e.detail())),
            )
                .into_response()
        }
    }
}

pub async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.lookup_service.export().await?;

    let contents = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::internal(format!("failed to read {}: {}", path.display(), e)))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.storage.export_file_name
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(contents))
        .map_err(|e| AppError::internal(e.to_string()).into())
}

pub async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleRecord>>, ApiError> {
    Ok(Json(state.lookup_service.list().await?))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.database.ping().await {
        error!("Health check failed: {}", e);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "timestamp": chrono::Utc::now(),
                "error": e.to_string(),
            })),
        );
    }

    match state.lookup_service.count().await {
        Ok(cached_vehicles) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now(),
                "version": env!("CARGO_PKG_VERSION"),
                "cached_vehicles": cached_vehicles,
            })),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": chrono::Utc::now(),
                    "error": e.to_string(),
                })),
            )
        }
    }
}
