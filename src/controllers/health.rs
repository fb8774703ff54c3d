use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::refresh::RefreshService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(refresh_service): State<Arc<RefreshService>>) -> impl IntoResponse {
    let snapshot = refresh_service.snapshot().await;
    let annotation = refresh_service.annotation_service();

    let last_fetch = match (&snapshot.fetched_at, &snapshot.error) {
        (None, _) => "pending",
        (Some(_), None) => "ok",
        (Some(_), Some(_)) => "error",
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "fetching": refresh_service.is_fetching(),
            "last_refresh": refresh_service.last_refresh().await,
            "refresh_interval_secs": refresh_service.interval().as_secs(),
            "last_fetch": last_fetch,
            "sentiment_model": annotation.scorer_name(),
            "second_model": annotation.classifier_name().unwrap_or("disabled"),
        })),
    )
}
