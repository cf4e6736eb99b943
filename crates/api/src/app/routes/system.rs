use axum::Json;

use crate::app::dto::HealthResponse;

/// Liveness only; does not touch storage.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}
