use axum::Json;
use serde_json::{json, Value};

/// Liveness probe, open to unauthenticated callers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "BizFlow API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
