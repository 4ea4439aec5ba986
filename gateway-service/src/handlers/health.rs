use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Liveness payload; touches no backing store
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "gateway-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
