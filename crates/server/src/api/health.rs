use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;

/// `GET /` -- public health check.
pub async fn health() -> impl IntoResponse {
    let body = Json(serde_json::json!({
        "status": "ok",
        "description": "fragmenta service running normally",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }));

    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-cache")],
        body,
    )
}
