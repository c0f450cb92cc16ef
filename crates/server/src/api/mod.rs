pub mod fragments;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fragmenta_store::FragmentStore;

use crate::auth::AuthProvider;
use crate::auth::middleware::require_owner;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The fragment store facade.
    pub fragments: FragmentStore,
    /// The authentication provider.
    pub auth: Arc<AuthProvider>,
    /// Base URL used to build `Location` headers.
    pub external_url: String,
    /// Request body ceiling for fragment payloads, in bytes.
    pub max_fragment_bytes: usize,
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    // Health check stays public; everything under /v1 requires an owner.
    let public = Router::new().route("/", get(health::health));

    let protected = Router::new()
        .route("/v1", get(fragments::api_root))
        .route(
            "/v1/fragments",
            post(fragments::create).get(fragments::list),
        )
        .route(
            "/v1/fragments/{id}",
            get(fragments::get_data)
                .put(fragments::update)
                .delete(fragments::delete),
        )
        .route("/v1/fragments/{id}/info", get(fragments::get_info))
        .layer(middleware::from_fn_with_state(state.clone(), require_owner))
        .layer(DefaultBodyLimit::max(state.max_fragment_bytes));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Envelope 404 for unknown routes.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({
            "status": "error",
            "error": { "code": 404, "message": "not found" }
        })),
    )
}
