use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use fragmenta_core::resolve_owner;

use crate::api::AppState;
use crate::error::ServerError;

/// Authenticate the request and resolve the owner key.
///
/// On success the derived [`fragmenta_core::OwnerId`] is inserted as a
/// request extension for the handlers; failures short-circuit with a
/// 401 envelope.
pub async fn require_owner(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let principal = state.auth.authenticate(authorization)?;
    let owner = resolve_owner(&principal)?;

    request.extensions_mut().insert(owner);
    Ok(next.run(request).await)
}
