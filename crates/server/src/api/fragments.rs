use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use fragmenta_core::{ContentType, FragmentId, OwnerId, is_supported_type};

use crate::error::ServerError;

use super::AppState;

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    /// `expand=1` materializes full records instead of bare ids.
    #[serde(default)]
    pub expand: Option<String>,
}

/// `GET /v1` -- authenticated API root.
pub async fn api_root() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Pull the `Content-Type` header for a body-carrying request.
///
/// Missing headers and form-encoded bodies are both rejected up front:
/// fragments are opaque bytes, never parsed form fields.
fn require_content_type(headers: &HeaderMap) -> Result<&str, ServerError> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.starts_with("application/x-www-form-urlencoded"))
        .ok_or_else(|| ServerError::BadRequest("Content-Type header required".to_owned()))
}

/// `POST /v1/fragments` -- create a fragment from the raw request body.
pub async fn create(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let header_value = require_content_type(&headers)?;

    if !is_supported_type(header_value) {
        return Err(ServerError::UnsupportedMediaType(
            "unsupported Content-Type".to_owned(),
        ));
    }

    if body.is_empty() {
        return Err(ServerError::BadRequest("fragment data required".to_owned()));
    }

    let content_type = ContentType::parse(header_value)?;
    let mut fragment = state.fragments.create(owner, content_type).await?;
    state.fragments.set_data(&mut fragment, body).await?;

    let location = format!("{}/v1/fragments/{}", state.external_url, fragment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "status": "ok", "fragment": fragment })),
    ))
}

/// `GET /v1/fragments` -- list the caller's fragments.
pub async fn list(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let expand = query.expand.as_deref() == Some("1");
    let fragments = state.fragments.by_user(&owner, expand).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "ok", "fragments": fragments })),
    ))
}

/// `GET /v1/fragments/{id}` -- return the raw data payload with the
/// fragment's stored `Content-Type`.
pub async fn get_data(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let fragment = state.fragments.by_id(&owner, &FragmentId::new(id)).await?;
    let data = state.fragments.get_data(&fragment).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, fragment.content_type.to_string())],
        data,
    ))
}

/// `GET /v1/fragments/{id}/info` -- return the metadata record.
pub async fn get_info(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let fragment = state.fragments.by_id(&owner, &FragmentId::new(id)).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "ok", "fragment": fragment })),
    ))
}

/// `PUT /v1/fragments/{id}` -- replace the data payload. The incoming
/// primary mime must match the stored type; a mismatch is rejected
/// before anything is mutated.
pub async fn update(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let header_value = require_content_type(&headers)?;

    let mut fragment = state.fragments.by_id(&owner, &FragmentId::new(id)).await?;

    let incoming = ContentType::parse(header_value)?;
    fragment.ensure_same_mime(&incoming)?;

    if body.is_empty() {
        return Err(ServerError::BadRequest("fragment data required".to_owned()));
    }

    state
        .fragments
        .replace_data(&mut fragment, &incoming, body)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "ok", "fragment": fragment })),
    ))
}

/// `DELETE /v1/fragments/{id}` -- remove the metadata and data pair.
pub async fn delete(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.fragments.delete(&owner, &FragmentId::new(id)).await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}
