//! Handlers for the link endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse, ListQuery};
use crate::domain::entities::LinkRecord;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::resolve_base_url;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/docs", "alias": "docs" }
/// ```
///
/// `alias` is optional; a random one is generated when it is absent or empty.
///
/// # Response Codes
///
/// - **201 Created**: The link was stored
/// - **400 Bad Request**: Invalid url and/or alias (`details.url`, `details.alias`)
/// - **409 Conflict**: The alias is already taken
/// - **500 Internal Server Error**: No free alias could be generated
/// - **503 Service Unavailable**: Storage failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let record = state
        .link_service
        .create_link(&payload.url, payload.requested_alias())
        .await?;

    let base_url = resolve_base_url(&headers, state.public_base_url.as_deref());

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_record(record, &base_url)),
    ))
}

/// Lists the most recently created links, newest first.
///
/// # Endpoint
///
/// `GET /api/links/latest?limit=10`
pub async fn latest_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    query.validate()?;

    let records = state
        .link_service
        .list_latest(query.limit_or(state.listing_size))
        .await?;

    Ok(Json(to_responses(&state, &headers, records)))
}

/// Lists the most visited links, highest count first.
///
/// # Endpoint
///
/// `GET /api/links/popular?limit=10`
pub async fn popular_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    query.validate()?;

    let records = state
        .link_service
        .list_most_visited(query.limit_or(state.listing_size))
        .await?;

    Ok(Json(to_responses(&state, &headers, records)))
}

/// Returns a single link without counting a visit.
///
/// # Endpoint
///
/// `GET /api/links/{alias}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alias): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let record = state.link_service.get_link(&alias).await?;
    let base_url = resolve_base_url(&headers, state.public_base_url.as_deref());

    Ok(Json(LinkResponse::from_record(record, &base_url)))
}

fn to_responses(
    state: &AppState,
    headers: &HeaderMap,
    records: Vec<LinkRecord>,
) -> Vec<LinkResponse> {
    let base_url = resolve_base_url(headers, state.public_base_url.as_deref());
    records
        .into_iter()
        .map(|record| LinkResponse::from_record(record, &base_url))
        .collect()
}
