//! API route configuration.

use crate::api::handlers::{
    create_link_handler, get_link_handler, latest_links_handler, popular_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /links`          - Create a short link
/// - `GET  /links/latest`   - Most recently created links
/// - `GET  /links/popular`  - Most visited links
/// - `GET  /links/{alias}`  - A single link, without counting a visit
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/latest", get(latest_links_handler))
        .route("/links/popular", get(popular_links_handler))
        .route("/links/{alias}", get(get_link_handler))
}
