//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{create_handler, home_handler, redirect_handler};
use axum::{Router, routing::get};

/// Home page and form submission.
///
/// # Endpoints
///
/// - `GET  /` - Home page with the create form and listings
/// - `POST /` - Create a short link from the form
pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(home_handler).post(create_handler))
}

/// Short link redirects.
///
/// Static paths such as `/health` take precedence over the alias segment.
///
/// # Endpoints
///
/// - `GET /{alias}` - 307 redirect to the stored url
pub fn redirect_routes() -> Router<AppState> {
    Router::new().route("/{alias}", get(redirect_handler))
}
