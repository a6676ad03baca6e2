//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`         - Home page with the create form and listings
//! - `POST /`         - Create a short link from the form
//! - `GET  /health`   - Storage health check
//! - `/api/*`         - JSON API
//! - `GET  /{alias}`  - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Top-level path segments that can never be used as aliases.
pub const RESERVED_ALIASES: [&str; 2] = ["health", "api"];

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(web::routes::page_routes())
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .merge(web::routes::redirect_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps [`app_router`] so that `/docs/` and `/docs` reach the same handler.
pub fn app_service(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_router(state))
}
