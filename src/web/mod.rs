//! Browser-facing layer.
//!
//! Serves the home page with the create form and the link listings, and
//! redirects short links. Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering and redirect handlers
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod routes;
