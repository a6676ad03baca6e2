//! Utility functions for validation, alias generation and presentation helpers.
//!
//! - [`validation`] - URL and alias validation
//! - [`alias_generator`] - Random alias generation
//! - [`relative_time`] - "3 minutes ago" style timestamps
//! - [`base_url`] - Public base URL resolution from request headers
//! - [`db_error`] - PostgreSQL error classification

pub mod alias_generator;
pub mod base_url;
pub mod db_error;
pub mod relative_time;
pub mod validation;
