//! Core domain entities.
//!
//! - [`LinkRecord`] - the sole persisted entity, binding an alias to a URL
//! - [`NewLink`] - input for creating a record

pub mod link;

pub use link::{LinkRecord, NewLink};
