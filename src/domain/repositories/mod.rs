//! Repository trait definitions for the domain layer.
//!
//! - [`LinkRepository`] - The link store: uniqueness, visit accounting and listings
//!
//! Implementations live in `crate::infrastructure::persistence`. A mock
//! implementation is generated via `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
