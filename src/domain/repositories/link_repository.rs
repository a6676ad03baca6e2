//! Repository trait for short link data access.

use crate::domain::entities::{LinkRecord, NewLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// The link store.
///
/// Exclusively owns the persisted collection of [`LinkRecord`]s. Callers only
/// ever receive snapshots.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// Every method returns [`StoreError::Unavailable`] when the backing storage
/// fails or does not answer within its timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new record with `visits = 0` and `created_at = now`.
    ///
    /// The absence check and the insert are a single atomic step: of several
    /// concurrent inserts for the same alias exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasTaken`] if the alias already exists.
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, StoreError>;

    /// Finds a record by its alias without touching the visit counter.
    async fn lookup(&self, alias: &str) -> Result<Option<LinkRecord>, StoreError>;

    /// Atomically increments the visit counter of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this alias.
    async fn increment_visit(&self, alias: &str) -> Result<(), StoreError>;

    /// Returns up to `limit` most recently created records, newest first.
    ///
    /// Records created at the same instant are ordered by insertion, latest first.
    async fn list_latest(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError>;

    /// Returns up to `limit` records with the highest visit counts.
    ///
    /// Ties are broken by `created_at` descending, then by insertion order.
    async fn list_most_visited(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError>;

    /// Checks that the storage answers.
    async fn ping(&self) -> Result<(), StoreError>;
}
