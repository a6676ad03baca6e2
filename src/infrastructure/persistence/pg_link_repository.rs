//! PostgreSQL implementation of the link store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::domain::entities::{LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;
use crate::utils::db_error::is_unique_violation_on_alias;

/// Timeout applied to every storage call unless configured otherwise.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL repository for link storage and retrieval.
///
/// Alias uniqueness is enforced by the `links_alias_key` constraint and visit
/// counts are incremented in a single `UPDATE`, so concurrent requests never
/// race on application-side checks.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    alias: String,
    url: String,
    visits: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for LinkRecord {
    fn from(r: LinkRow) -> Self {
        LinkRecord::new(r.id, r.alias, r.url, r.visits, r.created_at)
    }
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, DEFAULT_STORAGE_TIMEOUT)
    }

    /// Creates a new repository whose calls fail after `timeout`.
    pub fn with_timeout(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Runs a query under the storage timeout.
    ///
    /// Driver errors go through `map_err`; an elapsed timeout is always
    /// [`StoreError::Unavailable`].
    async fn bounded<T, F, M>(
        &self,
        operation: &'static str,
        query: F,
        map_err: M,
    ) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
        M: FnOnce(sqlx::Error) -> StoreError,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let mapped = map_err(e);
                if let StoreError::Unavailable(reason) = &mapped {
                    error!(operation, %reason, "Storage call failed");
                }
                Err(mapped)
            }
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Storage call timed out"
                );
                Err(StoreError::Unavailable(format!(
                    "{operation} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, StoreError> {
        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (alias, url)
            VALUES ($1, $2)
            RETURNING id, alias, url, visits, created_at
            "#,
        )
        .bind(&new_link.alias)
        .bind(&new_link.url)
        .fetch_one(self.pool.as_ref());

        let row = self
            .bounded("insert", query, |e| {
                if is_unique_violation_on_alias(&e) {
                    StoreError::AliasTaken(new_link.alias.clone())
                } else {
                    e.into()
                }
            })
            .await?;

        Ok(row.into())
    }

    async fn lookup(&self, alias: &str) -> Result<Option<LinkRecord>, StoreError> {
        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, alias, url, visits, created_at
            FROM links
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref());

        let row = self.bounded("lookup", query, StoreError::from).await?;

        Ok(row.map(LinkRecord::from))
    }

    async fn increment_visit(&self, alias: &str) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
            UPDATE links
            SET visits = visits + 1
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .execute(self.pool.as_ref());

        let result = self
            .bounded("increment_visit", query, StoreError::from)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(alias.to_string()));
        }

        Ok(())
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, alias, url, visits, created_at
            FROM links
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(sql_limit(limit))
        .fetch_all(self.pool.as_ref());

        let rows = self.bounded("list_latest", query, StoreError::from).await?;

        Ok(rows.into_iter().map(LinkRecord::from).collect())
    }

    async fn list_most_visited(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, alias, url, visits, created_at
            FROM links
            ORDER BY visits DESC, created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(sql_limit(limit))
        .fetch_all(self.pool.as_ref());

        let rows = self
            .bounded("list_most_visited", query, StoreError::from)
            .await?;

        Ok(rows.into_iter().map(LinkRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let query = sqlx::query("SELECT 1").execute(self.pool.as_ref());

        self.bounded("ping", query, StoreError::from).await?;

        Ok(())
    }
}
