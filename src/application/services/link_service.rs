//! Link creation, resolution and listing service.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::domain::entities::{LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{InvalidFields, LinkError, StoreError};
use crate::utils::alias_generator::AliasGenerator;
use crate::utils::validation::{is_legal_alias, is_well_formed_url};

/// Default number of generated aliases tried before giving up.
pub const DEFAULT_MAX_ALIAS_ATTEMPTS: usize = 8;

/// Service for creating and resolving short links.
///
/// Composes validation, alias generation and the link store. The store is
/// injected once at startup and shared by every request.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    alias_generator: Arc<dyn AliasGenerator>,
    max_alias_attempts: usize,
    reserved_aliases: Vec<String>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `max_alias_attempts` bounds how many generated aliases are tried for a
    /// single request; it is raised to at least one.
    pub fn new(
        link_repository: Arc<L>,
        alias_generator: Arc<dyn AliasGenerator>,
        max_alias_attempts: usize,
    ) -> Self {
        Self {
            link_repository,
            alias_generator,
            max_alias_attempts: max_alias_attempts.max(1),
            reserved_aliases: Vec::new(),
        }
    }

    /// Marks aliases that collide with routes of the presentation layer.
    ///
    /// Requesting a reserved alias fails as if it were already taken, and
    /// generated candidates that hit a reserved alias are skipped.
    pub fn with_reserved_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    fn is_reserved(&self, alias: &str) -> bool {
        self.reserved_aliases.iter().any(|reserved| reserved == alias)
    }

    /// Creates a short link for `url`, using `requested_alias` when given.
    ///
    /// The url and the alias are both validated before any storage call, and
    /// both failures are reported together in [`LinkError::Invalid`].
    ///
    /// # Errors
    ///
    /// - [`LinkError::Invalid`] if the url is malformed or the alias has illegal characters
    /// - [`LinkError::AliasTaken`] if the requested alias already exists or is reserved
    /// - [`LinkError::AliasSpaceExhausted`] if no free alias was generated within the retry budget
    /// - [`LinkError::StorageUnavailable`] on storage failures
    pub async fn create_link(
        &self,
        url: &str,
        requested_alias: Option<&str>,
    ) -> Result<LinkRecord, LinkError> {
        let invalid = InvalidFields {
            url: !is_well_formed_url(url),
            alias: requested_alias.is_some_and(|alias| !is_legal_alias(alias)),
        };
        if invalid.any() {
            debug!(%invalid, "Rejected link creation");
            return Err(LinkError::Invalid(invalid));
        }

        if let Some(alias) = requested_alias.filter(|alias| self.is_reserved(alias)) {
            debug!(%alias, "Requested alias is reserved");
            return Err(LinkError::AliasTaken(alias.to_string()));
        }

        let record = match requested_alias {
            Some(alias) => {
                self.link_repository
                    .insert(NewLink {
                        alias: alias.to_string(),
                        url: url.to_string(),
                    })
                    .await?
            }
            None => self.insert_with_generated_alias(url).await?,
        };

        counter!("links_created_total").increment(1);
        info!(alias = %record.alias, "Created short link");

        Ok(record)
    }

    /// Resolves an alias to its target url and counts the visit.
    ///
    /// The visit increment is best-effort: if it fails the url is still
    /// returned and the failure is only logged.
    ///
    /// # Errors
    ///
    /// - [`LinkError::Invalid`] (alias flag) if `alias` is empty
    /// - [`LinkError::AliasNotFound`] if no link has this alias
    /// - [`LinkError::StorageUnavailable`] if the lookup fails
    pub async fn resolve_link(&self, alias: &str) -> Result<String, LinkError> {
        if alias.is_empty() {
            return Err(LinkError::invalid_alias());
        }

        // Illegal aliases can never have been stored.
        if !is_legal_alias(alias) {
            return Err(LinkError::AliasNotFound(alias.to_string()));
        }

        let record = self
            .link_repository
            .lookup(alias)
            .await?
            .ok_or_else(|| LinkError::AliasNotFound(alias.to_string()))?;

        if let Err(e) = self.link_repository.increment_visit(alias).await {
            counter!("visit_increment_failures_total").increment(1);
            warn!(%alias, error = %e, "Failed to record visit");
        }

        counter!("links_resolved_total").increment(1);

        Ok(record.url)
    }

    /// Returns a snapshot of a link without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::AliasNotFound`] if no link has this alias.
    pub async fn get_link(&self, alias: &str) -> Result<LinkRecord, LinkError> {
        if !is_legal_alias(alias) {
            return Err(LinkError::AliasNotFound(alias.to_string()));
        }

        self.link_repository
            .lookup(alias)
            .await?
            .ok_or_else(|| LinkError::AliasNotFound(alias.to_string()))
    }

    /// Returns up to `limit` most recently created links, newest first.
    pub async fn list_latest(&self, limit: usize) -> Result<Vec<LinkRecord>, LinkError> {
        Ok(self.link_repository.list_latest(limit).await?)
    }

    /// Returns up to `limit` most visited links, highest count first.
    pub async fn list_most_visited(&self, limit: usize) -> Result<Vec<LinkRecord>, LinkError> {
        Ok(self.link_repository.list_most_visited(limit).await?)
    }

    /// Checks that the link store is reachable.
    pub async fn check_storage(&self) -> Result<(), LinkError> {
        Ok(self.link_repository.ping().await?)
    }

    /// Generates aliases until one can be inserted.
    ///
    /// A candidate is skipped when the store already knows it, or when a
    /// concurrent request claims it between the lookup and the insert.
    async fn insert_with_generated_alias(&self, url: &str) -> Result<LinkRecord, LinkError> {
        for attempt in 1..=self.max_alias_attempts {
            let alias = self.alias_generator.generate();

            if self.is_reserved(&alias)
                || self.link_repository.lookup(&alias).await?.is_some()
            {
                counter!("alias_collisions_total").increment(1);
                debug!(%alias, attempt, "Generated alias already exists");
                continue;
            }

            let new_link = NewLink {
                alias,
                url: url.to_string(),
            };

            match self.link_repository.insert(new_link).await {
                Ok(record) => return Ok(record),
                Err(StoreError::AliasTaken(alias)) => {
                    counter!("alias_collisions_total").increment(1);
                    debug!(%alias, attempt, "Generated alias claimed concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            attempts = self.max_alias_attempts,
            "Failed to generate a unique alias"
        );

        Err(LinkError::AliasSpaceExhausted(self.max_alias_attempts))
    }
}
