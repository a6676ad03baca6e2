//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::LinkRecord;
use crate::utils::base_url::short_url;

/// Request to create a short link.
///
/// Only size limits are checked here; the url and alias themselves are
/// validated by the link service so both fields are reported together.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// Optional custom alias. An empty string is treated as absent.
    #[serde(default)]
    #[validate(length(max = 64, message = "Alias is too long"))]
    pub alias: Option<String>,
}

impl CreateLinkRequest {
    /// Returns the requested alias, or `None` when absent or empty.
    pub fn requested_alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|alias| !alias.is_empty())
    }
}

/// Query parameters of the listing endpoints.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Returns the requested limit or `default`.
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default)
    }
}

/// A short link as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub alias: String,
    pub url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
    pub short_url: String,
}

impl LinkResponse {
    pub fn from_record(record: LinkRecord, base_url: &str) -> Self {
        let short_url = short_url(base_url, &record.alias);
        Self {
            alias: record.alias,
            url: record.url,
            visits: record.visits,
            created_at: record.created_at,
            short_url,
        }
    }
}
