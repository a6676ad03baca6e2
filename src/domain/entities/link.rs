//! Link record entity representing an alias to URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted short link.
///
/// The alias is the primary key and is case-sensitive. Once created, only
/// `visits` ever changes, and it only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// Store-assigned insertion sequence, used to break `created_at` ties.
    #[serde(skip)]
    pub id: i64,
    pub alias: String,
    pub url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Creates a new LinkRecord instance.
    pub fn new(
        id: i64,
        alias: String,
        url: String,
        visits: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            alias,
            url,
            visits,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub alias: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_record_creation() {
        let now = Utc::now();
        let record = LinkRecord::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            0,
            now,
        );

        assert_eq!(record.id, 1);
        assert_eq!(record.alias, "abc123");
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.visits, 0);
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_link_record_serialization_hides_id() {
        let record = LinkRecord::new(
            42,
            "foo".to_string(),
            "https://a.com".to_string(),
            3,
            Utc::now(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["alias"], "foo");
        assert_eq!(json["visits"], 3);
    }
}
