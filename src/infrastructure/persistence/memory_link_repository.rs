//! Process-local implementation of the link store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;

/// In-memory link store for development and tests.
///
/// A single mutex guards the map, which makes insert and increment atomic.
/// Data is lost on restart.
pub struct MemoryLinkRepository {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    links: HashMap<String, LinkRecord>,
    next_id: i64,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("mutex poisoned".into()))
    }

    fn sorted_snapshot<F>(&self, limit: usize, order: F) -> Result<Vec<LinkRecord>, StoreError>
    where
        F: Fn(&LinkRecord, &LinkRecord) -> std::cmp::Ordering,
    {
        let state = self.state()?;
        let mut records: Vec<LinkRecord> = state.links.values().cloned().collect();
        drop(state);

        records.sort_by(order);
        records.truncate(limit);
        Ok(records)
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, StoreError> {
        let mut state = self.state()?;

        if state.links.contains_key(&new_link.alias) {
            return Err(StoreError::AliasTaken(new_link.alias));
        }

        state.next_id += 1;
        let record = LinkRecord::new(state.next_id, new_link.alias, new_link.url, 0, Utc::now());
        state.links.insert(record.alias.clone(), record.clone());

        Ok(record)
    }

    async fn lookup(&self, alias: &str) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.state()?.links.get(alias).cloned())
    }

    async fn increment_visit(&self, alias: &str) -> Result<(), StoreError> {
        match self.state()?.links.get_mut(alias) {
            Some(record) => {
                record.visits += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound(alias.to_string())),
        }
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        self.sorted_snapshot(limit, |a, b| {
            b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
        })
    }

    async fn list_most_visited(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        self.sorted_snapshot(limit, |a, b| {
            b.visits
                .cmp(&a.visits)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.state().map(|_| ())
    }
}
