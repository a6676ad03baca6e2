#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use shortlinks::application::services::LinkService;
use shortlinks::domain::entities::{LinkRecord, NewLink};
use shortlinks::domain::repositories::LinkRepository;
use shortlinks::error::StoreError;
use shortlinks::infrastructure::persistence::MemoryLinkRepository;
use shortlinks::routes::{RESERVED_ALIASES, app_router};
use shortlinks::state::{AppState, SharedLinkService};
use shortlinks::utils::alias_generator::{AliasGenerator, RandomAliasGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://sho.rt/";
pub const LISTING_SIZE: usize = 10;

/// Store whose every call fails as if the database were down.
pub struct UnavailableLinkRepository;

#[async_trait]
impl LinkRepository for UnavailableLinkRepository {
    async fn insert(&self, _new_link: NewLink) -> Result<LinkRecord, StoreError> {
        Err(unavailable())
    }

    async fn lookup(&self, _alias: &str) -> Result<Option<LinkRecord>, StoreError> {
        Err(unavailable())
    }

    async fn increment_visit(&self, _alias: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_latest(&self, _limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        Err(unavailable())
    }

    async fn list_most_visited(&self, _limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

/// In-memory store whose visit increments always fail.
#[derive(Default)]
pub struct NoVisitLinkRepository {
    inner: MemoryLinkRepository,
}

#[async_trait]
impl LinkRepository for NoVisitLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, StoreError> {
        self.inner.insert(new_link).await
    }

    async fn lookup(&self, alias: &str) -> Result<Option<LinkRecord>, StoreError> {
        self.inner.lookup(alias).await
    }

    async fn increment_visit(&self, _alias: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        self.inner.list_latest(limit).await
    }

    async fn list_most_visited(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        self.inner.list_most_visited(limit).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

/// Generator replaying a fixed list of aliases, then repeating the last one.
pub struct ScriptedAliasGenerator {
    aliases: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedAliasGenerator {
    pub fn new(aliases: &[&str]) -> Self {
        Self {
            aliases: Mutex::new(aliases.iter().map(|a| a.to_string()).collect()),
            last: Mutex::new(aliases.last().unwrap_or(&"fallback").to_string()),
        }
    }
}

impl AliasGenerator for ScriptedAliasGenerator {
    fn generate(&self) -> String {
        match self.aliases.lock().unwrap().pop_front() {
            Some(alias) => alias,
            None => self.last.lock().unwrap().clone(),
        }
    }
}

pub fn create_service(
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn AliasGenerator>,
    max_alias_attempts: usize,
) -> SharedLinkService {
    Arc::new(
        LinkService::new(repository, generator, max_alias_attempts)
            .with_reserved_aliases(RESERVED_ALIASES),
    )
}

pub fn memory_service() -> SharedLinkService {
    create_service(
        Arc::new(MemoryLinkRepository::new()),
        Arc::new(RandomAliasGenerator::default()),
        8,
    )
}

pub fn create_test_state(link_service: SharedLinkService) -> AppState {
    AppState::new(link_service, Some(BASE_URL.to_string()), LISTING_SIZE)
}

pub fn create_test_server(link_service: SharedLinkService) -> TestServer {
    TestServer::new(app_router(create_test_state(link_service))).unwrap()
}

pub fn unavailable_server() -> TestServer {
    create_test_server(create_service(
        Arc::new(UnavailableLinkRepository),
        Arc::new(RandomAliasGenerator::default()),
        8,
    ))
}

pub async fn create_test_link(service: &SharedLinkService, alias: &str, url: &str) -> LinkRecord {
    service.create_link(url, Some(alias)).await.unwrap()
}
