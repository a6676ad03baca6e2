//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// Link service over whichever store was selected at startup.
pub type SharedLinkService = Arc<LinkService<dyn LinkRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: SharedLinkService,
    /// Fixed base for displayed short links; derived per request when `None`.
    pub public_base_url: Option<String>,
    /// Number of entries in the "latest" and "most viewed" lists.
    pub listing_size: usize,
}

impl AppState {
    pub fn new(
        link_service: SharedLinkService,
        public_base_url: Option<String>,
        listing_size: usize,
    ) -> Self {
        Self {
            link_service,
            public_base_url,
            listing_size,
        }
    }
}
