use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::page::PageController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The single interactive page. Locked for the whole of each event, so
    /// chat turns never overlap.
    pub page: Arc<Mutex<PageController>>,
}

impl AppState {
    pub fn new(config: Config, page: PageController) -> Self {
        Self {
            config,
            page: Arc::new(Mutex::new(page)),
        }
    }
}
