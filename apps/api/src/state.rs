use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::layout::PageConfig;
use crate::pricing::cache::EstimateCache;
use crate::pricing::profiles::PricingConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Terrain profiles and tax rate. Loaded once at startup, never mutated.
    pub pricing: Arc<PricingConfig>,
    /// Last computed estimate, keyed by its exact inputs.
    pub estimate_cache: Arc<Mutex<EstimateCache>>,
    /// Page geometry for the quote document.
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(config: Config, pricing: PricingConfig, page_config: PageConfig) -> Self {
        AppState {
            config,
            pricing: Arc::new(pricing),
            estimate_cache: Arc::new(Mutex::new(EstimateCache::new())),
            page_config,
        }
    }

    /// The cache holds plain values, so a poisoned lock is still usable.
    pub fn cache(&self) -> MutexGuard<'_, EstimateCache> {
        self.estimate_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
