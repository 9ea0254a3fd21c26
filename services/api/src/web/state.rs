//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{ComparisonCache, DbAdapter};
use crate::config::Config;
use grocery_compare_core::{ComparisonEngine, ProductMatcher};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbAdapter>,
    pub matcher: Arc<ProductMatcher>,
    pub engine: Arc<ComparisonEngine>,
    pub comparison_cache: Arc<ComparisonCache>,
    pub config: Arc<Config>,
}
