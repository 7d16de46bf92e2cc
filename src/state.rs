use sqlx::SqlitePool;
use std::sync::Arc;

use crate::cache::PageCache;
use crate::catalogue::CatalogueExterne;
use crate::import::ImportTracker;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub catalogue: Arc<dyn CatalogueExterne>,
    pub cache_pages: Arc<PageCache>,
    pub import: Arc<ImportTracker>,
}
