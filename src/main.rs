use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mangatheque::cache::PageCache;
use mangatheque::catalogue::{CatalogueAbsent, CatalogueExterne, CatalogueHttp};
use mangatheque::config::Config;
use mangatheque::import::ImportTracker;
use mangatheque::state::AppState;
use mangatheque::{db, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let pool = db::init_db(&config.database_url).await?;

    let catalogue: Arc<dyn CatalogueExterne> = match &config.catalogue_url {
        Some(url) => {
            tracing::info!("Catalogue externe: {}", url);
            Arc::new(CatalogueHttp::new(url))
        }
        None => {
            tracing::info!("Aucun catalogue externe configuré, import massif et planches distantes désactivés");
            Arc::new(CatalogueAbsent)
        }
    };

    let state = AppState {
        pool,
        catalogue,
        cache_pages: Arc::new(PageCache::new()),
        import: Arc::new(ImportTracker::new()),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
