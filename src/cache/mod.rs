use moka::future::Cache;
use std::time::Duration;

/// Cache des planches récupérées auprès du catalogue externe, indexé par
/// chapitre. Une entrée vit 24 heures puis sera re-demandée au besoin.
pub struct PageCache {
    cache: Cache<i64, Vec<String>>,
}

impl PageCache {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(24 * 60 * 60))
            .build();
        Self { cache }
    }

    pub async fn get(&self, chapitre_id: i64) -> Option<Vec<String>> {
        self.cache.get(&chapitre_id).await
    }

    pub async fn set(&self, chapitre_id: i64, pages: Vec<String>) {
        self.cache.insert(chapitre_id, pages).await;
    }

    pub async fn invalider(&self, chapitre_id: i64) {
        self.cache.invalidate(&chapitre_id).await;
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}
