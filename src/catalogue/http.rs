use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::catalogue::{CatalogueError, CatalogueExterne, CatalogueResult, OeuvreCatalogue};

pub fn creer_client() -> Client {
    Client::builder()
        .user_agent(concat!("mangatheque/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
}

/// Client du catalogue distant, une API JSON compagnon.
pub struct CatalogueHttp {
    client: Client,
    base_url: String,
}

impl CatalogueHttp {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: creer_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn obtenir<T: serde::de::DeserializeOwned>(&self, chemin: &str) -> CatalogueResult<T> {
        let url = format!("{}{}", self.base_url, chemin);
        let reponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogueError::Http(e.to_string()))?;
        if !reponse.status().is_success() {
            return Err(CatalogueError::Http(format!(
                "statut {} sur {}",
                reponse.status(),
                url
            )));
        }
        reponse
            .json::<T>()
            .await
            .map_err(|e| CatalogueError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
struct PagesReponse {
    pages: Vec<String>,
}

#[derive(Deserialize)]
struct OeuvresReponse {
    oeuvres: Vec<OeuvreCatalogue>,
}

#[async_trait]
impl CatalogueExterne for CatalogueHttp {
    async fn pages_chapitre(
        &self,
        oeuvre_externe: &str,
        chapitre_externe: &str,
    ) -> CatalogueResult<Vec<String>> {
        let chemin = format!("/oeuvres/{}/chapitres/{}/pages", oeuvre_externe, chapitre_externe);
        let reponse: PagesReponse = self.obtenir(&chemin).await?;
        Ok(reponse.pages)
    }

    async fn lister_oeuvres(&self, limite: usize) -> CatalogueResult<Vec<OeuvreCatalogue>> {
        let chemin = format!("/oeuvres?limite={}", limite);
        let reponse: OeuvresReponse = self.obtenir(&chemin).await?;
        Ok(reponse.oeuvres)
    }
}
