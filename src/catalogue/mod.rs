pub mod http;

pub use http::{creer_client, CatalogueHttp};

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

use crate::models::TypeOeuvre;

/// Œuvre telle que décrite par le catalogue distant, avant import.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreCatalogue {
    pub id_externe: String,
    pub titre: String,
    #[serde(rename = "type")]
    pub type_oeuvre: Option<TypeOeuvre>,
    pub couverture: Option<String>,
    pub resume: Option<String>,
    pub auteur: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub enum CatalogueError {
    Http(String),
    Decode(String),
    Indisponible,
}

impl fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogueError::Http(msg) => write!(f, "erreur HTTP: {}", msg),
            CatalogueError::Decode(msg) => write!(f, "réponse illisible: {}", msg),
            CatalogueError::Indisponible => write!(f, "catalogue externe non configuré"),
        }
    }
}

impl std::error::Error for CatalogueError {}

pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Source de données distante: planches des chapitres et liste d'œuvres
/// pour l'import massif.
#[async_trait]
pub trait CatalogueExterne: Send + Sync {
    /// URLs des planches d'un chapitre, identifié par les références
    /// externes de l'œuvre et du chapitre.
    async fn pages_chapitre(
        &self,
        oeuvre_externe: &str,
        chapitre_externe: &str,
    ) -> CatalogueResult<Vec<String>>;

    /// Les `limite` premières œuvres du catalogue distant.
    async fn lister_oeuvres(&self, limite: usize) -> CatalogueResult<Vec<OeuvreCatalogue>>;

    fn est_configure(&self) -> bool {
        true
    }
}

/// Implémentation neutre quand aucune URL de catalogue n'est configurée:
/// tout échoue en `Indisponible` et l'import massif est refusé en amont.
pub struct CatalogueAbsent;

#[async_trait]
impl CatalogueExterne for CatalogueAbsent {
    async fn pages_chapitre(
        &self,
        _oeuvre_externe: &str,
        _chapitre_externe: &str,
    ) -> CatalogueResult<Vec<String>> {
        Err(CatalogueError::Indisponible)
    }

    async fn lister_oeuvres(&self, _limite: usize) -> CatalogueResult<Vec<OeuvreCatalogue>> {
        Err(CatalogueError::Indisponible)
    }

    fn est_configure(&self) -> bool {
        false
    }
}
