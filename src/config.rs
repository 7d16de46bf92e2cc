use std::env;

/// Configuration lue depuis l'environnement (ou .env via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Base URL du catalogue distant. Absente, les fonctionnalités qui en
    /// dépendent (pages distantes, import massif) sont désactivées.
    pub catalogue_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:secret/mangatheque.db".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:7784".to_string()),
            catalogue_url: env::var("CATALOGUE_URL").ok().filter(|u| !u.is_empty()),
        }
    }
}
