use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::sqlite::SqlitePool;

use crate::auth::{UtilisateurCourant, ROLE_USER};

const LONGUEUR_JETON: usize = 48;
const VALIDITE_JOURS: i64 = 30;

/// Jeton opaque remis au client à la connexion. Seul son hash est stocké,
/// une fuite de la table session ne donne donc aucun jeton utilisable.
pub fn generer_jeton() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LONGUEUR_JETON)
        .map(char::from)
        .collect()
}

fn hacher_jeton(jeton: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jeton.as_bytes());
    hex::encode(hasher.finalize())
}

/// Ouvre une session pour l'utilisateur et renvoie le jeton en clair,
/// la seule fois où il circule.
pub async fn ouvrir(pool: &SqlitePool, utilisateur_id: i64) -> Result<String, sqlx::Error> {
    let jeton = generer_jeton();
    sqlx::query("INSERT INTO session (utilisateur_id, jeton_hash) VALUES (?, ?)")
        .bind(utilisateur_id)
        .bind(hacher_jeton(&jeton))
        .execute(pool)
        .await?;
    Ok(jeton)
}

pub async fn fermer(pool: &SqlitePool, jeton: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM session WHERE jeton_hash = ?")
        .bind(hacher_jeton(jeton))
        .execute(pool)
        .await?;
    Ok(())
}

/// Résout le porteur du jeton. Les sessions de plus de trente jours sont
/// considérées expirées sans être purgées ici.
pub async fn utilisateur_par_jeton(
    pool: &SqlitePool,
    jeton: &str,
) -> Result<Option<UtilisateurCourant>, sqlx::Error> {
    let ligne: Option<(i64, String, String, String)> = sqlx::query_as(
        "SELECT u.id, u.email, u.nom, u.roles
         FROM session s JOIN user u ON u.id = s.utilisateur_id
         WHERE s.jeton_hash = ? AND s.created_at >= datetime('now', ?)",
    )
    .bind(hacher_jeton(jeton))
    .bind(format!("-{VALIDITE_JOURS} days"))
    .fetch_optional(pool)
    .await?;

    Ok(ligne.map(|(id, email, nom, roles)| UtilisateurCourant {
        id,
        email,
        nom,
        roles: serde_json::from_str(&roles).unwrap_or_else(|_| vec![ROLE_USER.to_string()]),
    }))
}

/// Extrait le jeton d'un en-tête `Authorization: Bearer <jeton>`.
pub fn jeton_depuis_entetes(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Variante tolérante pour les routes publiques qui personnalisent leur
/// réponse quand un lecteur est connecté: sans jeton ou avec un jeton
/// invalide, renvoie simplement None.
pub async fn utilisateur_depuis_entetes(
    pool: &SqlitePool,
    headers: &HeaderMap,
) -> Result<Option<UtilisateurCourant>, sqlx::Error> {
    match jeton_depuis_entetes(headers) {
        Some(jeton) => utilisateur_par_jeton(pool, jeton).await,
        None => Ok(None),
    }
}
