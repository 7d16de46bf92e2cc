use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::forms::chapitre::{CreerChapitre, ModifierChapitre};
use crate::models::Chapitre;

/// Entrée de la table des matières d'une œuvre.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapitreResume {
    pub id: i64,
    pub titre: String,
    pub ordre: i64,
    pub created_at: chrono::NaiveDateTime,
}

/// Voisin de lecture (chapitre précédent ou suivant).
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct VoisinChapitre {
    pub id: i64,
    pub titre: String,
    pub ordre: i64,
}

pub async fn pour_oeuvre(
    pool: &SqlitePool,
    oeuvre_id: i64,
) -> Result<Vec<ChapitreResume>, sqlx::Error> {
    sqlx::query_as::<_, ChapitreResume>(
        "SELECT id, titre, ordre, created_at FROM chapitre WHERE oeuvre_id = ? \
         ORDER BY ordre ASC, id ASC",
    )
    .bind(oeuvre_id)
    .fetch_all(pool)
    .await
}

pub async fn par_id(pool: &SqlitePool, id: i64) -> Result<Option<Chapitre>, sqlx::Error> {
    sqlx::query_as::<_, Chapitre>("SELECT * FROM chapitre WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Dernier chapitre de la même œuvre dont l'ordre est strictement inférieur.
/// Les trous de numérotation sont tolérés.
pub async fn precedent(
    pool: &SqlitePool,
    oeuvre_id: i64,
    ordre: i64,
) -> Result<Option<VoisinChapitre>, sqlx::Error> {
    sqlx::query_as::<_, VoisinChapitre>(
        "SELECT id, titre, ordre FROM chapitre WHERE oeuvre_id = ? AND ordre < ? \
         ORDER BY ordre DESC, id DESC LIMIT 1",
    )
    .bind(oeuvre_id)
    .bind(ordre)
    .fetch_optional(pool)
    .await
}

pub async fn suivant(
    pool: &SqlitePool,
    oeuvre_id: i64,
    ordre: i64,
) -> Result<Option<VoisinChapitre>, sqlx::Error> {
    sqlx::query_as::<_, VoisinChapitre>(
        "SELECT id, titre, ordre FROM chapitre WHERE oeuvre_id = ? AND ordre > ? \
         ORDER BY ordre ASC, id ASC LIMIT 1",
    )
    .bind(oeuvre_id)
    .bind(ordre)
    .fetch_optional(pool)
    .await
}

pub async fn creer(
    pool: &SqlitePool,
    oeuvre_id: i64,
    form: &CreerChapitre,
) -> Result<i64, sqlx::Error> {
    let resultat = sqlx::query(
        "INSERT INTO chapitre (oeuvre_id, titre, ordre, resume, pages, id_externe)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(oeuvre_id)
    .bind(form.titre.trim())
    .bind(form.ordre)
    .bind(&form.resume)
    .bind(Json(&form.pages))
    .bind(&form.id_externe)
    .execute(pool)
    .await?;
    Ok(resultat.last_insert_rowid())
}

pub async fn modifier(
    pool: &SqlitePool,
    id: i64,
    form: &ModifierChapitre,
) -> Result<bool, sqlx::Error> {
    let mut updates: Vec<&str> = Vec::new();
    if form.titre.is_some() {
        updates.push("titre = ?");
    }
    if form.ordre.is_some() {
        updates.push("ordre = ?");
    }
    if form.resume.is_some() {
        updates.push("resume = ?");
    }
    if form.pages.is_some() {
        updates.push("pages = ?");
    }
    if form.id_externe.is_some() {
        updates.push("id_externe = ?");
    }
    updates.push("updated_at = CURRENT_TIMESTAMP");

    let sql = format!("UPDATE chapitre SET {} WHERE id = ?", updates.join(", "));
    let mut query = sqlx::query(&sql);
    if let Some(titre) = &form.titre {
        query = query.bind(titre.trim());
    }
    if let Some(ordre) = form.ordre {
        query = query.bind(ordre);
    }
    if let Some(resume) = &form.resume {
        query = query.bind(resume);
    }
    if let Some(pages) = &form.pages {
        query = query.bind(Json(pages));
    }
    if let Some(id_externe) = &form.id_externe {
        query = query.bind(id_externe);
    }
    let resultat = query.bind(id).execute(pool).await?;
    Ok(resultat.rows_affected() > 0)
}

pub async fn supprimer(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let resultat = sqlx::query("DELETE FROM chapitre WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(resultat.rows_affected() > 0)
}
