use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::forms::auteur::{CreerAuteur, ModifierAuteur};
use crate::models::{Auteur, TypeOeuvre};

/// Œuvre réduite à ce qu'une fiche auteur affiche.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreResume {
    pub id: i64,
    pub titre: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
}

pub async fn lister(pool: &SqlitePool) -> Result<Vec<Auteur>, sqlx::Error> {
    sqlx::query_as::<_, Auteur>("SELECT * FROM auteur ORDER BY nom COLLATE NOCASE ASC")
        .fetch_all(pool)
        .await
}

pub async fn par_id(pool: &SqlitePool, id: i64) -> Result<Option<Auteur>, sqlx::Error> {
    sqlx::query_as::<_, Auteur>("SELECT * FROM auteur WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn existe(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let trouve: Option<i64> = sqlx::query_scalar("SELECT 1 FROM auteur WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(trouve.is_some())
}

pub async fn oeuvres_de(pool: &SqlitePool, auteur_id: i64) -> Result<Vec<OeuvreResume>, sqlx::Error> {
    sqlx::query_as::<_, OeuvreResume>(
        "SELECT id, titre, type, couverture FROM oeuvre WHERE auteur_id = ? \
         ORDER BY titre COLLATE NOCASE ASC",
    )
    .bind(auteur_id)
    .fetch_all(pool)
    .await
}

pub async fn nombre_oeuvres(pool: &SqlitePool, auteur_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM oeuvre WHERE auteur_id = ?")
        .bind(auteur_id)
        .fetch_one(pool)
        .await
}

pub async fn creer(pool: &SqlitePool, form: &CreerAuteur) -> Result<i64, sqlx::Error> {
    let resultat = sqlx::query(
        "INSERT INTO auteur (nom, pseudonyme, biographie, nationalite, date_naissance)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(form.nom.trim())
    .bind(&form.pseudonyme)
    .bind(&form.biographie)
    .bind(&form.nationalite)
    .bind(form.date_naissance)
    .execute(pool)
    .await?;
    Ok(resultat.last_insert_rowid())
}

pub async fn modifier(
    pool: &SqlitePool,
    id: i64,
    form: &ModifierAuteur,
) -> Result<bool, sqlx::Error> {
    let mut updates: Vec<&str> = Vec::new();
    if form.nom.is_some() {
        updates.push("nom = ?");
    }
    if form.pseudonyme.is_some() {
        updates.push("pseudonyme = ?");
    }
    if form.biographie.is_some() {
        updates.push("biographie = ?");
    }
    if form.nationalite.is_some() {
        updates.push("nationalite = ?");
    }
    if form.date_naissance.is_some() {
        updates.push("date_naissance = ?");
    }
    updates.push("updated_at = CURRENT_TIMESTAMP");

    let sql = format!("UPDATE auteur SET {} WHERE id = ?", updates.join(", "));
    let mut query = sqlx::query(&sql);
    if let Some(nom) = &form.nom {
        query = query.bind(nom.trim());
    }
    if let Some(pseudonyme) = &form.pseudonyme {
        query = query.bind(pseudonyme);
    }
    if let Some(biographie) = &form.biographie {
        query = query.bind(biographie);
    }
    if let Some(nationalite) = &form.nationalite {
        query = query.bind(nationalite);
    }
    if let Some(date_naissance) = form.date_naissance {
        query = query.bind(date_naissance);
    }
    let resultat = query.bind(id).execute(pool).await?;
    Ok(resultat.rows_affected() > 0)
}

/// La suppression est refusée en amont quand l'auteur a encore des œuvres;
/// le schéma ne pose pas de cascade sur `oeuvre.auteur_id`.
pub async fn supprimer(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let resultat = sqlx::query("DELETE FROM auteur WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(resultat.rows_affected() > 0)
}
