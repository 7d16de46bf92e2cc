use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

use crate::models::TypeOeuvre;

/// Entrée de collection jointe à son œuvre, pour la liste personnelle.
#[derive(Debug, FromRow)]
pub struct CollectionRow {
    pub oeuvre_id: i64,
    pub titre: String,
    #[sqlx(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
    pub note_personnelle: Option<String>,
    pub ajoute_le: NaiveDateTime,
}

/// Ré-ajouter une œuvre déjà présente met à jour la note personnelle sans
/// créer de doublon ni toucher à la date d'ajout.
pub async fn ajouter(
    pool: &SqlitePool,
    utilisateur_id: i64,
    oeuvre_id: i64,
    note_personnelle: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO collection_user (utilisateur_id, oeuvre_id, note_personnelle) \
         VALUES (?, ?, ?)
         ON CONFLICT(utilisateur_id, oeuvre_id)
         DO UPDATE SET note_personnelle = excluded.note_personnelle",
    )
    .bind(utilisateur_id)
    .bind(oeuvre_id)
    .bind(note_personnelle)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn retirer(
    pool: &SqlitePool,
    utilisateur_id: i64,
    oeuvre_id: i64,
) -> Result<bool, sqlx::Error> {
    let resultat =
        sqlx::query("DELETE FROM collection_user WHERE utilisateur_id = ? AND oeuvre_id = ?")
            .bind(utilisateur_id)
            .bind(oeuvre_id)
            .execute(pool)
            .await?;
    Ok(resultat.rows_affected() > 0)
}

pub async fn lister(
    pool: &SqlitePool,
    utilisateur_id: i64,
) -> Result<Vec<CollectionRow>, sqlx::Error> {
    sqlx::query_as::<_, CollectionRow>(
        "SELECT o.id AS oeuvre_id, o.titre, o.type, o.couverture, \
                c.note_personnelle, c.ajoute_le \
         FROM collection_user c JOIN oeuvre o ON o.id = c.oeuvre_id \
         WHERE c.utilisateur_id = ? \
         ORDER BY c.ajoute_le DESC, o.id DESC",
    )
    .bind(utilisateur_id)
    .fetch_all(pool)
    .await
}

pub async fn contient(
    pool: &SqlitePool,
    utilisateur_id: i64,
    oeuvre_id: i64,
) -> Result<bool, sqlx::Error> {
    let trouve: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM collection_user WHERE utilisateur_id = ? AND oeuvre_id = ?",
    )
    .bind(utilisateur_id)
    .bind(oeuvre_id)
    .fetch_optional(pool)
    .await?;
    Ok(trouve.is_some())
}
