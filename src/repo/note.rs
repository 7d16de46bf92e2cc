use sqlx::sqlite::SqlitePool;

use crate::models::AgregatNotes;

/// Une note par couple (œuvre, utilisateur): re-noter écrase la valeur
/// précédente via l'upsert, jamais de seconde ligne.
pub async fn noter(
    pool: &SqlitePool,
    oeuvre_id: i64,
    utilisateur_id: i64,
    valeur: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO oeuvre_note (oeuvre_id, utilisateur_id, valeur) VALUES (?, ?, ?)
         ON CONFLICT(oeuvre_id, utilisateur_id)
         DO UPDATE SET valeur = excluded.valeur, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(oeuvre_id)
    .bind(utilisateur_id)
    .bind(valeur)
    .execute(pool)
    .await?;
    Ok(())
}

/// Moyenne arrondie à une décimale et nombre de notes. Sans aucune note,
/// la moyenne vaut 0.0 et le total 0.
pub async fn agreger(pool: &SqlitePool, oeuvre_id: i64) -> Result<AgregatNotes, sqlx::Error> {
    sqlx::query_as::<_, AgregatNotes>(
        "SELECT ROUND(COALESCE(AVG(valeur), 0), 1) AS average, COUNT(*) AS total \
         FROM oeuvre_note WHERE oeuvre_id = ?",
    )
    .bind(oeuvre_id)
    .fetch_one(pool)
    .await
}

pub async fn de_lutilisateur(
    pool: &SqlitePool,
    oeuvre_id: i64,
    utilisateur_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT valeur FROM oeuvre_note WHERE oeuvre_id = ? AND utilisateur_id = ?")
        .bind(oeuvre_id)
        .bind(utilisateur_id)
        .fetch_optional(pool)
        .await
}
