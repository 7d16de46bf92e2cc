use sqlx::sqlite::SqlitePool;

use crate::models::Utilisateur;

pub async fn par_email(pool: &SqlitePool, email: &str) -> Result<Option<Utilisateur>, sqlx::Error> {
    sqlx::query_as::<_, Utilisateur>("SELECT * FROM user WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn par_id(pool: &SqlitePool, id: i64) -> Result<Option<Utilisateur>, sqlx::Error> {
    sqlx::query_as::<_, Utilisateur>("SELECT * FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// L'email est unique en base; une inscription concurrente sur le même email
/// fait échouer l'INSERT et l'erreur remonte à l'appelant.
pub async fn creer(
    pool: &SqlitePool,
    email: &str,
    nom: &str,
    mot_de_passe_hash: &str,
) -> Result<i64, sqlx::Error> {
    let resultat = sqlx::query("INSERT INTO user (email, nom, mot_de_passe) VALUES (?, ?, ?)")
        .bind(email)
        .bind(nom)
        .bind(mot_de_passe_hash)
        .execute(pool)
        .await?;
    Ok(resultat.last_insert_rowid())
}
