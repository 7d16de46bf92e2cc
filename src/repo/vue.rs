use sqlx::sqlite::SqlitePool;

/// Journal de consultation, en insertion seule. Chaque affichage de fiche
/// compte, utilisateur connecté ou non.
pub async fn enregistrer(
    pool: &SqlitePool,
    oeuvre_id: i64,
    utilisateur_id: Option<i64>,
    ip: Option<&str>,
    user_agent: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO oeuvre_view (oeuvre_id, utilisateur_id, ip, user_agent) VALUES (?, ?, ?, ?)",
    )
    .bind(oeuvre_id)
    .bind(utilisateur_id)
    .bind(ip)
    .bind(user_agent)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn compter(pool: &SqlitePool, oeuvre_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM oeuvre_view WHERE oeuvre_id = ?")
        .bind(oeuvre_id)
        .fetch_one(pool)
        .await
}
