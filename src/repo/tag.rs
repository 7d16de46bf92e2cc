use sqlx::sqlite::SqlitePool;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::forms::tag::CreerTag;
use crate::models::Tag;

pub async fn lister(pool: &SqlitePool) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tag ORDER BY nom COLLATE NOCASE ASC")
        .fetch_all(pool)
        .await
}

pub async fn pour_oeuvre(pool: &SqlitePool, oeuvre_id: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        "SELECT t.* FROM tag t JOIN oeuvre_tag ot ON ot.tag_id = t.id \
         WHERE ot.oeuvre_id = ? ORDER BY t.nom COLLATE NOCASE ASC",
    )
    .bind(oeuvre_id)
    .fetch_all(pool)
    .await
}

/// Nombre de tags existants parmi `ids`, pour valider une liste d'associations
/// avant insertion.
pub async fn compter_existants(pool: &SqlitePool, ids: &[i64]) -> Result<i64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(DISTINCT id) FROM tag WHERE id IN (");
    let mut separes = qb.separated(", ");
    for id in ids {
        separes.push_bind(*id);
    }
    separes.push_unseparated(")");
    let (total,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(total)
}

/// L'unicité du nom est portée par le schéma; la violation remonte telle
/// quelle à l'appelant qui la traduit en erreur de validation.
pub async fn creer(pool: &SqlitePool, form: &CreerTag) -> Result<i64, sqlx::Error> {
    let resultat = sqlx::query("INSERT INTO tag (nom, id_externe) VALUES (?, ?)")
        .bind(form.nom.trim())
        .bind(&form.id_externe)
        .execute(pool)
        .await?;
    Ok(resultat.last_insert_rowid())
}

/// Retrouve le tag par nom ou le crée, au sein d'une transaction d'import.
pub async fn obtenir_ou_creer(
    conn: &mut SqliteConnection,
    nom: &str,
    id_externe: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let existant: Option<i64> = sqlx::query_scalar("SELECT id FROM tag WHERE nom = ?")
        .bind(nom)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(id) = existant {
        return Ok(id);
    }
    let resultat = sqlx::query("INSERT INTO tag (nom, id_externe) VALUES (?, ?)")
        .bind(nom)
        .bind(id_externe)
        .execute(conn)
        .await?;
    Ok(resultat.last_insert_rowid())
}

pub async fn supprimer(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let resultat = sqlx::query("DELETE FROM tag WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(resultat.rows_affected() > 0)
}
