use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

async fn pool_migre() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

async fn table_existe(pool: &SqlitePool, nom: &str) -> bool {
    sqlx::query_scalar::<_, i64>("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?")
        .bind(nom)
        .fetch_optional(pool)
        .await
        .unwrap()
        .is_some()
}

#[tokio::test]
async fn test_tables_du_schema() {
    let pool = pool_migre().await;

    for table in [
        "auteur",
        "oeuvre",
        "chapitre",
        "tag",
        "oeuvre_tag",
        "user",
        "session",
        "collection_user",
        "commentaire",
        "commentaire_like",
        "oeuvre_note",
        "oeuvre_view",
    ] {
        assert!(table_existe(&pool, table).await, "table manquante: {}", table);
    }
}

#[tokio::test]
async fn test_migration_initiale_appliquee() {
    let pool = pool_migre().await;

    let appliquee = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM _sqlx_migrations WHERE version = 1 AND success = 1",
    )
    .fetch_optional(&pool)
    .await
    .unwrap()
    .is_some();

    assert!(appliquee);
}

#[tokio::test]
async fn test_contraintes_d_unicite() {
    let pool = pool_migre().await;

    // Un seul tag par nom
    sqlx::query("INSERT INTO tag (nom) VALUES ('action')")
        .execute(&pool)
        .await
        .unwrap();
    let doublon = sqlx::query("INSERT INTO tag (nom) VALUES ('action')")
        .execute(&pool)
        .await;
    assert!(doublon.is_err());

    // Un seul compte par email
    sqlx::query("INSERT INTO user (email, nom, mot_de_passe) VALUES ('a@b.fr', 'A', 'x')")
        .execute(&pool)
        .await
        .unwrap();
    let doublon =
        sqlx::query("INSERT INTO user (email, nom, mot_de_passe) VALUES ('a@b.fr', 'B', 'y')")
            .execute(&pool)
            .await;
    assert!(doublon.is_err());
}

#[tokio::test]
async fn test_suppression_d_oeuvre_en_cascade() {
    let pool = pool_migre().await;

    sqlx::query("INSERT INTO auteur (nom) VALUES ('Auteur')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO oeuvre (titre, type, auteur_id) VALUES ('Éphémère', 'manga', 1)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO user (email, nom, mot_de_passe) VALUES ('a@b.fr', 'A', 'x')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO chapitre (oeuvre_id, titre, ordre) VALUES (1, 'Un', 1)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO commentaire (oeuvre_id, auteur_id, contenu) VALUES (1, 1, 'Bien')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO commentaire_like (commentaire_id, utilisateur_id) VALUES (1, 1)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO oeuvre_note (oeuvre_id, utilisateur_id, valeur) VALUES (1, 1, 5)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO collection_user (utilisateur_id, oeuvre_id) VALUES (1, 1)")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM oeuvre WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    for table in [
        "chapitre",
        "commentaire",
        "commentaire_like",
        "oeuvre_note",
        "collection_user",
    ] {
        let restes: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(restes, 0, "lignes orphelines dans {}", table);
    }

    // L'auteur et le compte survivent
    let auteurs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auteur")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(auteurs, 1);
}
