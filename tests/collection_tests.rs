use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::ServiceExt;

use mangatheque::cache::PageCache;
use mangatheque::catalogue::CatalogueAbsent;
use mangatheque::import::ImportTracker;
use mangatheque::state::AppState;

async fn setup() -> (Router, SqlitePool) {
    // Sqlite en mémoire: le schéma est lié à la connexion, on n'en ouvre qu'une.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let state = AppState {
        pool: pool.clone(),
        catalogue: Arc::new(CatalogueAbsent),
        cache_pages: Arc::new(PageCache::new()),
        import: Arc::new(ImportTracker::new()),
    };
    (mangatheque::router(state), pool)
}

fn requete(methode: &str, uri: &str, jeton: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(methode).uri(uri);
    if let Some(jeton) = jeton {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", jeton));
    }
    builder.body(Body::empty()).unwrap()
}

fn requete_json(methode: &str, uri: &str, jeton: Option<&str>, corps: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(methode)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(jeton) = jeton {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", jeton));
    }
    builder.body(Body::from(corps.to_string())).unwrap()
}

async fn lire_json(reponse: axum::response::Response) -> Value {
    let octets = axum::body::to_bytes(reponse.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&octets).unwrap()
}

async fn creer_compte(app: &Router, email: &str) -> String {
    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            "/register",
            None,
            json!({"email": email, "nom": "Collectionneur", "motDePasse": "motdepasse"}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::CREATED);
    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            "/login",
            None,
            json!({"email": email, "motDePasse": "motdepasse"}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);
    lire_json(reponse).await["jeton"].as_str().unwrap().to_string()
}

async fn inserer_oeuvre(pool: &SqlitePool, titre: &str) -> i64 {
    let auteur_id = sqlx::query("INSERT INTO auteur (nom) VALUES ('Auteur')")
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();
    sqlx::query("INSERT INTO oeuvre (titre, type, auteur_id) VALUES (?, 'manhwa', ?)")
        .bind(titre)
        .bind(auteur_id)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

#[tokio::test]
async fn test_sans_jeton() {
    let (app, _pool) = setup().await;

    let reponse = app
        .clone()
        .oneshot(requete("GET", "/api/collection", None))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::UNAUTHORIZED);

    let reponse = app
        .oneshot(requete("POST", "/api/collection/oeuvre/1", None))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ajout_et_liste() {
    let (app, pool) = setup().await;
    let oeuvre = inserer_oeuvre(&pool, "Tower of God").await;
    let jeton = creer_compte(&app, "lecteur@example.com").await;

    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&jeton),
            json!({"notePersonnelle": "à reprendre au tome 3"}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre ajoutée à la collection");

    let corps = lire_json(
        app.oneshot(requete("GET", "/api/collection", Some(&jeton)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    let entree = &corps["collection"][0];
    assert_eq!(entree["oeuvre"]["titre"], "Tower of God");
    assert_eq!(entree["oeuvre"]["type"], "manhwa");
    assert_eq!(entree["notePersonnelle"], "à reprendre au tome 3");
    assert!(entree.get("ajouteLe").is_some());
}

#[tokio::test]
async fn test_ajout_sans_corps() {
    let (app, pool) = setup().await;
    let oeuvre = inserer_oeuvre(&pool, "Solo Leveling").await;
    let jeton = creer_compte(&app, "lecteur@example.com").await;

    // Le corps est facultatif
    let reponse = app
        .clone()
        .oneshot(requete(
            "POST",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&jeton),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);

    let corps = lire_json(
        app.oneshot(requete("GET", "/api/collection", Some(&jeton)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    assert!(corps["collection"][0].get("notePersonnelle").is_none());
}

#[tokio::test]
async fn test_ajout_oeuvre_inconnue() {
    let (app, _pool) = setup().await;
    let jeton = creer_compte(&app, "lecteur@example.com").await;

    let reponse = app
        .oneshot(requete("POST", "/api/collection/oeuvre/999", Some(&jeton)))
        .await
        .unwrap();

    assert_eq!(reponse.status(), StatusCode::NOT_FOUND);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre non trouvée");
}

#[tokio::test]
async fn test_reajout_met_a_jour_la_note() {
    let (app, pool) = setup().await;
    let oeuvre = inserer_oeuvre(&pool, "The Breaker").await;
    let jeton = creer_compte(&app, "lecteur@example.com").await;

    for note in ["première impression", "relecture prévue"] {
        let reponse = app
            .clone()
            .oneshot(requete_json(
                "POST",
                &format!("/api/collection/oeuvre/{}", oeuvre),
                Some(&jeton),
                json!({"notePersonnelle": note}),
            ))
            .await
            .unwrap();
        assert_eq!(reponse.status(), StatusCode::OK);
    }

    // Une seule entrée, la note remplacée
    let lignes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM collection_user")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lignes, 1);
    let corps = lire_json(
        app.oneshot(requete("GET", "/api/collection", Some(&jeton)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["collection"][0]["notePersonnelle"], "relecture prévue");
}

#[tokio::test]
async fn test_retrait() {
    let (app, pool) = setup().await;
    let oeuvre = inserer_oeuvre(&pool, "Noblesse").await;
    let jeton = creer_compte(&app, "lecteur@example.com").await;

    let reponse = app
        .clone()
        .oneshot(requete(
            "POST",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&jeton),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);

    let reponse = app
        .clone()
        .oneshot(requete(
            "DELETE",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&jeton),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre retirée de la collection");

    // Retirer une œuvre absente répond 404
    let reponse = app
        .clone()
        .oneshot(requete(
            "DELETE",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&jeton),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::NOT_FOUND);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre absente de la collection");

    let corps = lire_json(
        app.oneshot(requete("GET", "/api/collection", Some(&jeton)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["total"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_collections_cloisonnees() {
    let (app, pool) = setup().await;
    let oeuvre = inserer_oeuvre(&pool, "Bastard").await;
    let premier = creer_compte(&app, "premier@example.com").await;
    let second = creer_compte(&app, "second@example.com").await;

    let reponse = app
        .clone()
        .oneshot(requete(
            "POST",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&premier),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);

    let corps = lire_json(
        app.oneshot(requete("GET", "/api/collection", Some(&second)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["total"].as_i64().unwrap(), 0);
}
