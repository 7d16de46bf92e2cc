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

async fn creer_compte(app: &Router, pool: &SqlitePool, email: &str, admin: bool) -> String {
    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            "/register",
            None,
            json!({"email": email, "nom": "Testeur", "motDePasse": "motdepasse"}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::CREATED);

    if admin {
        sqlx::query("UPDATE user SET roles = ? WHERE email = ?")
            .bind(r#"["ROLE_USER","ROLE_ADMIN"]"#)
            .bind(email)
            .execute(pool)
            .await
            .unwrap();
    }

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

async fn inserer_auteur(pool: &SqlitePool, nom: &str) -> i64 {
    sqlx::query("INSERT INTO auteur (nom) VALUES (?)")
        .bind(nom)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn inserer_oeuvre(pool: &SqlitePool, titre: &str, type_oeuvre: &str, auteur_id: i64) -> i64 {
    sqlx::query("INSERT INTO oeuvre (titre, type, auteur_id) VALUES (?, ?, ?)")
        .bind(titre)
        .bind(type_oeuvre)
        .bind(auteur_id)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn inserer_tag(pool: &SqlitePool, nom: &str) -> i64 {
    sqlx::query("INSERT INTO tag (nom) VALUES (?)")
        .bind(nom)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn lier_tag(pool: &SqlitePool, oeuvre_id: i64, tag_id: i64) {
    sqlx::query("INSERT INTO oeuvre_tag (oeuvre_id, tag_id) VALUES (?, ?)")
        .bind(oeuvre_id)
        .bind(tag_id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_liste_vide() {
    let (app, _pool) = setup().await;

    let reponse = app.oneshot(requete("GET", "/oeuvres", None)).await.unwrap();

    assert_eq!(reponse.status(), StatusCode::OK);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["oeuvres"].as_array().unwrap().len(), 0);
    assert_eq!(corps["total"].as_i64().unwrap(), 0);
    assert_eq!(corps["page"].as_i64().unwrap(), 1);
    assert_eq!(corps["pages"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_recherche_plein_texte() {
    let (app, pool) = setup().await;
    let oda = inserer_auteur(&pool, "Eiichiro Oda").await;
    let miura = inserer_auteur(&pool, "Kentaro Miura").await;
    let siu = inserer_auteur(&pool, "SIU").await;
    let one_piece = inserer_oeuvre(&pool, "One Piece", "manga", oda).await;
    let berserk = inserer_oeuvre(&pool, "Berserk", "manga", miura).await;
    let tour = inserer_oeuvre(&pool, "Tower of God", "manhwa", siu).await;
    let action = inserer_tag(&pool, "action").await;
    let sombre = inserer_tag(&pool, "sombre").await;
    lier_tag(&pool, one_piece, action).await;
    lier_tag(&pool, tour, action).await;
    lier_tag(&pool, berserk, sombre).await;

    // Par titre, insensible à la casse
    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres?q=PIECE", None)).await.unwrap()).await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    assert_eq!(corps["oeuvres"][0]["titre"], "One Piece");
    assert_eq!(corps["oeuvres"][0]["auteur"], "Eiichiro Oda");
    assert_eq!(corps["oeuvres"][0]["type"], "manga");

    // Par nom d'auteur
    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres?q=miura", None)).await.unwrap()).await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    assert_eq!(corps["oeuvres"][0]["titre"], "Berserk");

    // Par nom de tag
    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres?q=action", None)).await.unwrap()).await;
    assert_eq!(corps["total"].as_i64().unwrap(), 2);

    // Sans correspondance
    let corps = lire_json(app.oneshot(requete("GET", "/oeuvres?q=zzz", None)).await.unwrap()).await;
    assert_eq!(corps["total"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_filtres_structures() {
    let (app, pool) = setup().await;
    let oda = inserer_auteur(&pool, "Eiichiro Oda").await;
    let siu = inserer_auteur(&pool, "SIU").await;
    let one_piece = inserer_oeuvre(&pool, "One Piece", "manga", oda).await;
    let tour = inserer_oeuvre(&pool, "Tower of God", "manhwa", siu).await;
    let action = inserer_tag(&pool, "action").await;
    lier_tag(&pool, tour, action).await;
    let _ = one_piece;

    let corps = lire_json(
        app.clone()
            .oneshot(requete("GET", &format!("/oeuvres?auteur={}", oda), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    assert_eq!(corps["oeuvres"][0]["titre"], "One Piece");

    let corps = lire_json(
        app.clone()
            .oneshot(requete("GET", &format!("/oeuvres?tag={}", action), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    assert_eq!(corps["oeuvres"][0]["titre"], "Tower of God");

    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres?type=manhwa", None)).await.unwrap()).await;
    assert_eq!(corps["total"].as_i64().unwrap(), 1);
    assert_eq!(corps["oeuvres"][0]["type"], "manhwa");

    // Type inconnu refusé
    let reponse = app.oneshot(requete("GET", "/oeuvres?type=roman", None)).await.unwrap();
    assert_eq!(reponse.status(), StatusCode::BAD_REQUEST);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Type d'œuvre inconnu: roman");
}

#[tokio::test]
async fn test_pagination() {
    let (app, pool) = setup().await;
    let auteur = inserer_auteur(&pool, "Prolifique").await;
    for i in 1..=25 {
        inserer_oeuvre(&pool, &format!("Oeuvre {:02}", i), "manga", auteur).await;
    }

    // Taille par défaut: 20
    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres", None)).await.unwrap()).await;
    assert_eq!(corps["oeuvres"].as_array().unwrap().len(), 20);
    assert_eq!(corps["total"].as_i64().unwrap(), 25);
    assert_eq!(corps["pages"].as_i64().unwrap(), 2);

    // Seconde page, tri par titre
    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres?page=2", None)).await.unwrap()).await;
    assert_eq!(corps["oeuvres"].as_array().unwrap().len(), 5);
    assert_eq!(corps["page"].as_i64().unwrap(), 2);
    assert_eq!(corps["oeuvres"][0]["titre"], "Oeuvre 21");

    // La taille est bornée
    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres?taille=0", None)).await.unwrap()).await;
    assert_eq!(corps["oeuvres"].as_array().unwrap().len(), 1);
    assert_eq!(corps["pages"].as_i64().unwrap(), 25);

    let corps = lire_json(app.oneshot(requete("GET", "/oeuvres?taille=500", None)).await.unwrap()).await;
    assert_eq!(corps["oeuvres"].as_array().unwrap().len(), 25);
    assert_eq!(corps["pages"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_detail() {
    let (app, pool) = setup().await;
    let auteur = inserer_auteur(&pool, "Naoki Urasawa").await;
    let oeuvre = inserer_oeuvre(&pool, "Monster", "manga", auteur).await;
    let tag = inserer_tag(&pool, "thriller").await;
    lier_tag(&pool, oeuvre, tag).await;
    for (titre, ordre) in [("Herr Dr. Tenma", 1), ("Kinderheim 511", 2)] {
        sqlx::query("INSERT INTO chapitre (oeuvre_id, titre, ordre) VALUES (?, ?, ?)")
            .bind(oeuvre)
            .bind(titre)
            .bind(ordre)
            .execute(&pool)
            .await
            .unwrap();
    }

    let reponse = app
        .clone()
        .oneshot(requete("GET", &format!("/oeuvres/{}", oeuvre), None))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["titre"], "Monster");
    assert_eq!(corps["type"], "manga");
    assert_eq!(corps["statut"], "en_cours");
    assert_eq!(corps["auteur"]["nom"], "Naoki Urasawa");
    assert_eq!(corps["tags"][0]["nom"], "thriller");
    let chapitres = corps["chapitres"].as_array().unwrap();
    assert_eq!(chapitres.len(), 2);
    assert_eq!(chapitres[0]["ordre"].as_i64().unwrap(), 1);
    assert!(corps.get("createdAt").is_some());
    // La consultation vient d'être journalisée
    assert_eq!(corps["vues"].as_i64().unwrap(), 1);
    // Lecteur anonyme: pas de note ni de collection personnelles
    assert!(corps.get("maNote").is_none());
    assert!(corps.get("dansCollection").is_none());

    // Chaque consultation compte
    let corps = lire_json(
        app.oneshot(requete("GET", &format!("/oeuvres/{}", oeuvre), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["vues"].as_i64().unwrap(), 2);
}

#[tokio::test]
async fn test_detail_inconnue() {
    let (app, _pool) = setup().await;

    let reponse = app.oneshot(requete("GET", "/oeuvres/999", None)).await.unwrap();

    assert_eq!(reponse.status(), StatusCode::NOT_FOUND);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre non trouvée");
}

#[tokio::test]
async fn test_detail_lecteur_connecte() {
    let (app, pool) = setup().await;
    let auteur = inserer_auteur(&pool, "Inio Asano").await;
    let oeuvre = inserer_oeuvre(&pool, "Oyasumi Punpun", "manga", auteur).await;
    let jeton = creer_compte(&app, &pool, "lecteur@example.com", false).await;

    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            &format!("/api/oeuvres/{}/note", oeuvre),
            Some(&jeton),
            json!({"valeur": 4}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);

    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            &format!("/api/collection/oeuvre/{}", oeuvre),
            Some(&jeton),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);

    let corps = lire_json(
        app.clone()
            .oneshot(requete("GET", &format!("/oeuvres/{}", oeuvre), Some(&jeton)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["maNote"].as_i64().unwrap(), 4);
    assert_eq!(corps["dansCollection"], true);
    assert_eq!(corps["notes"]["average"].as_f64().unwrap(), 4.0);
    assert_eq!(corps["notes"]["total"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_creation_reservee_aux_admins() {
    let (app, pool) = setup().await;
    let auteur = inserer_auteur(&pool, "Takehiko Inoue").await;
    let corps_valide = json!({"titre": "Vagabond", "type": "manga", "auteurId": auteur});

    // Sans jeton
    let reponse = app
        .clone()
        .oneshot(requete_json("POST", "/oeuvres", None, corps_valide.clone()))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::UNAUTHORIZED);

    // Lecteur ordinaire
    let lecteur = creer_compte(&app, &pool, "lecteur@example.com", false).await;
    let reponse = app
        .clone()
        .oneshot(requete_json("POST", "/oeuvres", Some(&lecteur), corps_valide.clone()))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::FORBIDDEN);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Accès refusé");

    // Administrateur
    let admin = creer_compte(&app, &pool, "admin@example.com", true).await;
    let tag = inserer_tag(&pool, "seinen").await;
    let reponse = app
        .oneshot(requete_json(
            "POST",
            "/oeuvres",
            Some(&admin),
            json!({
                "titre": "Vagabond",
                "type": "manga",
                "auteurId": auteur,
                "statut": "en_pause",
                "demographie": "seinen",
                "tags": [tag]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::CREATED);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre créée");
    let id = corps["id"].as_i64().unwrap();

    let statut: String = sqlx::query_scalar("SELECT statut FROM oeuvre WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(statut, "en_pause");
    let tags_lies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM oeuvre_tag WHERE oeuvre_id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tags_lies, 1);
}

#[tokio::test]
async fn test_creation_validation() {
    let (app, pool) = setup().await;
    let admin = creer_compte(&app, &pool, "admin@example.com", true).await;
    let auteur = inserer_auteur(&pool, "Quelqu'un").await;

    // Titre blanc et couverture non http(s)
    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            "/oeuvres",
            Some(&admin),
            json!({"titre": "  ", "type": "manga", "auteurId": auteur, "couverture": "ftp://x/y.jpg"}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let corps = lire_json(reponse).await;
    let champs: Vec<&str> = corps["erreurs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["champ"].as_str().unwrap())
        .collect();
    assert_eq!(champs, ["titre", "couverture"]);

    // Auteur inconnu
    let reponse = app
        .clone()
        .oneshot(requete_json(
            "POST",
            "/oeuvres",
            Some(&admin),
            json!({"titre": "Orpheline", "type": "manga", "auteurId": 999}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["erreurs"][0]["champ"], "auteurId");
    assert_eq!(corps["erreurs"][0]["message"], "auteur inconnu");

    // Tag inconnu
    let reponse = app
        .oneshot(requete_json(
            "POST",
            "/oeuvres",
            Some(&admin),
            json!({"titre": "Taguée", "type": "manga", "auteurId": auteur, "tags": [999]}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["erreurs"][0]["champ"], "tags");
}

#[tokio::test]
async fn test_mise_a_jour() {
    let (app, pool) = setup().await;
    let admin = creer_compte(&app, &pool, "admin@example.com", true).await;
    let auteur = inserer_auteur(&pool, "Hiromu Arakawa").await;
    let oeuvre = inserer_oeuvre(&pool, "FMA", "manga", auteur).await;
    let ancien = inserer_tag(&pool, "aventure").await;
    let nouveau = inserer_tag(&pool, "alchimie").await;
    lier_tag(&pool, oeuvre, ancien).await;

    let reponse = app
        .clone()
        .oneshot(requete_json(
            "PATCH",
            &format!("/oeuvres/{}", oeuvre),
            Some(&admin),
            json!({"titre": "Fullmetal Alchemist", "statut": "terminee", "tags": [nouveau]}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre mise à jour");

    let corps = lire_json(
        app.clone()
            .oneshot(requete("GET", &format!("/oeuvres/{}", oeuvre), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["titre"], "Fullmetal Alchemist");
    assert_eq!(corps["statut"], "terminee");
    // Les tags sont remplacés, pas cumulés
    let tags = corps["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["nom"], "alchimie");

    // Corps sans aucun champ
    let reponse = app
        .clone()
        .oneshot(requete_json(
            "PATCH",
            &format!("/oeuvres/{}", oeuvre),
            Some(&admin),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::BAD_REQUEST);

    // Œuvre inconnue
    let reponse = app
        .oneshot(requete_json(
            "PATCH",
            "/oeuvres/999",
            Some(&admin),
            json!({"titre": "Fantôme"}),
        ))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_suppression_en_cascade() {
    let (app, pool) = setup().await;
    let admin = creer_compte(&app, &pool, "admin@example.com", true).await;
    let auteur = inserer_auteur(&pool, "Tsugumi Ohba").await;
    let oeuvre = inserer_oeuvre(&pool, "Death Note", "manga", auteur).await;
    sqlx::query("INSERT INTO chapitre (oeuvre_id, titre, ordre) VALUES (?, 'Ennui', 1)")
        .bind(oeuvre)
        .execute(&pool)
        .await
        .unwrap();

    let reponse = app
        .clone()
        .oneshot(requete("DELETE", &format!("/oeuvres/{}", oeuvre), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::OK);
    let corps = lire_json(reponse).await;
    assert_eq!(corps["message"], "Œuvre supprimée");

    // L'œuvre et ses chapitres ont disparu, l'auteur reste
    let reponse = app
        .clone()
        .oneshot(requete("GET", &format!("/oeuvres/{}", oeuvre), None))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::NOT_FOUND);
    let chapitres: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapitre")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(chapitres, 0);
    let auteurs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auteur")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(auteurs, 1);

    // Une seconde suppression ne trouve plus rien
    let reponse = app
        .oneshot(requete("DELETE", &format!("/oeuvres/{}", oeuvre), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(reponse.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recentes() {
    let (app, pool) = setup().await;
    let auteur = inserer_auteur(&pool, "Divers").await;
    let _ = inserer_oeuvre(&pool, "Ancienne", "manga", auteur).await;
    let _ = inserer_oeuvre(&pool, "Moyenne", "manga", auteur).await;
    let derniere = inserer_oeuvre(&pool, "Dernière", "manga", auteur).await;

    let corps = lire_json(
        app.oneshot(requete("GET", "/oeuvres/recentes?limite=2", None))
            .await
            .unwrap(),
    )
    .await;
    let oeuvres = corps["oeuvres"].as_array().unwrap();
    assert_eq!(oeuvres.len(), 2);
    assert_eq!(oeuvres[0]["id"].as_i64().unwrap(), derniere);
}

#[tokio::test]
async fn test_populaires() {
    let (app, pool) = setup().await;
    let auteur = inserer_auteur(&pool, "Divers").await;
    let phare = inserer_oeuvre(&pool, "La plus lue", "manga", auteur).await;
    let discrete = inserer_oeuvre(&pool, "La discrète", "manga", auteur).await;
    let _ = inserer_oeuvre(&pool, "Jamais ouverte", "manga", auteur).await;

    for _ in 0..3 {
        sqlx::query("INSERT INTO oeuvre_view (oeuvre_id) VALUES (?)")
            .bind(phare)
            .execute(&pool)
            .await
            .unwrap();
    }
    sqlx::query("INSERT INTO oeuvre_view (oeuvre_id) VALUES (?)")
        .bind(discrete)
        .execute(&pool)
        .await
        .unwrap();
    // Vue trop ancienne pour la fenêtre de 30 jours
    sqlx::query("INSERT INTO oeuvre_view (oeuvre_id, viewed_at) VALUES (?, datetime('now', '-60 days'))")
        .bind(phare)
        .execute(&pool)
        .await
        .unwrap();

    let corps = lire_json(app.clone().oneshot(requete("GET", "/oeuvres/populaires", None)).await.unwrap()).await;
    assert_eq!(corps["jours"].as_i64().unwrap(), 30);
    let oeuvres = corps["oeuvres"].as_array().unwrap();
    // Seules les œuvres consultées apparaissent, la plus vue d'abord
    assert_eq!(oeuvres.len(), 2);
    assert_eq!(oeuvres[0]["titre"], "La plus lue");
    assert_eq!(oeuvres[0]["vues"].as_i64().unwrap(), 3);
    assert_eq!(oeuvres[1]["vues"].as_i64().unwrap(), 1);

    // Une fenêtre plus large rattrape la vieille consultation
    let corps = lire_json(
        app.oneshot(requete("GET", "/oeuvres/populaires?jours=365", None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(corps["jours"].as_i64().unwrap(), 365);
    assert_eq!(corps["oeuvres"][0]["vues"].as_i64().unwrap(), 4);
}
