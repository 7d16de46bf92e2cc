//! Alimente une base vide avec un jeu de démonstration: un compte admin,
//! un compte lecteur, quelques auteurs, œuvres, chapitres et tags.
//!
//! Usage: `cargo run --bin fixtures`

use sqlx::sqlite::SqlitePool;
use sqlx::types::Json;

use mangatheque::auth::password;
use mangatheque::config::Config;
use mangatheque::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let pool = db::init_db(&config.database_url).await?;

    let oeuvres: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM oeuvre")
        .fetch_one(&pool)
        .await?;
    if oeuvres > 0 {
        println!("La base contient déjà {} œuvre(s), abandon.", oeuvres);
        return Ok(());
    }

    let admin_mdp = std::env::var("FIXTURES_ADMIN_PASSWORD").unwrap_or_else(|_| "admin1234".into());
    creer_utilisateur(
        &pool,
        "admin@mangatheque.local",
        "Admin",
        &admin_mdp,
        r#"["ROLE_USER","ROLE_ADMIN"]"#,
    )
    .await?;
    creer_utilisateur(
        &pool,
        "lecteur@mangatheque.local",
        "Lecteur",
        "lecteur1234",
        r#"["ROLE_USER"]"#,
    )
    .await?;
    println!("Comptes créés: admin@mangatheque.local / {}, lecteur@mangatheque.local / lecteur1234", admin_mdp);

    let oda = creer_auteur(&pool, "Eiichiro Oda", Some("Japon")).await?;
    let miura = creer_auteur(&pool, "Kentaro Miura", Some("Japon")).await?;
    let siu = creer_auteur(&pool, "SIU", Some("Corée du Sud")).await?;

    let action = creer_tag(&pool, "action").await?;
    let aventure = creer_tag(&pool, "aventure").await?;
    let fantastique = creer_tag(&pool, "fantastique").await?;
    let drame = creer_tag(&pool, "drame").await?;

    let one_piece = creer_oeuvre(
        &pool,
        "One Piece",
        "manga",
        "en_cours",
        oda,
        Some("Luffy prend la mer pour trouver le One Piece et devenir le roi des pirates."),
        &[action, aventure],
    )
    .await?;
    let berserk = creer_oeuvre(
        &pool,
        "Berserk",
        "manga",
        "en_pause",
        miura,
        Some("Guts, mercenaire marqué par le sacrifice, poursuit sa vengeance."),
        &[action, fantastique, drame],
    )
    .await?;
    let tour = creer_oeuvre(
        &pool,
        "Tower of God",
        "manhwa",
        "en_cours",
        siu,
        Some("Bam gravit la Tour pour retrouver Rachel, étage après étage."),
        &[aventure, fantastique],
    )
    .await?;

    for (oeuvre_id, prefixe, nb) in [(one_piece, "one-piece", 3), (berserk, "berserk", 2), (tour, "tower-of-god", 2)] {
        for ordre in 1..=nb {
            creer_chapitre(&pool, oeuvre_id, prefixe, ordre).await?;
        }
    }

    println!("Jeu de démonstration inséré: 3 auteurs, 3 œuvres, 7 chapitres, 4 tags.");
    Ok(())
}

async fn creer_utilisateur(
    pool: &SqlitePool,
    email: &str,
    nom: &str,
    mot_de_passe: &str,
    roles: &str,
) -> anyhow::Result<i64> {
    let hash = password::hacher(mot_de_passe)?;
    let resultat = sqlx::query("INSERT INTO user (email, nom, mot_de_passe, roles) VALUES (?, ?, ?, ?)")
        .bind(email)
        .bind(nom)
        .bind(hash)
        .bind(roles)
        .execute(pool)
        .await?;
    Ok(resultat.last_insert_rowid())
}

async fn creer_auteur(
    pool: &SqlitePool,
    nom: &str,
    nationalite: Option<&str>,
) -> anyhow::Result<i64> {
    let resultat = sqlx::query("INSERT INTO auteur (nom, nationalite) VALUES (?, ?)")
        .bind(nom)
        .bind(nationalite)
        .execute(pool)
        .await?;
    Ok(resultat.last_insert_rowid())
}

async fn creer_tag(pool: &SqlitePool, nom: &str) -> anyhow::Result<i64> {
    let resultat = sqlx::query("INSERT INTO tag (nom) VALUES (?)")
        .bind(nom)
        .execute(pool)
        .await?;
    Ok(resultat.last_insert_rowid())
}

async fn creer_oeuvre(
    pool: &SqlitePool,
    titre: &str,
    type_oeuvre: &str,
    statut: &str,
    auteur_id: i64,
    resume: Option<&str>,
    tags: &[i64],
) -> anyhow::Result<i64> {
    let oeuvre_id = sqlx::query(
        "INSERT INTO oeuvre (titre, type, statut, auteur_id, resume) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(titre)
    .bind(type_oeuvre)
    .bind(statut)
    .bind(auteur_id)
    .bind(resume)
    .execute(pool)
    .await?
    .last_insert_rowid();

    for tag_id in tags {
        sqlx::query("INSERT INTO oeuvre_tag (oeuvre_id, tag_id) VALUES (?, ?)")
            .bind(oeuvre_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
    }
    Ok(oeuvre_id)
}

async fn creer_chapitre(
    pool: &SqlitePool,
    oeuvre_id: i64,
    prefixe: &str,
    ordre: i64,
) -> anyhow::Result<i64> {
    let pages: Vec<String> = (1..=3)
        .map(|page| format!("https://cdn.mangatheque.local/{prefixe}/{ordre}/{page}.jpg"))
        .collect();
    let resultat = sqlx::query(
        "INSERT INTO chapitre (oeuvre_id, titre, ordre, pages) VALUES (?, ?, ?, ?)",
    )
    .bind(oeuvre_id)
    .bind(format!("Chapitre {}", ordre))
    .bind(ordre)
    .bind(Json(pages))
    .execute(pool)
    .await?;
    Ok(resultat.last_insert_rowid())
}
