use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

/// Commentaire enrichi pour l'affichage: auteur joint, décompte de likes et
/// indicateur « aimé par le lecteur courant ». `aime` reste faux pour un
/// lecteur anonyme (le bind NULL ne matche aucune ligne de like).
#[derive(Debug, FromRow)]
pub struct CommentaireRow {
    pub id: i64,
    pub contenu: String,
    pub parent_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub auteur_id: i64,
    pub auteur_nom: String,
    pub likes: i64,
    pub aime: bool,
}

const SELECT_ENRICHI: &str = "SELECT c.id, c.contenu, c.parent_id, c.created_at, \
     u.id AS auteur_id, u.nom AS auteur_nom, \
     (SELECT COUNT(*) FROM commentaire_like cl WHERE cl.commentaire_id = c.id) AS likes, \
     EXISTS(SELECT 1 FROM commentaire_like cl WHERE cl.commentaire_id = c.id \
            AND cl.utilisateur_id = ?) AS aime \
     FROM commentaire c JOIN user u ON u.id = c.auteur_id";

/// Tous les commentaires d'une œuvre, du plus récent au plus ancien.
/// Le découpage racines/réponses se fait côté appelant.
pub async fn pour_oeuvre(
    pool: &SqlitePool,
    oeuvre_id: i64,
    lecteur: Option<i64>,
) -> Result<Vec<CommentaireRow>, sqlx::Error> {
    let sql = format!("{SELECT_ENRICHI} WHERE c.oeuvre_id = ? ORDER BY c.created_at DESC, c.id DESC");
    sqlx::query_as::<_, CommentaireRow>(&sql)
        .bind(lecteur)
        .bind(oeuvre_id)
        .fetch_all(pool)
        .await
}

pub async fn par_id(
    pool: &SqlitePool,
    id: i64,
    lecteur: Option<i64>,
) -> Result<Option<CommentaireRow>, sqlx::Error> {
    let sql = format!("{SELECT_ENRICHI} WHERE c.id = ?");
    sqlx::query_as::<_, CommentaireRow>(&sql)
        .bind(lecteur)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Œuvre à laquelle le commentaire appartient, ou None s'il n'existe pas.
pub async fn oeuvre_du(pool: &SqlitePool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT oeuvre_id FROM commentaire WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn existe(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    Ok(oeuvre_du(pool, id).await?.is_some())
}

pub async fn creer(
    pool: &SqlitePool,
    oeuvre_id: i64,
    auteur_id: i64,
    parent_id: Option<i64>,
    contenu: &str,
) -> Result<i64, sqlx::Error> {
    let resultat = sqlx::query(
        "INSERT INTO commentaire (oeuvre_id, auteur_id, parent_id, contenu) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(oeuvre_id)
    .bind(auteur_id)
    .bind(parent_id)
    .bind(contenu)
    .execute(pool)
    .await?;
    Ok(resultat.last_insert_rowid())
}

/// Bascule le like de l'utilisateur sur le commentaire et renvoie l'état
/// final (true = aimé). L'unicité (commentaire_id, utilisateur_id) garantit
/// au plus une ligne par couple.
pub async fn basculer_like(
    pool: &SqlitePool,
    commentaire_id: i64,
    utilisateur_id: i64,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let retire = sqlx::query(
        "DELETE FROM commentaire_like WHERE commentaire_id = ? AND utilisateur_id = ?",
    )
    .bind(commentaire_id)
    .bind(utilisateur_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let aime = if retire == 0 {
        sqlx::query(
            "INSERT OR IGNORE INTO commentaire_like (commentaire_id, utilisateur_id) \
             VALUES (?, ?)",
        )
        .bind(commentaire_id)
        .bind(utilisateur_id)
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };
    tx.commit().await?;
    Ok(aime)
}
