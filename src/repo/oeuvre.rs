use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::{FromRow, QueryBuilder, Sqlite};
use utoipa::ToSchema;

use crate::forms::oeuvre::{CreerOeuvre, ModifierOeuvre};
use crate::models::{Oeuvre, Statut, TypeOeuvre};

/// Critères de recherche du catalogue. Tous optionnels, cumulés en AND.
#[derive(Debug, Default)]
pub struct FiltresOeuvre {
    pub q: Option<String>,
    pub auteur: Option<i64>,
    pub tag: Option<i64>,
    pub type_oeuvre: Option<TypeOeuvre>,
}

/// Ligne de liste: l'œuvre avec son auteur et ses agrégats, prête à sérialiser.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreListItem {
    pub id: i64,
    pub titre: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
    pub statut: Statut,
    pub auteur: String,
    pub note_moyenne: f64,
    pub nombre_chapitres: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OeuvrePopulaire {
    pub id: i64,
    pub titre: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
    pub statut: Statut,
    pub auteur: String,
    pub vues: i64,
}

const SELECT_LISTE: &str = "SELECT o.id, o.titre, o.type, o.couverture, o.statut, a.nom AS auteur, \
     ROUND(COALESCE((SELECT AVG(n.valeur) FROM oeuvre_note n WHERE n.oeuvre_id = o.id), 0), 1) AS note_moyenne, \
     (SELECT COUNT(*) FROM chapitre c WHERE c.oeuvre_id = o.id) AS nombre_chapitres \
     FROM oeuvre o JOIN auteur a ON a.id = o.auteur_id WHERE 1=1";

/// Ajoute les prédicats de `filtres` à une requête se terminant par `WHERE 1=1`.
/// Le texte libre cherche dans le titre, le nom d'auteur et les noms de tags.
fn appliquer_filtres<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filtres: &'a FiltresOeuvre) {
    if let Some(q) = &filtres.q {
        let motif = format!("%{}%", q.trim().to_lowercase());
        qb.push(" AND (LOWER(o.titre) LIKE ")
            .push_bind(motif.clone())
            .push(" OR LOWER(a.nom) LIKE ")
            .push_bind(motif.clone())
            .push(
                " OR EXISTS (SELECT 1 FROM oeuvre_tag ot JOIN tag t ON t.id = ot.tag_id \
                 WHERE ot.oeuvre_id = o.id AND LOWER(t.nom) LIKE ",
            )
            .push_bind(motif)
            .push("))");
    }
    if let Some(auteur_id) = filtres.auteur {
        qb.push(" AND o.auteur_id = ").push_bind(auteur_id);
    }
    if let Some(tag_id) = filtres.tag {
        qb.push(" AND EXISTS (SELECT 1 FROM oeuvre_tag ot WHERE ot.oeuvre_id = o.id AND ot.tag_id = ")
            .push_bind(tag_id)
            .push(")");
    }
    if let Some(type_oeuvre) = filtres.type_oeuvre {
        qb.push(" AND o.type = ").push_bind(type_oeuvre);
    }
}

pub async fn rechercher(
    pool: &SqlitePool,
    filtres: &FiltresOeuvre,
    taille: i64,
    offset: i64,
) -> Result<Vec<OeuvreListItem>, sqlx::Error> {
    let mut qb = QueryBuilder::new(SELECT_LISTE);
    appliquer_filtres(&mut qb, filtres);
    qb.push(" ORDER BY o.titre COLLATE NOCASE ASC, o.id ASC LIMIT ")
        .push_bind(taille)
        .push(" OFFSET ")
        .push_bind(offset);
    qb.build_query_as::<OeuvreListItem>().fetch_all(pool).await
}

pub async fn compter(pool: &SqlitePool, filtres: &FiltresOeuvre) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM oeuvre o JOIN auteur a ON a.id = o.auteur_id WHERE 1=1",
    );
    appliquer_filtres(&mut qb, filtres);
    let (total,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(total)
}

pub async fn recentes(pool: &SqlitePool, limite: i64) -> Result<Vec<OeuvreListItem>, sqlx::Error> {
    let sql = format!("{SELECT_LISTE} ORDER BY o.created_at DESC, o.id DESC LIMIT ?");
    sqlx::query_as::<_, OeuvreListItem>(&sql)
        .bind(limite)
        .fetch_all(pool)
        .await
}

/// Classement par nombre de vues sur une fenêtre glissante de `jours` jours.
pub async fn populaires(
    pool: &SqlitePool,
    jours: i64,
    limite: i64,
) -> Result<Vec<OeuvrePopulaire>, sqlx::Error> {
    sqlx::query_as::<_, OeuvrePopulaire>(
        "SELECT o.id, o.titre, o.type, o.couverture, o.statut, a.nom AS auteur, COUNT(v.id) AS vues
         FROM oeuvre o
         JOIN auteur a ON a.id = o.auteur_id
         JOIN oeuvre_view v ON v.oeuvre_id = o.id AND v.viewed_at >= datetime('now', ?)
         GROUP BY o.id, o.titre, o.type, o.couverture, o.statut, a.nom
         ORDER BY vues DESC, o.titre COLLATE NOCASE ASC
         LIMIT ?",
    )
    .bind(format!("-{jours} days"))
    .bind(limite)
    .fetch_all(pool)
    .await
}

pub async fn par_id(pool: &SqlitePool, id: i64) -> Result<Option<Oeuvre>, sqlx::Error> {
    sqlx::query_as::<_, Oeuvre>("SELECT * FROM oeuvre WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn existe(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let trouve: Option<i64> = sqlx::query_scalar("SELECT 1 FROM oeuvre WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(trouve.is_some())
}

/// Insère l'œuvre et ses associations de tags dans une même transaction.
pub async fn creer(pool: &SqlitePool, form: &CreerOeuvre) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let oeuvre_id = sqlx::query(
        "INSERT INTO oeuvre (titre, type, couverture, resume, date_publication, id_externe, \
         statut, demographie, classification, auteur_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(form.titre.trim())
    .bind(form.type_oeuvre)
    .bind(&form.couverture)
    .bind(&form.resume)
    .bind(form.date_publication)
    .bind(&form.id_externe)
    .bind(form.statut.unwrap_or(Statut::EnCours))
    .bind(&form.demographie)
    .bind(&form.classification)
    .bind(form.auteur_id)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for tag_id in &form.tags {
        sqlx::query("INSERT OR IGNORE INTO oeuvre_tag (oeuvre_id, tag_id) VALUES (?, ?)")
            .bind(oeuvre_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(oeuvre_id)
}

/// Mise à jour partielle: seuls les champs fournis sont modifiés. Si `tags`
/// est fourni, l'ensemble des associations est remplacé. Renvoie `false`
/// quand l'œuvre n'existe pas.
pub async fn modifier(
    pool: &SqlitePool,
    id: i64,
    form: &ModifierOeuvre,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut updates: Vec<&str> = Vec::new();
    if form.titre.is_some() {
        updates.push("titre = ?");
    }
    if form.type_oeuvre.is_some() {
        updates.push("type = ?");
    }
    if form.couverture.is_some() {
        updates.push("couverture = ?");
    }
    if form.resume.is_some() {
        updates.push("resume = ?");
    }
    if form.date_publication.is_some() {
        updates.push("date_publication = ?");
    }
    if form.id_externe.is_some() {
        updates.push("id_externe = ?");
    }
    if form.statut.is_some() {
        updates.push("statut = ?");
    }
    if form.demographie.is_some() {
        updates.push("demographie = ?");
    }
    if form.classification.is_some() {
        updates.push("classification = ?");
    }
    if form.auteur_id.is_some() {
        updates.push("auteur_id = ?");
    }
    updates.push("updated_at = CURRENT_TIMESTAMP");

    let sql = format!("UPDATE oeuvre SET {} WHERE id = ?", updates.join(", "));
    let mut query = sqlx::query(&sql);
    if let Some(titre) = &form.titre {
        query = query.bind(titre.trim());
    }
    if let Some(type_oeuvre) = form.type_oeuvre {
        query = query.bind(type_oeuvre);
    }
    if let Some(couverture) = &form.couverture {
        query = query.bind(couverture);
    }
    if let Some(resume) = &form.resume {
        query = query.bind(resume);
    }
    if let Some(date_publication) = form.date_publication {
        query = query.bind(date_publication);
    }
    if let Some(id_externe) = &form.id_externe {
        query = query.bind(id_externe);
    }
    if let Some(statut) = form.statut {
        query = query.bind(statut);
    }
    if let Some(demographie) = &form.demographie {
        query = query.bind(demographie);
    }
    if let Some(classification) = &form.classification {
        query = query.bind(classification);
    }
    if let Some(auteur_id) = form.auteur_id {
        query = query.bind(auteur_id);
    }
    let resultat = query.bind(id).execute(&mut *tx).await?;

    if resultat.rows_affected() == 0 {
        return Ok(false);
    }

    if let Some(tags) = &form.tags {
        sqlx::query("DELETE FROM oeuvre_tag WHERE oeuvre_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag_id in tags {
            sqlx::query("INSERT OR IGNORE INTO oeuvre_tag (oeuvre_id, tag_id) VALUES (?, ?)")
                .bind(id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(true)
}

/// Les chapitres, commentaires, notes et entrées de collection associés
/// partent avec l'œuvre via les cascades du schéma.
pub async fn supprimer(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let resultat = sqlx::query("DELETE FROM oeuvre WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(resultat.rows_affected() > 0)
}

pub async fn id_externe_connu(pool: &SqlitePool, id_externe: &str) -> Result<bool, sqlx::Error> {
    let trouve: Option<i64> = sqlx::query_scalar("SELECT 1 FROM oeuvre WHERE id_externe = ?")
        .bind(id_externe)
        .fetch_optional(pool)
        .await?;
    Ok(trouve.is_some())
}
