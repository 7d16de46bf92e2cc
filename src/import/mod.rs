use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;
use std::sync::RwLock;
use utoipa::ToSchema;

use crate::catalogue::OeuvreCatalogue;
use crate::models::{Statut, TypeOeuvre};
use crate::repo;
use crate::state::AppState;

/// Photographie de l'import massif en cours ou du dernier terminé,
/// telle que servie par la route de statut.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EtatImport {
    pub actif: bool,
    pub termine: bool,
    pub total: u64,
    pub traites: u64,
    pub importes: u64,
    pub ignores: u64,
    pub erreurs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub enum IssueImport {
    Importee,
    Ignoree,
}

/// Suivi d'avancement partagé entre la tâche d'import et la route de statut.
/// Un seul import à la fois: `demarrer` refuse tant que le précédent court.
pub struct ImportTracker {
    etat: RwLock<EtatImport>,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self {
            etat: RwLock::new(EtatImport::default()),
        }
    }

    /// Tente de prendre la main. Renvoie `false` si un import est déjà actif,
    /// sinon remet les compteurs à zéro et passe en actif.
    pub fn demarrer(&self) -> bool {
        let mut etat = self.etat.write().unwrap();
        if etat.actif {
            return false;
        }
        *etat = EtatImport {
            actif: true,
            ..EtatImport::default()
        };
        true
    }

    pub fn fixer_total(&self, total: u64) {
        self.etat.write().unwrap().total = total;
    }

    pub fn constater(&self, issue: &Result<IssueImport, sqlx::Error>) {
        let mut etat = self.etat.write().unwrap();
        etat.traites += 1;
        match issue {
            Ok(IssueImport::Importee) => etat.importes += 1,
            Ok(IssueImport::Ignoree) => etat.ignores += 1,
            Err(_) => etat.erreurs += 1,
        }
    }

    pub fn terminer(&self, message: String) {
        let mut etat = self.etat.write().unwrap();
        etat.actif = false;
        etat.termine = true;
        etat.message = Some(message);
    }

    pub fn instantane(&self) -> EtatImport {
        self.etat.read().unwrap().clone()
    }
}

impl Default for ImportTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Tâche de fond lancée par la route d'import massif. Récupère la liste du
/// catalogue distant puis importe œuvre par œuvre, en dédoublonnant par
/// référence externe. Chaque échec unitaire est compté sans arrêter le lot.
pub async fn executer_import(state: AppState, limite: usize) {
    tracing::info!("Import massif démarré (limite {})", limite);

    let distantes = match state.catalogue.lister_oeuvres(limite).await {
        Ok(oeuvres) => oeuvres,
        Err(e) => {
            tracing::warn!("Import massif interrompu, catalogue injoignable: {}", e);
            state
                .import
                .terminer(format!("Échec de la récupération du catalogue: {}", e));
            return;
        }
    };

    state.import.fixer_total(distantes.len() as u64);

    for distante in distantes {
        let titre = distante.titre.clone();
        let issue = importer_oeuvre(&state.pool, distante).await;
        if let Err(e) = &issue {
            tracing::warn!("Import de '{}' échoué: {}", titre, e);
        }
        state.import.constater(&issue);
    }

    let bilan = state.import.instantane();
    tracing::info!(
        "Import massif terminé: {} importées, {} ignorées, {} erreurs sur {}",
        bilan.importes,
        bilan.ignores,
        bilan.erreurs,
        bilan.total
    );
    state.import.terminer(format!(
        "{} importées, {} ignorées, {} erreurs",
        bilan.importes, bilan.ignores, bilan.erreurs
    ));
}

/// Importe une œuvre du catalogue: auteur retrouvé ou créé par nom, tags par
/// nom, le tout dans une transaction. Une référence externe déjà en base vaut
/// doublon et l'œuvre est ignorée.
async fn importer_oeuvre(
    pool: &SqlitePool,
    distante: OeuvreCatalogue,
) -> Result<IssueImport, sqlx::Error> {
    if repo::oeuvre::id_externe_connu(pool, &distante.id_externe).await? {
        return Ok(IssueImport::Ignoree);
    }

    let mut tx = pool.begin().await?;

    let nom_auteur = distante.auteur.as_deref().unwrap_or("Inconnu");
    let auteur_id = obtenir_ou_creer_auteur(&mut tx, nom_auteur).await?;

    let oeuvre_id = sqlx::query(
        "INSERT INTO oeuvre (titre, type, couverture, resume, id_externe, statut, auteur_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(distante.titre.trim())
    .bind(distante.type_oeuvre.unwrap_or(TypeOeuvre::Manga))
    .bind(&distante.couverture)
    .bind(&distante.resume)
    .bind(&distante.id_externe)
    .bind(Statut::EnCours)
    .bind(auteur_id)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for nom_tag in &distante.tags {
        let nom_tag = nom_tag.trim();
        if nom_tag.is_empty() {
            continue;
        }
        let tag_id = repo::tag::obtenir_ou_creer(&mut tx, nom_tag, None).await?;
        sqlx::query("INSERT OR IGNORE INTO oeuvre_tag (oeuvre_id, tag_id) VALUES (?, ?)")
            .bind(oeuvre_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(IssueImport::Importee)
}

async fn obtenir_ou_creer_auteur(
    conn: &mut SqliteConnection,
    nom: &str,
) -> Result<i64, sqlx::Error> {
    let existant: Option<i64> = sqlx::query_scalar("SELECT id FROM auteur WHERE nom = ?")
        .bind(nom)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(id) = existant {
        return Ok(id);
    }
    let resultat = sqlx::query("INSERT INTO auteur (nom) VALUES (?)")
        .bind(nom)
        .execute(conn)
        .await?;
    Ok(resultat.last_insert_rowid())
}
