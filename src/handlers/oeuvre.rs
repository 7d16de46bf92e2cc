use axum::{
    extract::{Path, Query, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{exiger_admin, session, UtilisateurCourant};
use crate::forms::oeuvre::{CreerOeuvre, ModifierOeuvre};
use crate::handlers::OEUVRE_NON_TROUVEE;
use crate::models::{AgregatNotes, Oeuvre, Statut, Tag, TypeOeuvre};
use crate::repo;
use crate::repo::chapitre::ChapitreResume;
use crate::repo::oeuvre::{FiltresOeuvre, OeuvreListItem, OeuvrePopulaire};
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, ErreurChamp, MessageReponse};

const TAILLE_DEFAUT: i64 = 20;
const TAILLE_MAX: i64 = 100;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParamsRecherche {
    /// Texte cherché dans le titre, le nom d'auteur et les tags.
    pub q: Option<String>,
    pub auteur: Option<i64>,
    pub tag: Option<i64>,
    #[serde(rename = "type")]
    pub type_oeuvre: Option<String>,
    pub page: Option<i64>,
    pub taille: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageOeuvres {
    pub oeuvres: Vec<OeuvreListItem>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[utoipa::path(
    get,
    path = "/oeuvres",
    params(ParamsRecherche),
    responses(
        (status = 200, description = "Recherche paginée dans le catalogue", body = PageOeuvres),
        (status = 400, description = "Paramètre type inconnu", body = MessageReponse)
    )
)]
pub async fn list_oeuvres(
    State(state): State<AppState>,
    Query(params): Query<ParamsRecherche>,
) -> Result<Json<PageOeuvres>, ApiError> {
    let taille = params.taille.unwrap_or(TAILLE_DEFAUT).clamp(1, TAILLE_MAX);
    let page = params.page.unwrap_or(1).max(1);
    let offset = (page - 1) * taille;

    let type_oeuvre = match &params.type_oeuvre {
        Some(brut) => Some(
            serde_json::from_value(serde_json::Value::String(brut.clone()))
                .map_err(|_| ApiError::BadRequest(format!("Type d'œuvre inconnu: {}", brut)))?,
        ),
        None => None,
    };

    let filtres = FiltresOeuvre {
        q: params.q.filter(|q| !q.trim().is_empty()),
        auteur: params.auteur,
        tag: params.tag,
        type_oeuvre,
    };

    let total = repo::oeuvre::compter(&state.pool, &filtres).await?;
    let oeuvres = repo::oeuvre::rechercher(&state.pool, &filtres, taille, offset).await?;
    let pages = if total == 0 { 0 } else { (total + taille - 1) / taille };

    Ok(Json(PageOeuvres {
        oeuvres,
        total,
        page,
        pages,
    }))
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParamsLimite {
    pub limite: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OeuvresReponse {
    pub oeuvres: Vec<OeuvreListItem>,
}

#[utoipa::path(
    get,
    path = "/oeuvres/recentes",
    params(ParamsLimite),
    responses(
        (status = 200, description = "Dernières œuvres ajoutées", body = OeuvresReponse)
    )
)]
pub async fn list_recentes(
    State(state): State<AppState>,
    Query(params): Query<ParamsLimite>,
) -> Result<Json<OeuvresReponse>, ApiError> {
    let limite = params.limite.unwrap_or(10).clamp(1, 50);
    let oeuvres = repo::oeuvre::recentes(&state.pool, limite).await?;
    Ok(Json(OeuvresReponse { oeuvres }))
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParamsPopulaires {
    pub jours: Option<i64>,
    pub limite: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PopulairesReponse {
    pub oeuvres: Vec<OeuvrePopulaire>,
    pub jours: i64,
}

#[utoipa::path(
    get,
    path = "/oeuvres/populaires",
    params(ParamsPopulaires),
    responses(
        (status = 200, description = "Œuvres les plus consultées sur la fenêtre demandée", body = PopulairesReponse)
    )
)]
pub async fn list_populaires(
    State(state): State<AppState>,
    Query(params): Query<ParamsPopulaires>,
) -> Result<Json<PopulairesReponse>, ApiError> {
    let jours = params.jours.unwrap_or(30).clamp(1, 365);
    let limite = params.limite.unwrap_or(10).clamp(1, 50);
    let oeuvres = repo::oeuvre::populaires(&state.pool, jours, limite).await?;
    Ok(Json(PopulairesReponse { oeuvres, jours }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuteurResume {
    pub id: i64,
    pub nom: String,
}

/// Fiche complète d'une œuvre. `maNote` et `dansCollection` ne sont
/// renseignés que pour un lecteur connecté.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreDetail {
    pub id: i64,
    pub titre: String,
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
    pub resume: Option<String>,
    pub date_publication: Option<chrono::NaiveDate>,
    pub id_externe: Option<String>,
    pub statut: Statut,
    pub demographie: Option<String>,
    pub classification: Option<String>,
    pub auteur: AuteurResume,
    pub tags: Vec<Tag>,
    pub chapitres: Vec<ChapitreResume>,
    pub notes: AgregatNotes,
    pub vues: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma_note: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dans_collection: Option<bool>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

fn ip_du_client(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|valeur| valeur.to_str().ok())
        .and_then(|valeur| valeur.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

#[utoipa::path(
    get,
    path = "/oeuvres/{id}",
    responses(
        (status = 200, description = "Fiche de l'œuvre", body = OeuvreDetail),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    )
)]
pub async fn get_oeuvre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<OeuvreDetail>, ApiError> {
    let oeuvre = repo::oeuvre::par_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(OEUVRE_NON_TROUVEE.into()))?;

    let lecteur = session::utilisateur_depuis_entetes(&state.pool, &headers).await?;

    // Chaque consultation de fiche est journalisée, anonyme comprise.
    let ip = ip_du_client(&headers);
    let agent = headers
        .get(USER_AGENT)
        .and_then(|valeur| valeur.to_str().ok())
        .map(String::from);
    repo::vue::enregistrer(
        &state.pool,
        id,
        lecteur.as_ref().map(|u| u.id),
        ip.as_deref(),
        agent.as_deref(),
    )
    .await?;

    let auteur = repo::auteur::par_id(&state.pool, oeuvre.auteur_id)
        .await?
        .ok_or_else(|| ApiError::Internal("auteur manquant pour une œuvre existante".into()))?;
    let tags = repo::tag::pour_oeuvre(&state.pool, id).await?;
    let chapitres = repo::chapitre::pour_oeuvre(&state.pool, id).await?;
    let notes = repo::note::agreger(&state.pool, id).await?;
    let vues = repo::vue::compter(&state.pool, id).await?;

    let (ma_note, dans_collection) = match &lecteur {
        Some(utilisateur) => (
            repo::note::de_lutilisateur(&state.pool, id, utilisateur.id).await?,
            Some(repo::collection::contient(&state.pool, utilisateur.id, id).await?),
        ),
        None => (None, None),
    };

    let Oeuvre {
        id,
        titre,
        type_oeuvre,
        couverture,
        resume,
        date_publication,
        id_externe,
        statut,
        demographie,
        classification,
        created_at,
        updated_at,
        ..
    } = oeuvre;

    Ok(Json(OeuvreDetail {
        id,
        titre,
        type_oeuvre,
        couverture,
        resume,
        date_publication,
        id_externe,
        statut,
        demographie,
        classification,
        auteur: AuteurResume {
            id: auteur.id,
            nom: auteur.nom,
        },
        tags,
        chapitres,
        notes,
        vues,
        ma_note,
        dans_collection,
        created_at,
        updated_at,
    }))
}

async fn verifier_associations(
    state: &AppState,
    auteur_id: Option<i64>,
    tags: Option<&[i64]>,
) -> Result<(), ApiError> {
    let mut erreurs = Vec::new();
    if let Some(auteur_id) = auteur_id {
        if !repo::auteur::existe(&state.pool, auteur_id).await? {
            erreurs.push(ErreurChamp::new("auteurId", "auteur inconnu"));
        }
    }
    if let Some(tags) = tags {
        if !tags.is_empty() {
            let connus = repo::tag::compter_existants(&state.pool, tags).await?;
            if connus != tags.len() as i64 {
                erreurs.push(ErreurChamp::new("tags", "un ou plusieurs tags sont inconnus"));
            }
        }
    }
    if erreurs.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(erreurs))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OeuvreCreee {
    pub message: String,
    pub id: i64,
}

#[utoipa::path(
    post,
    path = "/oeuvres",
    request_body = CreerOeuvre,
    responses(
        (status = 201, description = "Œuvre créée", body = OeuvreCreee),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 422, description = "Champs invalides", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_oeuvre(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<CreerOeuvre>,
) -> Result<(StatusCode, Json<OeuvreCreee>), ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;
    verifier_associations(&state, Some(form.auteur_id), Some(&form.tags)).await?;

    let id = repo::oeuvre::creer(&state.pool, &form).await?;

    Ok((
        StatusCode::CREATED,
        Json(OeuvreCreee {
            message: "Œuvre créée".into(),
            id,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/oeuvres/{id}",
    request_body = ModifierOeuvre,
    responses(
        (status = 200, description = "Œuvre mise à jour", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_oeuvre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<ModifierOeuvre>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;
    verifier_associations(&state, form.auteur_id, form.tags.as_deref()).await?;

    if !repo::oeuvre::modifier(&state.pool, id, &form).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    Ok(Json(MessageReponse::new("Œuvre mise à jour")))
}

#[utoipa::path(
    delete,
    path = "/oeuvres/{id}",
    responses(
        (status = 200, description = "Œuvre supprimée avec ses chapitres, commentaires, notes et entrées de collection", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_oeuvre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;

    if !repo::oeuvre::supprimer(&state.pool, id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    Ok(Json(MessageReponse::new("Œuvre supprimée")))
}
