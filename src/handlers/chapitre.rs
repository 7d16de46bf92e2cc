use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{exiger_admin, UtilisateurCourant};
use crate::forms::chapitre::{CreerChapitre, ModifierChapitre};
use crate::handlers::OEUVRE_NON_TROUVEE;
use crate::models::{Chapitre, Oeuvre};
use crate::repo;
use crate::repo::chapitre::{ChapitreResume, VoisinChapitre};
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, MessageReponse};

const CHAPITRE_NON_TROUVE: &str = "Chapitre non trouvé";

#[derive(Debug, Serialize, ToSchema)]
pub struct ChapitresReponse {
    pub chapitres: Vec<ChapitreResume>,
}

#[utoipa::path(
    get,
    path = "/oeuvres/{id}/chapitres",
    responses(
        (status = 200, description = "Table des matières de l'œuvre", body = ChapitresReponse),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    )
)]
pub async fn list_chapitres(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
) -> Result<Json<ChapitresReponse>, ApiError> {
    if !repo::oeuvre::existe(&state.pool, oeuvre_id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }
    let chapitres = repo::chapitre::pour_oeuvre(&state.pool, oeuvre_id).await?;
    Ok(Json(ChapitresReponse { chapitres }))
}

/// Chapitre en lecture, avec ses voisins pour la navigation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapitreDetail {
    pub id: i64,
    pub oeuvre_id: i64,
    pub titre: String,
    pub ordre: i64,
    pub resume: Option<String>,
    pub pages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precedent: Option<VoisinChapitre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suivant: Option<VoisinChapitre>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Planches du chapitre: celles stockées en base, sinon celles du catalogue
/// externe quand l'œuvre et le chapitre portent une référence externe.
/// Un catalogue injoignable laisse la liste vide plutôt que d'échouer.
async fn resoudre_pages(state: &AppState, oeuvre: &Oeuvre, chapitre: &Chapitre) -> Vec<String> {
    if !chapitre.pages.0.is_empty() {
        return chapitre.pages.0.clone();
    }

    let (Some(oeuvre_externe), Some(chapitre_externe)) =
        (oeuvre.id_externe.as_deref(), chapitre.id_externe.as_deref())
    else {
        return Vec::new();
    };

    if let Some(pages) = state.cache_pages.get(chapitre.id).await {
        return pages;
    }

    match state
        .catalogue
        .pages_chapitre(oeuvre_externe, chapitre_externe)
        .await
    {
        Ok(pages) => {
            state.cache_pages.set(chapitre.id, pages.clone()).await;
            pages
        }
        Err(e) => {
            tracing::warn!(
                "Pages du chapitre {} indisponibles via le catalogue: {}",
                chapitre.id,
                e
            );
            Vec::new()
        }
    }
}

#[utoipa::path(
    get,
    path = "/chapitres/{id}",
    responses(
        (status = 200, description = "Chapitre avec planches et navigation", body = ChapitreDetail),
        (status = 404, description = "Chapitre inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant du chapitre")
    )
)]
pub async fn get_chapitre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ChapitreDetail>, ApiError> {
    let chapitre = repo::chapitre::par_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(CHAPITRE_NON_TROUVE.into()))?;
    let oeuvre = repo::oeuvre::par_id(&state.pool, chapitre.oeuvre_id)
        .await?
        .ok_or_else(|| ApiError::Internal("œuvre manquante pour un chapitre existant".into()))?;

    let precedent =
        repo::chapitre::precedent(&state.pool, chapitre.oeuvre_id, chapitre.ordre).await?;
    let suivant = repo::chapitre::suivant(&state.pool, chapitre.oeuvre_id, chapitre.ordre).await?;
    let pages = resoudre_pages(&state, &oeuvre, &chapitre).await;

    Ok(Json(ChapitreDetail {
        id: chapitre.id,
        oeuvre_id: chapitre.oeuvre_id,
        titre: chapitre.titre,
        ordre: chapitre.ordre,
        resume: chapitre.resume,
        pages,
        precedent,
        suivant,
        created_at: chapitre.created_at,
        updated_at: chapitre.updated_at,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChapitreCree {
    pub message: String,
    pub id: i64,
}

#[utoipa::path(
    post,
    path = "/oeuvres/{id}/chapitres",
    request_body = CreerChapitre,
    responses(
        (status = 201, description = "Chapitre créé", body = ChapitreCree),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse),
        (status = 422, description = "Champs invalides", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_chapitre(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<CreerChapitre>,
) -> Result<(StatusCode, Json<ChapitreCree>), ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;

    if !repo::oeuvre::existe(&state.pool, oeuvre_id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    let id = repo::chapitre::creer(&state.pool, oeuvre_id, &form).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChapitreCree {
            message: "Chapitre créé".into(),
            id,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/chapitres/{id}",
    request_body = ModifierChapitre,
    responses(
        (status = 200, description = "Chapitre mis à jour", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Chapitre inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant du chapitre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_chapitre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<ModifierChapitre>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;

    if !repo::chapitre::modifier(&state.pool, id, &form).await? {
        return Err(ApiError::NotFound(CHAPITRE_NON_TROUVE.into()));
    }

    // Les planches ont pu changer, l'entrée de cache ne vaut plus rien.
    if form.pages.is_some() {
        state.cache_pages.invalider(id).await;
    }

    Ok(Json(MessageReponse::new("Chapitre mis à jour")))
}

#[utoipa::path(
    delete,
    path = "/chapitres/{id}",
    responses(
        (status = 200, description = "Chapitre supprimé", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Chapitre inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant du chapitre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_chapitre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;

    if !repo::chapitre::supprimer(&state.pool, id).await? {
        return Err(ApiError::NotFound(CHAPITRE_NON_TROUVE.into()));
    }
    state.cache_pages.invalider(id).await;

    Ok(Json(MessageReponse::new("Chapitre supprimé")))
}
