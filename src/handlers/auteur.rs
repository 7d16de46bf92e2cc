use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{exiger_admin, UtilisateurCourant};
use crate::forms::auteur::{CreerAuteur, ModifierAuteur};
use crate::models::Auteur;
use crate::repo;
use crate::repo::auteur::OeuvreResume;
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, MessageReponse};

const AUTEUR_NON_TROUVE: &str = "Auteur non trouvé";

#[derive(Debug, Serialize, ToSchema)]
pub struct AuteursReponse {
    pub auteurs: Vec<Auteur>,
}

#[utoipa::path(
    get,
    path = "/auteurs",
    responses(
        (status = 200, description = "Auteurs par ordre alphabétique", body = AuteursReponse)
    )
)]
pub async fn list_auteurs(
    State(state): State<AppState>,
) -> Result<Json<AuteursReponse>, ApiError> {
    let auteurs = repo::auteur::lister(&state.pool).await?;
    Ok(Json(AuteursReponse { auteurs }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuteurDetail {
    #[serde(flatten)]
    pub auteur: Auteur,
    pub oeuvres: Vec<OeuvreResume>,
}

#[utoipa::path(
    get,
    path = "/auteurs/{id}",
    responses(
        (status = 200, description = "Fiche de l'auteur avec ses œuvres", body = AuteurDetail),
        (status = 404, description = "Auteur inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'auteur")
    )
)]
pub async fn get_auteur(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuteurDetail>, ApiError> {
    let auteur = repo::auteur::par_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(AUTEUR_NON_TROUVE.into()))?;
    let oeuvres = repo::auteur::oeuvres_de(&state.pool, id).await?;
    Ok(Json(AuteurDetail { auteur, oeuvres }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuteurCree {
    pub message: String,
    pub id: i64,
}

#[utoipa::path(
    post,
    path = "/auteurs",
    request_body = CreerAuteur,
    responses(
        (status = 201, description = "Auteur créé", body = AuteurCree),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 422, description = "Champs invalides", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_auteur(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<CreerAuteur>,
) -> Result<(StatusCode, Json<AuteurCree>), ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;

    let id = repo::auteur::creer(&state.pool, &form).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuteurCree {
            message: "Auteur créé".into(),
            id,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/auteurs/{id}",
    request_body = ModifierAuteur,
    responses(
        (status = 200, description = "Auteur mis à jour", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Auteur inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'auteur")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_auteur(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<ModifierAuteur>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;

    if !repo::auteur::modifier(&state.pool, id, &form).await? {
        return Err(ApiError::NotFound(AUTEUR_NON_TROUVE.into()));
    }

    Ok(Json(MessageReponse::new("Auteur mis à jour")))
}

/// Refuse la suppression tant que des œuvres référencent l'auteur; elles
/// doivent être réaffectées ou supprimées d'abord.
#[utoipa::path(
    delete,
    path = "/auteurs/{id}",
    responses(
        (status = 200, description = "Auteur supprimé", body = MessageReponse),
        (status = 400, description = "L'auteur a encore des œuvres", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Auteur inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'auteur")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_auteur(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;

    if !repo::auteur::existe(&state.pool, id).await? {
        return Err(ApiError::NotFound(AUTEUR_NON_TROUVE.into()));
    }

    let oeuvres = repo::auteur::nombre_oeuvres(&state.pool, id).await?;
    if oeuvres > 0 {
        return Err(ApiError::BadRequest(format!(
            "Impossible de supprimer l'auteur: {} œuvre(s) lui sont encore rattachées",
            oeuvres
        )));
    }

    repo::auteur::supprimer(&state.pool, id).await?;
    Ok(Json(MessageReponse::new("Auteur supprimé")))
}
