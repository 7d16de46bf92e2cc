use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::{exiger_admin, UtilisateurCourant};
use crate::import::{executer_import, EtatImport};
use crate::state::AppState;
use crate::utils::json::JsonCorpsOptionnel;
use crate::utils::response::{ApiError, MessageReponse};

const LIMITE_DEFAUT: usize = 50;
const LIMITE_MAX: usize = 500;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DemandeImport {
    pub limite: Option<usize>,
}

/// Lance l'import massif depuis le catalogue externe en tâche de fond et
/// répond aussitôt 202. L'avancement se suit sur la route de statut.
#[utoipa::path(
    post,
    path = "/admin/import/massive",
    request_body = DemandeImport,
    responses(
        (status = 202, description = "Import lancé en tâche de fond", body = MessageReponse),
        (status = 400, description = "Import déjà en cours ou catalogue non configuré", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn start_import(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorpsOptionnel(demande): JsonCorpsOptionnel<DemandeImport>,
) -> Result<(StatusCode, Json<MessageReponse>), ApiError> {
    exiger_admin(&utilisateur)?;

    if !state.catalogue.est_configure() {
        return Err(ApiError::BadRequest(
            "Aucun catalogue externe n'est configuré".into(),
        ));
    }

    if !state.import.demarrer() {
        return Err(ApiError::BadRequest("Un import est déjà en cours".into()));
    }

    let limite = demande
        .and_then(|d| d.limite)
        .unwrap_or(LIMITE_DEFAUT)
        .clamp(1, LIMITE_MAX);

    tokio::spawn(executer_import(state.clone(), limite));

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageReponse::new("Import massif démarré")),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/import/massive/status",
    responses(
        (status = 200, description = "Avancement de l'import massif", body = EtatImport),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_status(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<EtatImport>, ApiError> {
    exiger_admin(&utilisateur)?;
    Ok(Json(state.import.instantane()))
}
