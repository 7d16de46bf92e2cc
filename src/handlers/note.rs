use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::UtilisateurCourant;
use crate::handlers::OEUVRE_NON_TROUVEE;
use crate::models::AgregatNotes;
use crate::repo;
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, MessageReponse};

const VALEUR_INVALIDE: &str = "La note doit être comprise entre 1 et 5";

#[derive(Debug, Deserialize, ToSchema)]
pub struct NoterOeuvre {
    pub valeur: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteEnregistree {
    pub message: String,
    pub valeur: i64,
    pub notes: AgregatNotes,
}

/// Note l'œuvre de 1 à 5 pour l'utilisateur courant. Re-noter remplace la
/// note précédente, l'agrégat renvoyé reflète la nouvelle valeur.
#[utoipa::path(
    post,
    path = "/api/oeuvres/{id}/note",
    request_body = NoterOeuvre,
    responses(
        (status = 200, description = "Note enregistrée avec le nouvel agrégat", body = NoteEnregistree),
        (status = 400, description = "Valeur hors de l'échelle 1 à 5", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(payload): JsonCorps<NoterOeuvre>,
) -> Result<Json<NoteEnregistree>, ApiError> {
    let valeur = payload
        .valeur
        .ok_or_else(|| ApiError::BadRequest(VALEUR_INVALIDE.into()))?;
    if !(1..=5).contains(&valeur) {
        return Err(ApiError::BadRequest(VALEUR_INVALIDE.into()));
    }

    if !repo::oeuvre::existe(&state.pool, oeuvre_id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    repo::note::noter(&state.pool, oeuvre_id, utilisateur.id, valeur).await?;
    let notes = repo::note::agreger(&state.pool, oeuvre_id).await?;

    Ok(Json(NoteEnregistree {
        message: "Note enregistrée".into(),
        valeur,
        notes,
    }))
}
