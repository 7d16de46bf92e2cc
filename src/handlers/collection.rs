use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::UtilisateurCourant;
use crate::handlers::OEUVRE_NON_TROUVEE;
use crate::models::TypeOeuvre;
use crate::repo;
use crate::state::AppState;
use crate::utils::json::JsonCorpsOptionnel;
use crate::utils::response::{ApiError, MessageReponse};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreDeCollection {
    pub id: i64,
    pub titre: String,
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntreeCollection {
    pub oeuvre: OeuvreDeCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_personnelle: Option<String>,
    pub ajoute_le: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionReponse {
    pub collection: Vec<EntreeCollection>,
    pub total: i64,
}

#[utoipa::path(
    get,
    path = "/api/collection",
    responses(
        (status = 200, description = "Collection personnelle, ajouts récents d'abord", body = CollectionReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_collection(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<CollectionReponse>, ApiError> {
    let lignes = repo::collection::lister(&state.pool, utilisateur.id).await?;
    let collection: Vec<EntreeCollection> = lignes
        .into_iter()
        .map(|ligne| EntreeCollection {
            oeuvre: OeuvreDeCollection {
                id: ligne.oeuvre_id,
                titre: ligne.titre,
                type_oeuvre: ligne.type_oeuvre,
                couverture: ligne.couverture,
            },
            note_personnelle: ligne.note_personnelle,
            ajoute_le: ligne.ajoute_le,
        })
        .collect();
    let total = collection.len() as i64;

    Ok(Json(CollectionReponse { collection, total }))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AjouterCollection {
    pub note_personnelle: Option<String>,
}

/// Ajoute l'œuvre à la collection de l'utilisateur courant. Le corps est
/// facultatif; ré-ajouter une œuvre déjà présente met juste à jour la note
/// personnelle.
#[utoipa::path(
    post,
    path = "/api/collection/oeuvre/{id}",
    request_body = AjouterCollection,
    responses(
        (status = 200, description = "Œuvre ajoutée ou note mise à jour", body = MessageReponse),
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
pub async fn add_collection(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorpsOptionnel(payload): JsonCorpsOptionnel<AjouterCollection>,
) -> Result<Json<MessageReponse>, ApiError> {
    if !repo::oeuvre::existe(&state.pool, oeuvre_id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    let note = payload.and_then(|p| p.note_personnelle);
    repo::collection::ajouter(&state.pool, utilisateur.id, oeuvre_id, note.as_deref()).await?;

    Ok(Json(MessageReponse::new("Œuvre ajoutée à la collection")))
}

#[utoipa::path(
    delete,
    path = "/api/collection/oeuvre/{id}",
    responses(
        (status = 200, description = "Œuvre retirée de la collection", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 404, description = "Œuvre absente de la collection", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_collection(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    if !repo::collection::retirer(&state.pool, utilisateur.id, oeuvre_id).await? {
        return Err(ApiError::NotFound("Œuvre absente de la collection".into()));
    }

    Ok(Json(MessageReponse::new("Œuvre retirée de la collection")))
}
