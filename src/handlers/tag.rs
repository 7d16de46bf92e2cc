use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{exiger_admin, UtilisateurCourant};
use crate::forms::tag::CreerTag;
use crate::models::Tag;
use crate::repo;
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, ErreurChamp, MessageReponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct TagsReponse {
    pub tags: Vec<Tag>,
}

#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "Tags par ordre alphabétique", body = TagsReponse)
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsReponse>, ApiError> {
    let tags = repo::tag::lister(&state.pool).await?;
    Ok(Json(TagsReponse { tags }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagCree {
    pub message: String,
    pub id: i64,
}

#[utoipa::path(
    post,
    path = "/tags",
    request_body = CreerTag,
    responses(
        (status = 201, description = "Tag créé", body = TagCree),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 422, description = "Nom vide ou déjà utilisé", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
    JsonCorps(form): JsonCorps<CreerTag>,
) -> Result<(StatusCode, Json<TagCree>), ApiError> {
    exiger_admin(&utilisateur)?;
    form.valider()?;

    let id = match repo::tag::creer(&state.pool, &form).await {
        Ok(id) => id,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::Validation(vec![ErreurChamp::new(
                "nom",
                "ce tag existe déjà",
            )]));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(TagCree {
            message: "Tag créé".into(),
            id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/tags/{id}",
    responses(
        (status = 200, description = "Tag supprimé et détaché des œuvres", body = MessageReponse),
        (status = 403, description = "Réservé aux administrateurs", body = MessageReponse),
        (status = 404, description = "Tag inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant du tag")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    exiger_admin(&utilisateur)?;

    if !repo::tag::supprimer(&state.pool, id).await? {
        return Err(ApiError::NotFound("Tag non trouvé".into()));
    }

    Ok(Json(MessageReponse::new("Tag supprimé")))
}
