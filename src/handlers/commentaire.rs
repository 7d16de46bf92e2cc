use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::auth::{session, UtilisateurCourant};
use crate::handlers::OEUVRE_NON_TROUVEE;
use crate::models::AgregatNotes;
use crate::repo;
use crate::repo::commentaire::CommentaireRow;
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, MessageReponse};

const PARENT_NON_TROUVE: &str = "Commentaire parent non trouvé";
const CONTENU_VIDE: &str = "Le contenu du commentaire ne peut pas être vide";

#[derive(Debug, Serialize, ToSchema)]
pub struct AuteurCommentaire {
    pub id: i64,
    pub nom: String,
}

/// Commentaire tel qu'exposé par l'API, réponses imbriquées sur un niveau.
/// Seules les racines portent le tableau `reponses`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentaireJson {
    pub id: i64,
    pub contenu: String,
    pub created_at: chrono::NaiveDateTime,
    pub auteur: AuteurCommentaire,
    pub likes: i64,
    pub aime: bool,
    pub is_reponse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reponses: Option<Vec<CommentaireJson>>,
}

fn en_json(ligne: CommentaireRow, reponses: Option<Vec<CommentaireJson>>) -> CommentaireJson {
    CommentaireJson {
        id: ligne.id,
        contenu: ligne.contenu,
        created_at: ligne.created_at,
        auteur: AuteurCommentaire {
            id: ligne.auteur_id,
            nom: ligne.auteur_nom,
        },
        likes: ligne.likes,
        aime: ligne.aime,
        is_reponse: ligne.parent_id.is_some(),
        parent_id: ligne.parent_id,
        reponses,
    }
}

/// Regroupe les lignes (du plus récent au plus ancien) en fils de
/// discussion: racines récentes d'abord, réponses de chaque fil remises
/// dans l'ordre chronologique.
fn assembler_fils(lignes: Vec<CommentaireRow>) -> Vec<CommentaireJson> {
    let mut reponses_par_parent: HashMap<i64, Vec<CommentaireRow>> = HashMap::new();
    let mut racines = Vec::new();
    for ligne in lignes {
        match ligne.parent_id {
            Some(parent) => reponses_par_parent.entry(parent).or_default().push(ligne),
            None => racines.push(ligne),
        }
    }

    racines
        .into_iter()
        .map(|racine| {
            let mut enfants = reponses_par_parent.remove(&racine.id).unwrap_or_default();
            enfants.reverse();
            let enfants = enfants
                .into_iter()
                .map(|enfant| en_json(enfant, None))
                .collect();
            en_json(racine, Some(enfants))
        })
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListeCommentaires {
    pub commentaires: Vec<CommentaireJson>,
    pub notes: AgregatNotes,
    pub total: i64,
}

#[utoipa::path(
    get,
    path = "/api/commentaires/oeuvre/{id}",
    responses(
        (status = 200, description = "Commentaires de l'œuvre avec l'agrégat de notes", body = ListeCommentaires),
        (status = 404, description = "Œuvre inconnue", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    )
)]
pub async fn list_commentaires(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ListeCommentaires>, ApiError> {
    if !repo::oeuvre::existe(&state.pool, oeuvre_id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    let lecteur = session::utilisateur_depuis_entetes(&state.pool, &headers).await?;
    let lignes = repo::commentaire::pour_oeuvre(
        &state.pool,
        oeuvre_id,
        lecteur.as_ref().map(|u| u.id),
    )
    .await?;
    let commentaires = assembler_fils(lignes);
    let notes = repo::note::agreger(&state.pool, oeuvre_id).await?;
    let total = commentaires.len() as i64;

    Ok(Json(ListeCommentaires {
        commentaires,
        notes,
        total,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreerCommentaire {
    pub contenu: Option<String>,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentaireCree {
    pub message: String,
    pub commentaire: CommentaireJson,
}

/// L'authentification est résolue dans le handler et non par le middleware:
/// un contenu vide doit répondre 400 même sans jeton.
#[utoipa::path(
    post,
    path = "/api/commentaires/oeuvre/{id}",
    request_body = CreerCommentaire,
    responses(
        (status = 201, description = "Commentaire créé", body = CommentaireCree),
        (status = 400, description = "Contenu vide ou corps invalide", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 404, description = "Œuvre ou commentaire parent inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant de l'œuvre")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_commentaire(
    State(state): State<AppState>,
    Path(oeuvre_id): Path<i64>,
    headers: HeaderMap,
    JsonCorps(payload): JsonCorps<CreerCommentaire>,
) -> Result<(StatusCode, Json<CommentaireCree>), ApiError> {
    let contenu = payload.contenu.unwrap_or_default();
    let contenu = contenu.trim();
    if contenu.is_empty() {
        return Err(ApiError::BadRequest(CONTENU_VIDE.into()));
    }

    let utilisateur = session::utilisateur_depuis_entetes(&state.pool, &headers)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !repo::oeuvre::existe(&state.pool, oeuvre_id).await? {
        return Err(ApiError::NotFound(OEUVRE_NON_TROUVEE.into()));
    }

    if let Some(parent_id) = payload.parent_id {
        match repo::commentaire::oeuvre_du(&state.pool, parent_id).await? {
            Some(oeuvre_du_parent) if oeuvre_du_parent == oeuvre_id => {}
            _ => return Err(ApiError::NotFound(PARENT_NON_TROUVE.into())),
        }
    }

    let commentaire =
        inserer_et_relire(&state, oeuvre_id, &utilisateur, payload.parent_id, contenu).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentaireCree {
            message: "Commentaire ajouté".into(),
            commentaire,
        }),
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreerReponse {
    pub contenu: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReponseCreee {
    pub message: String,
    pub reponse: CommentaireJson,
}

/// Répond directement à un commentaire existant; l'œuvre est celle du
/// parent. Même ordre de contrôles que la création.
#[utoipa::path(
    post,
    path = "/api/commentaires/{id}/repondre",
    request_body = CreerReponse,
    responses(
        (status = 201, description = "Réponse créée", body = ReponseCreee),
        (status = 400, description = "Contenu vide ou corps invalide", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 404, description = "Commentaire parent inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant du commentaire parent")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_reponse(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
    headers: HeaderMap,
    JsonCorps(payload): JsonCorps<CreerReponse>,
) -> Result<(StatusCode, Json<ReponseCreee>), ApiError> {
    let contenu = payload.contenu.unwrap_or_default();
    let contenu = contenu.trim();
    if contenu.is_empty() {
        return Err(ApiError::BadRequest(CONTENU_VIDE.into()));
    }

    let utilisateur = session::utilisateur_depuis_entetes(&state.pool, &headers)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let oeuvre_id = repo::commentaire::oeuvre_du(&state.pool, parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(PARENT_NON_TROUVE.into()))?;

    let reponse =
        inserer_et_relire(&state, oeuvre_id, &utilisateur, Some(parent_id), contenu).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReponseCreee {
            message: "Réponse ajoutée".into(),
            reponse,
        }),
    ))
}

async fn inserer_et_relire(
    state: &AppState,
    oeuvre_id: i64,
    utilisateur: &UtilisateurCourant,
    parent_id: Option<i64>,
    contenu: &str,
) -> Result<CommentaireJson, ApiError> {
    let id =
        repo::commentaire::creer(&state.pool, oeuvre_id, utilisateur.id, parent_id, contenu)
            .await?;
    let ligne = repo::commentaire::par_id(&state.pool, id, Some(utilisateur.id))
        .await?
        .ok_or_else(|| ApiError::Internal("commentaire introuvable après insertion".into()))?;
    let reponses = if ligne.parent_id.is_none() {
        Some(Vec::new())
    } else {
        None
    };
    Ok(en_json(ligne, reponses))
}

#[utoipa::path(
    post,
    path = "/api/commentaires/{id}/likes",
    responses(
        (status = 200, description = "Like basculé", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse),
        (status = 404, description = "Commentaire inconnu", body = MessageReponse)
    ),
    params(
        ("id" = i64, Path, description = "Identifiant du commentaire")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(commentaire_id): Path<i64>,
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    if !repo::commentaire::existe(&state.pool, commentaire_id).await? {
        return Err(ApiError::NotFound("Commentaire non trouvé".into()));
    }

    repo::commentaire::basculer_like(&state.pool, commentaire_id, utilisateur.id).await?;

    Ok(Json(MessageReponse::new("Like mis à jour")))
}
