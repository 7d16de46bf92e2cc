use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{password, session, UtilisateurCourant};
use crate::forms::compte::{Connexion, Inscription};
use crate::models::ProfilJson;
use crate::repo;
use crate::state::AppState;
use crate::utils::json::JsonCorps;
use crate::utils::response::{ApiError, ErreurChamp, MessageReponse};

const EMAIL_DEJA_UTILISE: &str = "cette adresse email est déjà utilisée";

#[derive(Debug, Serialize, ToSchema)]
pub struct CompteCree {
    pub message: String,
    pub utilisateur: ProfilJson,
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = Inscription,
    responses(
        (status = 201, description = "Compte créé", body = CompteCree),
        (status = 422, description = "Champs invalides ou email déjà pris", body = MessageReponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonCorps(form): JsonCorps<Inscription>,
) -> Result<(StatusCode, Json<CompteCree>), ApiError> {
    form.valider()?;
    let email = form.email.trim().to_lowercase();

    if repo::utilisateur::par_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::Validation(vec![ErreurChamp::new(
            "email",
            EMAIL_DEJA_UTILISE,
        )]));
    }

    let hash = password::hacher(&form.mot_de_passe).map_err(|e| ApiError::Internal(e.to_string()))?;

    // Deux inscriptions simultanées sur le même email: la seconde échoue sur
    // la contrainte d'unicité et reçoit la même erreur de validation.
    let id = match repo::utilisateur::creer(&state.pool, &email, form.nom.trim(), &hash).await {
        Ok(id) => id,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::Validation(vec![ErreurChamp::new(
                "email",
                EMAIL_DEJA_UTILISE,
            )]));
        }
        Err(e) => return Err(e.into()),
    };

    let utilisateur = repo::utilisateur::par_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::Internal("utilisateur introuvable après inscription".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(CompteCree {
            message: "Compte créé".into(),
            utilisateur: ProfilJson::from(&utilisateur),
        }),
    ))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnexionReussie {
    pub jeton: String,
    pub utilisateur: ProfilJson,
}

/// Échange email et mot de passe contre un jeton de session. Email inconnu
/// et mot de passe erroné répondent le même 401, sans distinction.
#[utoipa::path(
    post,
    path = "/login",
    request_body = Connexion,
    responses(
        (status = 200, description = "Session ouverte, jeton remis une seule fois", body = ConnexionReussie),
        (status = 400, description = "Email ou mot de passe manquant", body = MessageReponse),
        (status = 401, description = "Identifiants invalides", body = MessageReponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonCorps(form): JsonCorps<Connexion>,
) -> Result<Json<ConnexionReussie>, ApiError> {
    form.valider()?;
    let email = form.email.trim().to_lowercase();

    let utilisateur = repo::utilisateur::par_email(&state.pool, &email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !password::verifier(&form.mot_de_passe, &utilisateur.mot_de_passe) {
        return Err(ApiError::Unauthorized);
    }

    let jeton = session::ouvrir(&state.pool, utilisateur.id).await?;

    Ok(Json(ConnexionReussie {
        jeton,
        utilisateur: ProfilJson::from(&utilisateur),
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session fermée", body = MessageReponse),
        (status = 401, description = "Authentification requise", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Extension(_utilisateur): Extension<UtilisateurCourant>,
) -> Result<Json<MessageReponse>, ApiError> {
    let jeton = session::jeton_depuis_entetes(&headers).ok_or(ApiError::Unauthorized)?;
    session::fermer(&state.pool, jeton).await?;
    Ok(Json(MessageReponse::new("Déconnexion réussie")))
}

#[utoipa::path(
    get,
    path = "/moi",
    responses(
        (status = 200, description = "Profil de l'utilisateur courant", body = ProfilJson),
        (status = 401, description = "Authentification requise", body = MessageReponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn moi(
    Extension(utilisateur): Extension<UtilisateurCourant>,
) -> Json<ProfilJson> {
    Json(ProfilJson {
        id: utilisateur.id,
        email: utilisateur.email,
        nom: utilisateur.nom,
        roles: utilisateur.roles,
    })
}
