use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::session;
use crate::state::AppState;
use crate::utils::response::ApiError;

/// Exige une session valide et place l'[`UtilisateurCourant`] dans les
/// extensions de la requête. Jeton absent, mal formé ou expiré: 401.
///
/// [`UtilisateurCourant`]: crate::auth::UtilisateurCourant
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jeton = session::jeton_depuis_entetes(req.headers()).ok_or(ApiError::Unauthorized)?;
    let utilisateur = session::utilisateur_par_jeton(&state.pool, jeton)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(utilisateur);
    Ok(next.run(req).await)
}
