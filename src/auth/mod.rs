pub mod middleware;
pub mod password;
pub mod session;

use crate::utils::response::ApiError;

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Utilisateur résolu par le middleware d'authentification et injecté dans
/// les extensions de requête.
#[derive(Debug, Clone)]
pub struct UtilisateurCourant {
    pub id: i64,
    pub email: String,
    pub nom: String,
    pub roles: Vec<String>,
}

impl UtilisateurCourant {
    pub fn est_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ROLE_ADMIN)
    }
}

pub fn exiger_admin(utilisateur: &UtilisateurCourant) -> Result<(), ApiError> {
    if utilisateur.est_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
