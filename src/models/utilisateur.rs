use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Ligne complète de la table `user`. Le hash du mot de passe et les rôles
/// bruts ne sortent jamais sur le fil : voir [`ProfilJson`].
#[derive(Debug, FromRow)]
pub struct Utilisateur {
    pub id: i64,
    pub email: String,
    pub nom: String,
    pub mot_de_passe: String,
    pub roles: String,
    pub created_at: NaiveDateTime,
}

impl Utilisateur {
    pub fn roles(&self) -> Vec<String> {
        serde_json::from_str(&self.roles).unwrap_or_else(|_| vec!["ROLE_USER".to_string()])
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilJson {
    pub id: i64,
    pub email: String,
    pub nom: String,
    pub roles: Vec<String>,
}

impl From<&Utilisateur> for ProfilJson {
    fn from(u: &Utilisateur) -> Self {
        ProfilJson {
            id: u.id,
            email: u.email.clone(),
            nom: u.nom.clone(),
            roles: u.roles(),
        }
    }
}
