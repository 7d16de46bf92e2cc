use serde::Deserialize;
use utoipa::ToSchema;

use crate::utils::response::{ApiError, ErreurChamp};

use super::{est_blanc, terminer};

// Contrôle structurel minimal, sans validation RFC complète.
fn email_plausible(email: &str) -> bool {
    let Some((local, domaine)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domaine.contains('.') && !domaine.starts_with('.') && !domaine.ends_with('.')
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inscription {
    pub email: String,
    pub nom: String,
    pub mot_de_passe: String,
}

impl Inscription {
    pub fn valider(&self) -> Result<(), ApiError> {
        let mut erreurs = Vec::new();
        if !email_plausible(&self.email) {
            erreurs.push(ErreurChamp::new("email", "adresse email invalide"));
        }
        if est_blanc(&self.nom) {
            erreurs.push(ErreurChamp::new("nom", "le nom est obligatoire"));
        }
        if self.mot_de_passe.chars().count() < 8 {
            erreurs.push(ErreurChamp::new(
                "motDePasse",
                "le mot de passe doit faire au moins 8 caractères",
            ));
        }
        terminer(erreurs)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Connexion {
    pub email: String,
    pub mot_de_passe: String,
}

impl Connexion {
    pub fn valider(&self) -> Result<(), ApiError> {
        if est_blanc(&self.email) || self.mot_de_passe.is_empty() {
            return Err(ApiError::BadRequest("Email et mot de passe requis".into()));
        }
        Ok(())
    }
}
