pub mod auteur;
pub mod chapitre;
pub mod compte;
pub mod oeuvre;
pub mod tag;

pub use auteur::*;
pub use chapitre::*;
pub use compte::*;
pub use oeuvre::*;
pub use tag::*;

use crate::utils::response::{ApiError, ErreurChamp};

pub const DEMOGRAPHIES: &[&str] = &["shonen", "seinen", "shojo", "josei"];
pub const CLASSIFICATIONS: &[&str] = &["tous_publics", "ado", "adulte"];

pub(crate) fn est_blanc(s: &str) -> bool {
    s.trim().is_empty()
}

/// Une URL de couverture ou de page doit être http(s) bien formée.
pub(crate) fn url_http_valide(brut: &str) -> bool {
    match url::Url::parse(brut) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

pub(crate) fn verifier_choix(
    erreurs: &mut Vec<ErreurChamp>,
    champ: &str,
    valeur: &Option<String>,
    choix: &[&str],
) {
    if let Some(v) = valeur {
        if !choix.contains(&v.as_str()) {
            erreurs.push(ErreurChamp::new(
                champ,
                format!("valeur inconnue, attendu l'une de: {}", choix.join(", ")),
            ));
        }
    }
}

pub(crate) fn terminer(erreurs: Vec<ErreurChamp>) -> Result<(), ApiError> {
    if erreurs.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(erreurs))
    }
}
