use serde::Deserialize;
use utoipa::ToSchema;

use crate::utils::response::{ApiError, ErreurChamp};

use super::{est_blanc, terminer, url_http_valide};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreerChapitre {
    pub titre: String,
    pub ordre: i64,
    pub resume: Option<String>,
    #[serde(default)]
    pub pages: Vec<String>,
    pub id_externe: Option<String>,
}

impl CreerChapitre {
    pub fn valider(&self) -> Result<(), ApiError> {
        let mut erreurs = Vec::new();
        if est_blanc(&self.titre) {
            erreurs.push(ErreurChamp::new("titre", "le titre est obligatoire"));
        }
        if self.ordre < 1 {
            erreurs.push(ErreurChamp::new("ordre", "l'ordre doit être au moins 1"));
        }
        verifier_pages(&mut erreurs, &self.pages);
        terminer(erreurs)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifierChapitre {
    pub titre: Option<String>,
    pub ordre: Option<i64>,
    pub resume: Option<String>,
    pub pages: Option<Vec<String>>,
    pub id_externe: Option<String>,
}

impl ModifierChapitre {
    pub fn valider(&self) -> Result<(), ApiError> {
        if self.titre.is_none()
            && self.ordre.is_none()
            && self.resume.is_none()
            && self.pages.is_none()
            && self.id_externe.is_none()
        {
            return Err(ApiError::BadRequest("Au moins un champ requis".into()));
        }

        let mut erreurs = Vec::new();
        if let Some(titre) = &self.titre {
            if est_blanc(titre) {
                erreurs.push(ErreurChamp::new("titre", "le titre ne peut pas être vide"));
            }
        }
        if let Some(ordre) = self.ordre {
            if ordre < 1 {
                erreurs.push(ErreurChamp::new("ordre", "l'ordre doit être au moins 1"));
            }
        }
        if let Some(pages) = &self.pages {
            verifier_pages(&mut erreurs, pages);
        }
        terminer(erreurs)
    }
}

fn verifier_pages(erreurs: &mut Vec<ErreurChamp>, pages: &[String]) {
    if let Some(invalide) = pages.iter().find(|p| !url_http_valide(p)) {
        erreurs.push(ErreurChamp::new(
            "pages",
            format!("URL de page invalide: {}", invalide),
        ));
    }
}
