use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::utils::response::{ApiError, ErreurChamp};

use super::{est_blanc, terminer};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreerAuteur {
    pub nom: String,
    pub pseudonyme: Option<String>,
    pub biographie: Option<String>,
    pub nationalite: Option<String>,
    pub date_naissance: Option<NaiveDate>,
}

impl CreerAuteur {
    pub fn valider(&self) -> Result<(), ApiError> {
        let mut erreurs = Vec::new();
        if est_blanc(&self.nom) {
            erreurs.push(ErreurChamp::new("nom", "le nom est obligatoire"));
        }
        terminer(erreurs)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifierAuteur {
    pub nom: Option<String>,
    pub pseudonyme: Option<String>,
    pub biographie: Option<String>,
    pub nationalite: Option<String>,
    pub date_naissance: Option<NaiveDate>,
}

impl ModifierAuteur {
    pub fn valider(&self) -> Result<(), ApiError> {
        if self.nom.is_none()
            && self.pseudonyme.is_none()
            && self.biographie.is_none()
            && self.nationalite.is_none()
            && self.date_naissance.is_none()
        {
            return Err(ApiError::BadRequest("Au moins un champ requis".into()));
        }

        let mut erreurs = Vec::new();
        if let Some(nom) = &self.nom {
            if est_blanc(nom) {
                erreurs.push(ErreurChamp::new("nom", "le nom ne peut pas être vide"));
            }
        }
        terminer(erreurs)
    }
}
