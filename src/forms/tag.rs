use serde::Deserialize;
use utoipa::ToSchema;

use crate::utils::response::{ApiError, ErreurChamp};

use super::{est_blanc, terminer};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreerTag {
    pub nom: String,
    pub id_externe: Option<String>,
}

impl CreerTag {
    pub fn valider(&self) -> Result<(), ApiError> {
        let mut erreurs = Vec::new();
        if est_blanc(&self.nom) {
            erreurs.push(ErreurChamp::new("nom", "le nom est obligatoire"));
        }
        terminer(erreurs)
    }
}
