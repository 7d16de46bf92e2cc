use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::{Statut, TypeOeuvre};
use crate::utils::response::{ApiError, ErreurChamp};

use super::{est_blanc, terminer, url_http_valide, verifier_choix, CLASSIFICATIONS, DEMOGRAPHIES};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreerOeuvre {
    pub titre: String,
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
    pub resume: Option<String>,
    pub date_publication: Option<NaiveDate>,
    pub id_externe: Option<String>,
    pub statut: Option<Statut>,
    pub demographie: Option<String>,
    pub classification: Option<String>,
    pub auteur_id: i64,
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl CreerOeuvre {
    pub fn valider(&self) -> Result<(), ApiError> {
        let mut erreurs = Vec::new();

        if est_blanc(&self.titre) {
            erreurs.push(ErreurChamp::new("titre", "le titre est obligatoire"));
        }
        if let Some(url) = &self.couverture {
            if !url_http_valide(url) {
                erreurs.push(ErreurChamp::new("couverture", "URL http(s) invalide"));
            }
        }
        verifier_choix(&mut erreurs, "demographie", &self.demographie, DEMOGRAPHIES);
        verifier_choix(&mut erreurs, "classification", &self.classification, CLASSIFICATIONS);

        terminer(erreurs)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOeuvre {
    pub titre: Option<String>,
    #[serde(rename = "type")]
    pub type_oeuvre: Option<TypeOeuvre>,
    pub couverture: Option<String>,
    pub resume: Option<String>,
    pub date_publication: Option<NaiveDate>,
    pub id_externe: Option<String>,
    pub statut: Option<Statut>,
    pub demographie: Option<String>,
    pub classification: Option<String>,
    pub auteur_id: Option<i64>,
    pub tags: Option<Vec<i64>>,
}

impl ModifierOeuvre {
    pub fn est_vide(&self) -> bool {
        self.titre.is_none()
            && self.type_oeuvre.is_none()
            && self.couverture.is_none()
            && self.resume.is_none()
            && self.date_publication.is_none()
            && self.id_externe.is_none()
            && self.statut.is_none()
            && self.demographie.is_none()
            && self.classification.is_none()
            && self.auteur_id.is_none()
            && self.tags.is_none()
    }

    pub fn valider(&self) -> Result<(), ApiError> {
        if self.est_vide() {
            return Err(ApiError::BadRequest("Au moins un champ requis".into()));
        }

        let mut erreurs = Vec::new();

        if let Some(titre) = &self.titre {
            if est_blanc(titre) {
                erreurs.push(ErreurChamp::new("titre", "le titre ne peut pas être vide"));
            }
        }
        if let Some(url) = &self.couverture {
            if !url_http_valide(url) {
                erreurs.push(ErreurChamp::new("couverture", "URL http(s) invalide"));
            }
        }
        verifier_choix(&mut erreurs, "demographie", &self.demographie, DEMOGRAPHIES);
        verifier_choix(&mut erreurs, "classification", &self.classification, CLASSIFICATIONS);

        terminer(erreurs)
    }
}
