pub mod admin;
pub mod auteur;
pub mod chapitre;
pub mod collection;
pub mod commentaire;
pub mod compte;
pub mod note;
pub mod oeuvre;
pub mod tag;

pub(crate) const OEUVRE_NON_TROUVEE: &str = "Œuvre non trouvée";
