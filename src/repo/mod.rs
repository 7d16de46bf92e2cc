pub mod auteur;
pub mod chapitre;
pub mod collection;
pub mod commentaire;
pub mod note;
pub mod oeuvre;
pub mod tag;
pub mod utilisateur;
pub mod vue;
