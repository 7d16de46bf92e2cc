pub mod auteur;
pub mod chapitre;
pub mod note;
pub mod oeuvre;
pub mod tag;
pub mod utilisateur;

pub use auteur::*;
pub use chapitre::*;
pub use note::*;
pub use oeuvre::*;
pub use tag::*;
pub use utilisateur::*;
