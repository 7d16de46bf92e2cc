use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::forms;
use crate::handlers;
use crate::import;
use crate::models;
use crate::repo;
use crate::utils::response::{ErreurChamp, MessageReponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mangathèque API",
        description = "A self-hosted REST API to catalog manga, manhwa and novels.",
        version = "1.0.0"
    ),
    servers(
        (url = "http://localhost:7784", description = "Local development server")
    ),
    paths(
        handlers::oeuvre::list_oeuvres,
        handlers::oeuvre::list_recentes,
        handlers::oeuvre::list_populaires,
        handlers::oeuvre::get_oeuvre,
        handlers::oeuvre::create_oeuvre,
        handlers::oeuvre::update_oeuvre,
        handlers::oeuvre::delete_oeuvre,
        handlers::chapitre::list_chapitres,
        handlers::chapitre::get_chapitre,
        handlers::chapitre::create_chapitre,
        handlers::chapitre::update_chapitre,
        handlers::chapitre::delete_chapitre,
        handlers::auteur::list_auteurs,
        handlers::auteur::get_auteur,
        handlers::auteur::create_auteur,
        handlers::auteur::update_auteur,
        handlers::auteur::delete_auteur,
        handlers::tag::list_tags,
        handlers::tag::create_tag,
        handlers::tag::delete_tag,
        handlers::commentaire::list_commentaires,
        handlers::commentaire::create_commentaire,
        handlers::commentaire::create_reponse,
        handlers::commentaire::toggle_like,
        handlers::note::create_note,
        handlers::collection::list_collection,
        handlers::collection::add_collection,
        handlers::collection::remove_collection,
        handlers::compte::register,
        handlers::compte::login,
        handlers::compte::logout,
        handlers::compte::moi,
        handlers::admin::start_import,
        handlers::admin::import_status,
    ),
    components(
        schemas(
            models::Oeuvre,
            models::TypeOeuvre,
            models::Statut,
            models::Auteur,
            models::Chapitre,
            models::Tag,
            models::AgregatNotes,
            models::ProfilJson,
            forms::CreerOeuvre,
            forms::ModifierOeuvre,
            forms::CreerAuteur,
            forms::ModifierAuteur,
            forms::CreerChapitre,
            forms::ModifierChapitre,
            forms::CreerTag,
            forms::Inscription,
            forms::Connexion,
            repo::oeuvre::OeuvreListItem,
            repo::oeuvre::OeuvrePopulaire,
            repo::auteur::OeuvreResume,
            repo::chapitre::ChapitreResume,
            repo::chapitre::VoisinChapitre,
            handlers::oeuvre::ParamsRecherche,
            handlers::oeuvre::PageOeuvres,
            handlers::oeuvre::OeuvresReponse,
            handlers::oeuvre::PopulairesReponse,
            handlers::oeuvre::OeuvreDetail,
            handlers::oeuvre::AuteurResume,
            handlers::oeuvre::OeuvreCreee,
            handlers::chapitre::ChapitresReponse,
            handlers::chapitre::ChapitreDetail,
            handlers::chapitre::ChapitreCree,
            handlers::auteur::AuteursReponse,
            handlers::auteur::AuteurDetail,
            handlers::auteur::AuteurCree,
            handlers::tag::TagsReponse,
            handlers::tag::TagCree,
            handlers::commentaire::CommentaireJson,
            handlers::commentaire::AuteurCommentaire,
            handlers::commentaire::ListeCommentaires,
            handlers::commentaire::CreerCommentaire,
            handlers::commentaire::CommentaireCree,
            handlers::commentaire::CreerReponse,
            handlers::commentaire::ReponseCreee,
            handlers::note::NoterOeuvre,
            handlers::note::NoteEnregistree,
            handlers::collection::CollectionReponse,
            handlers::collection::EntreeCollection,
            handlers::collection::OeuvreDeCollection,
            handlers::collection::AjouterCollection,
            handlers::compte::CompteCree,
            handlers::compte::ConnexionReussie,
            handlers::admin::DemandeImport,
            import::EtatImport,
            MessageReponse,
            ErreurChamp,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("opaque")
                    .build(),
            ),
        )
    }
}
