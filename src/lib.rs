pub mod auth;
pub mod cache;
pub mod catalogue;
pub mod config;
pub mod db;
pub mod forms;
pub mod handlers;
pub mod import;
pub mod models;
pub mod openapi;
pub mod repo;
pub mod state;
pub mod utils;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::middleware::auth_middleware;
use crate::state::AppState;

/// Assemble le routeur complet. Les routes publiques et les routes sous
/// session partagent certains chemins (lecture publique, écriture
/// authentifiée); axum fusionne les méthodes d'un même chemin au merge.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/oeuvres", get(handlers::oeuvre::list_oeuvres))
        .route("/oeuvres/recentes", get(handlers::oeuvre::list_recentes))
        .route("/oeuvres/populaires", get(handlers::oeuvre::list_populaires))
        .route("/oeuvres/{id}", get(handlers::oeuvre::get_oeuvre))
        .route("/oeuvres/{id}/chapitres", get(handlers::chapitre::list_chapitres))
        .route("/chapitres/{id}", get(handlers::chapitre::get_chapitre))
        .route("/auteurs", get(handlers::auteur::list_auteurs))
        .route("/auteurs/{id}", get(handlers::auteur::get_auteur))
        .route("/tags", get(handlers::tag::list_tags))
        .route("/register", post(handlers::compte::register))
        .route("/login", post(handlers::compte::login))
        // La création de commentaire contrôle la session elle-même: un
        // contenu vide doit répondre 400 même sans jeton.
        .route(
            "/api/commentaires/oeuvre/{id}",
            get(handlers::commentaire::list_commentaires)
                .post(handlers::commentaire::create_commentaire),
        )
        .route(
            "/api/commentaires/{id}/repondre",
            post(handlers::commentaire::create_reponse),
        );

    let protege = Router::new()
        .route("/logout", post(handlers::compte::logout))
        .route("/moi", get(handlers::compte::moi))
        .route("/api/commentaires/{id}/likes", post(handlers::commentaire::toggle_like))
        .route("/api/oeuvres/{id}/note", post(handlers::note::create_note))
        .route("/api/collection", get(handlers::collection::list_collection))
        .route(
            "/api/collection/oeuvre/{id}",
            post(handlers::collection::add_collection)
                .delete(handlers::collection::remove_collection),
        )
        .route("/oeuvres", post(handlers::oeuvre::create_oeuvre))
        .route(
            "/oeuvres/{id}",
            patch(handlers::oeuvre::update_oeuvre).delete(handlers::oeuvre::delete_oeuvre),
        )
        .route("/oeuvres/{id}/chapitres", post(handlers::chapitre::create_chapitre))
        .route(
            "/chapitres/{id}",
            patch(handlers::chapitre::update_chapitre).delete(handlers::chapitre::delete_chapitre),
        )
        .route("/auteurs", post(handlers::auteur::create_auteur))
        .route(
            "/auteurs/{id}",
            patch(handlers::auteur::update_auteur).delete(handlers::auteur::delete_auteur),
        )
        .route("/tags", post(handlers::tag::create_tag))
        .route("/tags/{id}", delete(handlers::tag::delete_tag))
        .route("/admin/import/massive", post(handlers::admin::start_import))
        .route("/admin/import/massive/status", get(handlers::admin::import_status))
        // route_layer: le contrôle de session ne s'applique qu'aux routes
        // déclarées, un chemin inconnu reste un 404.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public)
        .merge(protege)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        .with_state(state)
}
