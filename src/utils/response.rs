use serde::Serialize;
use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use utoipa::ToSchema;

/// Corps minimal renvoyé pour les erreurs et les opérations sans données.
#[derive(Serialize, ToSchema)]
pub struct MessageReponse {
    pub message: String,
}

impl MessageReponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageReponse { message: message.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErreurChamp {
    pub champ: String,
    pub message: String,
}

impl ErreurChamp {
    pub fn new(champ: &str, message: impl Into<String>) -> Self {
        ErreurChamp { champ: champ.to_string(), message: message.into() }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Forbidden,
    NotFound(String),
    BadRequest(String),
    Validation(Vec<ErreurChamp>),
    Internal(String),
}

#[derive(Serialize)]
struct CorpsErreur {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    erreurs: Option<Vec<ErreurChamp>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, corps) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                CorpsErreur { message: "Authentification requise".to_string(), erreurs: None },
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                CorpsErreur { message: "Accès refusé".to_string(), erreurs: None },
            ),
            ApiError::NotFound(m) => (
                StatusCode::NOT_FOUND,
                CorpsErreur { message: m, erreurs: None },
            ),
            ApiError::BadRequest(m) => (
                StatusCode::BAD_REQUEST,
                CorpsErreur { message: m, erreurs: None },
            ),
            ApiError::Validation(erreurs) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                CorpsErreur { message: "Validation échouée".to_string(), erreurs: Some(erreurs) },
            ),
            ApiError::Internal(m) => {
                tracing::error!("erreur interne: {}", m);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CorpsErreur { message: "Erreur interne du serveur".to_string(), erreurs: None },
                )
            }
        };

        (status, Json(corps)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}
