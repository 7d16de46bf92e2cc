use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::utils::response::ApiError;

/// Extracteur JSON maison: un corps illisible ou mal formé répond 400 avec
/// un message en français, au lieu du rejet brut d'axum.
pub struct JsonCorps<T>(pub T);

impl<S, T> FromRequest<S> for JsonCorps<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let octets = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest("Corps de requête illisible".into()))?;
        serde_json::from_slice(&octets)
            .map(JsonCorps)
            .map_err(|e| ApiError::BadRequest(format!("Corps JSON invalide: {e}")))
    }
}

/// Variante pour les routes où le corps est facultatif: une requête sans
/// corps vaut `None`, un corps présent doit être du JSON valide.
pub struct JsonCorpsOptionnel<T>(pub Option<T>);

impl<S, T> FromRequest<S> for JsonCorpsOptionnel<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let octets = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest("Corps de requête illisible".into()))?;
        if octets.is_empty() {
            return Ok(JsonCorpsOptionnel(None));
        }
        serde_json::from_slice(&octets)
            .map(|valeur| JsonCorpsOptionnel(Some(valeur)))
            .map_err(|e| ApiError::BadRequest(format!("Corps JSON invalide: {e}")))
    }
}
