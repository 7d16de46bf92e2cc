use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Agrégat des notes d'une œuvre, renvoyé sous la clé `notes`: moyenne
/// arrondie à une décimale et nombre de votants.
#[derive(Debug, Clone, Copy, Serialize, FromRow, ToSchema)]
pub struct AgregatNotes {
    pub average: f64,
    pub total: i64,
}
