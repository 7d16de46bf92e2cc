use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chapitre {
    pub id: i64,
    pub oeuvre_id: i64,
    pub titre: String,
    pub ordre: i64,
    pub resume: Option<String>,
    /// URLs des images de pages, dans l'ordre de lecture.
    #[schema(value_type = Vec<String>)]
    pub pages: Json<Vec<String>>,
    pub id_externe: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
