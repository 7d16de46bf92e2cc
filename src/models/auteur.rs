use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Auteur {
    pub id: i64,
    pub nom: String,
    pub pseudonyme: Option<String>,
    pub biographie: Option<String>,
    pub nationalite: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
