use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Type d'une oeuvre cataloguée, stocké en TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TypeOeuvre {
    Manga,
    Manhwa,
    Manhua,
    LightNovel,
    WebNovel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Statut {
    EnCours,
    Terminee,
    EnPause,
    Abandonnee,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Oeuvre {
    pub id: i64,
    pub titre: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_oeuvre: TypeOeuvre,
    pub couverture: Option<String>,
    pub resume: Option<String>,
    pub date_publication: Option<NaiveDate>,
    pub id_externe: Option<String>,
    pub statut: Statut,
    pub demographie: Option<String>,
    pub classification: Option<String>,
    pub auteur_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
