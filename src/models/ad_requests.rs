use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application status, stored as uppercase text. Withdrawing keeps the row
/// and flips the status; re-applying flips it back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[sea_orm(string_value = "APPLIED")]
    Applied,
    #[sea_orm(string_value = "WITHDRAWN")]
    Withdrawn,
}

/// SeaORM entity for the `ad_requests` table (contractor applications).
///
/// At most one row per (ad, contractor); the unique index backs the
/// upsert-on-apply in the application ledger.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ad_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ad_id: Uuid,
    pub contractor_id: Uuid,
    pub status: Status,
    #[sea_orm(column_type = "Text")]
    pub note: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ads::Entity",
        from = "Column::AdId",
        to = "super::ads::Column::Id"
    )]
    Ad,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ContractorId",
        to = "super::users::Column::Id"
    )]
    Contractor,
}

impl Related<super::ads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ad.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contractor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/ads/{id}/apply.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyInput {
    pub note: Option<String>,
}
