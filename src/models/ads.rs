use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ad workflow status, stored as uppercase text.
///
/// `OPEN -> ASSIGNED -> DONE`, with `CANCELED` reachable from OPEN or
/// ASSIGNED. DONE and CANCELED are terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "DONE")]
    Done,
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

/// SeaORM entity for the `ads` table.
///
/// Field invariants (enforced by the lifecycle engine's conditional
/// writes):
/// - `assigned_contractor_id` is set iff status is ASSIGNED or DONE
/// - `work_reported_done_at` and `completed_at` are set iff status is DONE
/// - `canceled_at` is set iff status is CANCELED
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub status: Status,
    pub assigned_contractor_id: Option<Uuid>,
    pub scheduled_at: Option<DateTimeUtc>,
    pub location: Option<String>,
    pub work_reported_done_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub canceled_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedContractorId",
        to = "super::users::Column::Id"
    )]
    AssignedContractor,
    #[sea_orm(has_many = "super::ad_requests::Entity")]
    Requests,
    #[sea_orm(has_one = "super::reviews::Entity")]
    Review,
}

impl Related<super::ad_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/ads. Workflow fields (status, assignee,
/// timestamps) are never client-settable; they move only through the
/// dedicated action endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAd {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

/// Request body for POST /api/ads/{id}/assign.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignInput {
    pub contractor_id: Uuid,
    pub scheduled_at: DateTimeUtc,
    pub location: String,
}

/// Query params for GET /api/ads.
#[derive(Debug, Clone, Deserialize)]
pub struct AdListQuery {
    pub status: Option<Status>,
    pub category: Option<String>,
    pub limit: Option<u64>,
}

impl AdListQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).min(100)
    }
}
