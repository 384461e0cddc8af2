use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Role` enum maps to a Postgres TEXT column stored in the original
/// uppercase wire format. Admin is not a role: it is the `is_superuser`
/// flag, orthogonal to the role column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
    #[sea_orm(string_value = "CONTRACTOR")]
    Contractor,
    #[sea_orm(string_value = "SUPPORT")]
    Support,
}

/// SeaORM entity for the `users` table.
///
/// Registration and token issuance live in an external service; this table
/// is the identity/role record the auth middleware resolves tokens against.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub is_superuser: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ad_requests::Entity")]
    AdRequests,
}

impl Related<super::ad_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// A safe user representation for API responses (never leaks email/phone or
/// the superuser flag).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            display_name: m.display_name,
            role: m.role,
            created_at: m.created_at,
        }
    }
}
