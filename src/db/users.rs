use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, Role};

/// Fetch all users.
pub async fn get_all_users<C: ConnectionTrait>(db: &C) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find().all(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch a user only if they hold the CONTRACTOR role. Used by `assign`
/// to validate the target before flipping the ad.
pub async fn get_contractor_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id)
        .filter(users::Column::Role.eq(Role::Contractor))
        .one(db)
        .await
}
