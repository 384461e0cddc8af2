use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::models::ad_requests::{self, Status};

/// Upsert an application: insert APPLIED, or — if this contractor already
/// has a row for this ad — flip that row back to APPLIED and replace the
/// note. Atomic on the (ad_id, contractor_id) unique key, so concurrent
/// first-time applications cannot create duplicates.
pub async fn upsert_applied<C: ConnectionTrait>(
    db: &C,
    ad_id: Uuid,
    contractor_id: Uuid,
    note: String,
) -> Result<ad_requests::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_request = ad_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        ad_id: Set(ad_id),
        contractor_id: Set(contractor_id),
        status: Set(Status::Applied),
        note: Set(note),
        created_at: Set(now),
        updated_at: Set(now),
    };

    ad_requests::Entity::insert(new_request)
        .on_conflict(
            OnConflict::columns([ad_requests::Column::AdId, ad_requests::Column::ContractorId])
                .update_columns([
                    ad_requests::Column::Status,
                    ad_requests::Column::Note,
                    ad_requests::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
}

/// Fetch a contractor's application for an ad, if any.
pub async fn get_by_ad_and_contractor<C: ConnectionTrait>(
    db: &C,
    ad_id: Uuid,
    contractor_id: Uuid,
) -> Result<Option<ad_requests::Model>, DbErr> {
    ad_requests::Entity::find()
        .filter(ad_requests::Column::AdId.eq(ad_id))
        .filter(ad_requests::Column::ContractorId.eq(contractor_id))
        .one(db)
        .await
}

/// Same lookup with an exclusive row lock, so an assignment can pin the
/// application while it validates and flips the ad.
pub async fn get_by_ad_and_contractor_for_update<C: ConnectionTrait>(
    db: &C,
    ad_id: Uuid,
    contractor_id: Uuid,
) -> Result<Option<ad_requests::Model>, DbErr> {
    ad_requests::Entity::find()
        .filter(ad_requests::Column::AdId.eq(ad_id))
        .filter(ad_requests::Column::ContractorId.eq(contractor_id))
        .lock_exclusive()
        .one(db)
        .await
}

/// List APPLIED requests for an ad, newest-first.
pub async fn list_applied_by_ad<C: ConnectionTrait>(
    db: &C,
    ad_id: Uuid,
) -> Result<Vec<ad_requests::Model>, DbErr> {
    ad_requests::Entity::find()
        .filter(ad_requests::Column::AdId.eq(ad_id))
        .filter(ad_requests::Column::Status.eq(Status::Applied))
        .order_by_desc(ad_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Flip an application to WITHDRAWN. The row is kept; re-applying later
/// resurrects it.
pub async fn set_withdrawn<C: ConnectionTrait>(
    db: &C,
    request: ad_requests::Model,
) -> Result<ad_requests::Model, DbErr> {
    let mut active: ad_requests::ActiveModel = request.into();
    active.status = Set(Status::Withdrawn);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await
}
