use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews;

/// Insert a review row. The unique index on `ad_id` is the correctness
/// backstop: under a race the second insert fails with a unique violation
/// which the lifecycle engine maps to `AlreadyExists`.
pub async fn insert_review<C: ConnectionTrait>(
    db: &C,
    ad_id: Uuid,
    author_id: Uuid,
    contractor_id: Uuid,
    rating: i16,
    comment: String,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        ad_id: Set(ad_id),
        author_id: Set(author_id),
        contractor_id: Set(contractor_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}

/// Whether a review already references this ad.
pub async fn exists_for_ad<C: ConnectionTrait>(db: &C, ad_id: Uuid) -> Result<bool, DbErr> {
    let count = reviews::Entity::find()
        .filter(reviews::Column::AdId.eq(ad_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Reviews received by a contractor, newest-first.
pub async fn list_by_contractor<C: ConnectionTrait>(
    db: &C,
    contractor_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::ContractorId.eq(contractor_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await
}
