use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::ads::{self, AdListQuery, AssignInput, CreateAd, Status};

/// Insert a new ad (always starts OPEN, owned by its creator).
pub async fn insert_ad<C: ConnectionTrait>(
    db: &C,
    creator_id: Uuid,
    input: CreateAd,
) -> Result<ads::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_ad = ads::ActiveModel {
        id: Set(Uuid::new_v4()),
        creator_id: Set(creator_id),
        title: Set(input.title),
        description: Set(input.description),
        category: Set(input.category.unwrap_or_default()),
        status: Set(Status::Open),
        assigned_contractor_id: Set(None),
        scheduled_at: Set(None),
        location: Set(None),
        work_reported_done_at: Set(None),
        completed_at: Set(None),
        canceled_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_ad.insert(db).await
}

/// Fetch a single ad by ID.
pub async fn get_ad_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<ads::Model>, DbErr> {
    ads::Entity::find_by_id(id).one(db).await
}

/// Fetch a single ad by ID with a shared row lock, for transitions that
/// must not interleave with a concurrent status change.
pub async fn get_ad_by_id_for_share<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<ads::Model>, DbErr> {
    ads::Entity::find_by_id(id).lock_shared().one(db).await
}

/// List ads matching a visibility condition plus optional filters,
/// newest-first.
pub async fn list_ads<C: ConnectionTrait>(
    db: &C,
    visible: Condition,
    query: &AdListQuery,
) -> Result<Vec<ads::Model>, DbErr> {
    let mut find = ads::Entity::find().filter(visible);

    if let Some(status) = query.status {
        find = find.filter(ads::Column::Status.eq(status));
    }
    if let Some(category) = &query.category {
        find = find.filter(ads::Column::Category.eq(category.clone()));
    }

    find.order_by_desc(ads::Column::CreatedAt)
        .limit(query.limit())
        .all(db)
        .await
}

/// Atomically assign a contractor to an OPEN ad.
///
/// The update is keyed on `status = OPEN`; returns the number of rows
/// changed. Zero means the ad left OPEN between the caller's read and this
/// write, and the assignment must not happen.
pub async fn assign_open_ad<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    input: &AssignInput,
) -> Result<u64, DbErr> {
    let res = ads::Entity::update_many()
        .col_expr(ads::Column::Status, Expr::value(Status::Assigned))
        .col_expr(
            ads::Column::AssignedContractorId,
            Expr::value(Some(input.contractor_id)),
        )
        .col_expr(ads::Column::ScheduledAt, Expr::value(Some(input.scheduled_at)))
        .col_expr(ads::Column::Location, Expr::value(Some(input.location.clone())))
        .col_expr(ads::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(ads::Column::Id.eq(id))
        .filter(ads::Column::Status.eq(Status::Open))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Atomically stamp `work_reported_done_at` on an ASSIGNED ad that has not
/// been reported yet. Zero rows means either a repeat report (fine) or the
/// ad left ASSIGNED; the caller re-reads to tell the two apart.
pub async fn mark_work_reported<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let now = chrono::Utc::now();
    let res = ads::Entity::update_many()
        .col_expr(ads::Column::WorkReportedDoneAt, Expr::value(Some(now)))
        .col_expr(ads::Column::UpdatedAt, Expr::value(now))
        .filter(ads::Column::Id.eq(id))
        .filter(ads::Column::Status.eq(Status::Assigned))
        .filter(ads::Column::WorkReportedDoneAt.is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Atomically move an ASSIGNED, work-reported ad to DONE.
pub async fn complete_ad<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let now = chrono::Utc::now();
    let res = ads::Entity::update_many()
        .col_expr(ads::Column::Status, Expr::value(Status::Done))
        .col_expr(ads::Column::CompletedAt, Expr::value(Some(now)))
        .col_expr(ads::Column::UpdatedAt, Expr::value(now))
        .filter(ads::Column::Id.eq(id))
        .filter(ads::Column::Status.eq(Status::Assigned))
        .filter(ads::Column::WorkReportedDoneAt.is_not_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Atomically move an OPEN or ASSIGNED ad to CANCELED. The assignee is
/// cleared: an assigned contractor is only ever set on a live assignment.
pub async fn cancel_ad<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let now = chrono::Utc::now();
    let res = ads::Entity::update_many()
        .col_expr(ads::Column::Status, Expr::value(Status::Canceled))
        .col_expr(ads::Column::CanceledAt, Expr::value(Some(now)))
        .col_expr(
            ads::Column::AssignedContractorId,
            Expr::value(Option::<Uuid>::None),
        )
        .col_expr(ads::Column::UpdatedAt, Expr::value(now))
        .filter(ads::Column::Id.eq(id))
        .filter(ads::Column::Status.is_in([Status::Open, Status::Assigned]))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
