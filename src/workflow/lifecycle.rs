//! The ad lifecycle state machine.
//!
//! Each transition is split into a pure guard (role/ownership/state checks
//! over an already-loaded ad, unit-testable without a database) and an
//! async operation that applies the effect as one atomic conditional write.
//! The conditional writes are keyed on the ad's current status, so a lost
//! race surfaces as zero affected rows and the loser fails with
//! `InvalidTransition` instead of overwriting the winner's effect.

use sea_orm::{DatabaseConnection, SqlErr, TransactionTrait};
use uuid::Uuid;

use crate::db::{ad_requests as request_db, ads as ad_db, reviews as review_db, users as user_db};
use crate::models::ad_requests::{self, ApplyInput, Status as RequestStatus};
use crate::models::ads::{self, AdListQuery, AssignInput, CreateAd, Status};
use crate::models::reviews::{self, CreateReview};
use crate::workflow::visibility;
use crate::workflow::{Actor, WorkflowError};

/// Longest accepted ad title, matching the column width.
pub const MAX_TITLE_LEN: usize = 200;
/// Longest accepted location, matching the column width.
pub const MAX_LOCATION_LEN: usize = 255;

/// Outcome of the cancel guard: repeat-cancel of an already-canceled ad is
/// an idempotent success, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelDecision {
    Cancel,
    AlreadyCanceled,
}

// ── pure guards ──

/// create: customer (or admin) only.
pub fn check_create(actor: &Actor, input: &CreateAd) -> Result<(), WorkflowError> {
    if !actor.caps.customer {
        return Err(WorkflowError::forbidden("only customers can post ads"));
    }
    if input.title.trim().is_empty() {
        return Err(WorkflowError::validation("title must not be empty"));
    }
    if input.title.chars().count() > MAX_TITLE_LEN {
        return Err(WorkflowError::validation("title is too long"));
    }
    if input.description.trim().is_empty() {
        return Err(WorkflowError::validation("description must not be empty"));
    }
    Ok(())
}

/// apply: contractor (or admin), ad must be OPEN, never on your own ad.
pub fn check_apply(actor: &Actor, ad: &ads::Model) -> Result<(), WorkflowError> {
    if !actor.caps.contractor {
        return Err(WorkflowError::forbidden("only contractors can apply"));
    }
    if ad.status != Status::Open {
        return Err(WorkflowError::invalid("you can only apply to OPEN ads"));
    }
    if ad.creator_id == actor.id {
        return Err(WorkflowError::validation("you cannot apply to your own ad"));
    }
    Ok(())
}

/// withdraw: contractor (or admin) only; existence of the application is
/// checked against the ledger by the operation.
pub fn check_withdraw(actor: &Actor) -> Result<(), WorkflowError> {
    if !actor.caps.contractor {
        return Err(WorkflowError::forbidden("only contractors can withdraw"));
    }
    Ok(())
}

/// listing applicants: ad creator, support, or admin.
pub fn check_list_applicants(actor: &Actor, ad: &ads::Model) -> Result<(), WorkflowError> {
    if actor.caps.support || actor.owns(ad.creator_id) {
        return Ok(());
    }
    Err(WorkflowError::forbidden(
        "only the ad creator can view applicants",
    ))
}

/// assign: ad creator (or admin), ad must be OPEN. The APPLIED application
/// is re-validated inside the assignment transaction.
pub fn check_assign(
    actor: &Actor,
    ad: &ads::Model,
    input: &AssignInput,
) -> Result<(), WorkflowError> {
    if !actor.owns(ad.creator_id) {
        return Err(WorkflowError::forbidden(
            "only the ad creator can assign a contractor",
        ));
    }
    if ad.status != Status::Open {
        return Err(WorkflowError::invalid("only OPEN ads can be assigned"));
    }
    if input.location.trim().is_empty() {
        return Err(WorkflowError::validation("location must not be empty"));
    }
    if input.location.chars().count() > MAX_LOCATION_LEN {
        return Err(WorkflowError::validation("location is too long"));
    }
    Ok(())
}

/// The application half of the assign precondition: the chosen contractor
/// must hold an APPLIED request for this ad at the moment of assignment.
/// Checked again inside the assignment transaction, after the row is
/// locked, so a concurrent withdraw cannot slip in between.
pub fn check_assign_application(
    request: Option<&ad_requests::Model>,
) -> Result<(), WorkflowError> {
    match request {
        Some(r) if r.status == RequestStatus::Applied => Ok(()),
        _ => Err(WorkflowError::invalid(
            "contractor has not applied to this ad",
        )),
    }
}

/// report-done: the assigned contractor (or admin), ad must be ASSIGNED.
/// Repeat reports are a no-op.
pub fn check_report_done(actor: &Actor, ad: &ads::Model) -> Result<(), WorkflowError> {
    if !actor.caps.admin && ad.assigned_contractor_id != Some(actor.id) {
        return Err(WorkflowError::forbidden(
            "only the assigned contractor can report the work done",
        ));
    }
    if ad.status != Status::Assigned {
        return Err(WorkflowError::invalid(
            "only ASSIGNED ads can be reported done",
        ));
    }
    Ok(())
}

/// confirm-completion: ad creator (or admin), never the contractor; ad must
/// be ASSIGNED with the work already reported.
pub fn check_confirm_completion(actor: &Actor, ad: &ads::Model) -> Result<(), WorkflowError> {
    if !actor.owns(ad.creator_id) {
        return Err(WorkflowError::forbidden(
            "only the ad creator can confirm completion",
        ));
    }
    if ad.status != Status::Assigned {
        return Err(WorkflowError::invalid(
            "ad must be ASSIGNED to confirm completion",
        ));
    }
    if ad.work_reported_done_at.is_none() {
        return Err(WorkflowError::invalid(
            "contractor has not reported completion yet",
        ));
    }
    Ok(())
}

/// cancel: ad creator (or admin), any state except DONE. Canceling an
/// already-canceled ad succeeds without touching it.
pub fn check_cancel(actor: &Actor, ad: &ads::Model) -> Result<CancelDecision, WorkflowError> {
    if !actor.owns(ad.creator_id) {
        return Err(WorkflowError::forbidden(
            "only the ad creator can cancel this ad",
        ));
    }
    match ad.status {
        Status::Done => Err(WorkflowError::invalid("cannot cancel a DONE ad")),
        Status::Canceled => Ok(CancelDecision::AlreadyCanceled),
        Status::Open | Status::Assigned => Ok(CancelDecision::Cancel),
    }
}

/// review: the ad creator with the CUSTOMER role (or admin), ad DONE with
/// an assigned contractor, rating 1..=5. Duplicate detection happens at
/// write time and again at the unique index.
pub fn check_review(
    actor: &Actor,
    ad: &ads::Model,
    input: &CreateReview,
) -> Result<(), WorkflowError> {
    if !actor.owns(ad.creator_id) {
        return Err(WorkflowError::forbidden(
            "only the ad creator can review it",
        ));
    }
    if !actor.caps.customer {
        return Err(WorkflowError::forbidden("only customers can leave reviews"));
    }
    if !(1..=5).contains(&input.rating) {
        return Err(WorkflowError::validation("rating must be between 1 and 5"));
    }
    if ad.status != Status::Done {
        return Err(WorkflowError::invalid(
            "you can only review after the ad is DONE",
        ));
    }
    if ad.assigned_contractor_id.is_none() {
        return Err(WorkflowError::invalid("ad has no assigned contractor"));
    }
    Ok(())
}

// ── operations ──

async fn fetch_ad(db: &DatabaseConnection, ad_id: Uuid) -> Result<ads::Model, WorkflowError> {
    ad_db::get_ad_by_id(db, ad_id)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("ad {ad_id} not found")))
}

/// Fetch an ad through the visibility filter. A filtered-out ad reports
/// the same not-found as a missing one.
pub async fn get_ad(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
) -> Result<ads::Model, WorkflowError> {
    let ad = fetch_ad(db, ad_id).await?;
    if !visibility::can_view(actor, &ad) {
        return Err(WorkflowError::not_found(format!("ad {ad_id} not found")));
    }
    Ok(ad)
}

/// List the ads this actor may see, newest-first, with optional
/// status/category filters.
pub async fn list_ads(
    db: &DatabaseConnection,
    actor: &Actor,
    query: &AdListQuery,
) -> Result<Vec<ads::Model>, WorkflowError> {
    let visible = visibility::visible_condition(actor);
    Ok(ad_db::list_ads(db, visible, query).await?)
}

/// Create a new OPEN ad owned by the actor.
pub async fn create_ad(
    db: &DatabaseConnection,
    actor: &Actor,
    input: CreateAd,
) -> Result<ads::Model, WorkflowError> {
    check_create(actor, &input)?;
    Ok(ad_db::insert_ad(db, actor.id, input).await?)
}

/// Apply to an OPEN ad. Upserts the (ad, contractor) ledger row back to
/// APPLIED; the ad row is share-locked for the duration so the upsert
/// cannot interleave with a concurrent cancel or assign.
pub async fn apply(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
    input: ApplyInput,
) -> Result<ad_requests::Model, WorkflowError> {
    if !actor.caps.contractor {
        return Err(WorkflowError::forbidden("only contractors can apply"));
    }

    let txn = db.begin().await.map_err(WorkflowError::Db)?;

    let ad = ad_db::get_ad_by_id_for_share(&txn, ad_id)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("ad {ad_id} not found")))?;
    check_apply(actor, &ad)?;

    let request =
        request_db::upsert_applied(&txn, ad_id, actor.id, input.note.unwrap_or_default()).await?;

    txn.commit().await.map_err(WorkflowError::Db)?;

    tracing::info!(ad_id = %ad_id, contractor_id = %actor.id, "contractor applied");
    Ok(request)
}

/// Withdraw an application. Idempotent: withdrawing an already-withdrawn
/// application returns it unchanged.
pub async fn withdraw(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
) -> Result<ad_requests::Model, WorkflowError> {
    check_withdraw(actor)?;
    fetch_ad(db, ad_id).await?;

    let request = request_db::get_by_ad_and_contractor(db, ad_id, actor.id)
        .await?
        .ok_or_else(|| WorkflowError::invalid("you have not applied to this ad"))?;

    if request.status == RequestStatus::Withdrawn {
        return Ok(request);
    }
    Ok(request_db::set_withdrawn(db, request).await?)
}

/// APPLIED requests for an ad, newest-first. Creator, support, or admin.
pub async fn list_applicants(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
) -> Result<Vec<ad_requests::Model>, WorkflowError> {
    let ad = fetch_ad(db, ad_id).await?;
    check_list_applicants(actor, &ad)?;
    Ok(request_db::list_applied_by_ad(db, ad_id).await?)
}

/// Assign a contractor who has an APPLIED request for this OPEN ad.
///
/// Runs in one transaction: the application row is locked and re-validated
/// before the ad is flipped, so a withdraw racing this call either lands
/// first (assignment fails) or waits until the assignment is committed.
pub async fn assign(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
    input: AssignInput,
) -> Result<ads::Model, WorkflowError> {
    let txn = db.begin().await.map_err(WorkflowError::Db)?;

    let ad = ad_db::get_ad_by_id(&txn, ad_id)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("ad {ad_id} not found")))?;
    check_assign(actor, &ad, &input)?;

    if user_db::get_contractor_by_id(&txn, input.contractor_id)
        .await?
        .is_none()
    {
        return Err(WorkflowError::validation("invalid contractor_id"));
    }

    let request =
        request_db::get_by_ad_and_contractor_for_update(&txn, ad_id, input.contractor_id).await?;
    check_assign_application(request.as_ref())?;

    // Keyed on status = OPEN: a concurrent assign or cancel that won the
    // race leaves zero rows to update.
    let contractor_id = input.contractor_id;
    if ad_db::assign_open_ad(&txn, ad_id, &input).await? == 0 {
        return Err(WorkflowError::invalid("only OPEN ads can be assigned"));
    }

    txn.commit().await.map_err(WorkflowError::Db)?;

    tracing::info!(ad_id = %ad_id, contractor_id = %contractor_id, "ad assigned");
    fetch_ad(db, ad_id).await
}

/// The assigned contractor reports the work done. The status stays
/// ASSIGNED; only the customer's confirmation moves the ad to DONE.
/// Repeat reports are a no-op.
pub async fn report_done(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
) -> Result<ads::Model, WorkflowError> {
    let ad = fetch_ad(db, ad_id).await?;
    check_report_done(actor, &ad)?;

    if ad.work_reported_done_at.is_some() {
        return Ok(ad);
    }

    if ad_db::mark_work_reported(db, ad_id).await? == 0 {
        // Either a concurrent duplicate report (fine) or the ad left
        // ASSIGNED under us.
        let current = fetch_ad(db, ad_id).await?;
        if current.status != Status::Assigned {
            return Err(WorkflowError::invalid(
                "only ASSIGNED ads can be reported done",
            ));
        }
        return Ok(current);
    }

    tracing::info!(ad_id = %ad_id, "work reported done");
    fetch_ad(db, ad_id).await
}

/// The customer confirms the reported work; the ad becomes DONE.
pub async fn confirm_completion(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
) -> Result<ads::Model, WorkflowError> {
    let ad = fetch_ad(db, ad_id).await?;
    check_confirm_completion(actor, &ad)?;

    if ad_db::complete_ad(db, ad_id).await? == 0 {
        return Err(WorkflowError::invalid(
            "ad must be ASSIGNED to confirm completion",
        ));
    }

    tracing::info!(ad_id = %ad_id, "completion confirmed");
    fetch_ad(db, ad_id).await
}

/// Cancel an ad that is not DONE. Re-canceling is an idempotent success.
pub async fn cancel(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
) -> Result<ads::Model, WorkflowError> {
    let ad = fetch_ad(db, ad_id).await?;
    if check_cancel(actor, &ad)? == CancelDecision::AlreadyCanceled {
        return Ok(ad);
    }

    if ad_db::cancel_ad(db, ad_id).await? == 0 {
        let current = fetch_ad(db, ad_id).await?;
        if current.status == Status::Canceled {
            return Ok(current);
        }
        return Err(WorkflowError::invalid("cannot cancel a DONE ad"));
    }

    tracing::info!(ad_id = %ad_id, "ad canceled");
    fetch_ad(db, ad_id).await
}

/// Create the single review for a DONE ad.
pub async fn review(
    db: &DatabaseConnection,
    actor: &Actor,
    ad_id: Uuid,
    input: CreateReview,
) -> Result<reviews::Model, WorkflowError> {
    let ad = fetch_ad(db, ad_id).await?;
    check_review(actor, &ad, &input)?;

    // Presence check first for a clean error; the unique index on ad_id is
    // the backstop when two reviews race past this check.
    if review_db::exists_for_ad(db, ad_id).await? {
        return Err(WorkflowError::already_exists("this ad already has a review"));
    }

    let contractor_id = ad
        .assigned_contractor_id
        .ok_or_else(|| WorkflowError::invalid("ad has no assigned contractor"))?;

    let created = review_db::insert_review(
        db,
        ad_id,
        actor.id,
        contractor_id,
        input.rating,
        input.comment.unwrap_or_default(),
    )
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            WorkflowError::already_exists("this ad already has a review")
        }
        _ => WorkflowError::Db(e),
    })?;

    tracing::info!(ad_id = %ad_id, review_id = %created.id, "review created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::users::Role;

    fn open_ad(creator: Uuid) -> ads::Model {
        let now = Utc::now();
        ads::Model {
            id: Uuid::new_v4(),
            creator_id: creator,
            title: "Fix my sink".into(),
            description: "Kitchen sink leaking".into(),
            category: "plumbing".into(),
            status: Status::Open,
            assigned_contractor_id: None,
            scheduled_at: None,
            location: None,
            work_reported_done_at: None,
            completed_at: None,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn assigned_ad(creator: Uuid, contractor: Uuid) -> ads::Model {
        let mut ad = open_ad(creator);
        ad.status = Status::Assigned;
        ad.assigned_contractor_id = Some(contractor);
        ad.scheduled_at = Some(Utc::now());
        ad.location = Some("Tehran - Valiasr".into());
        ad
    }

    fn customer(id: Uuid) -> Actor {
        Actor::new(id, Role::Customer, false)
    }

    fn contractor(id: Uuid) -> Actor {
        Actor::new(id, Role::Contractor, false)
    }

    fn assign_input(contractor_id: Uuid) -> AssignInput {
        AssignInput {
            contractor_id,
            scheduled_at: Utc::now(),
            location: "Tehran".into(),
        }
    }

    #[test]
    fn only_customers_create_ads() {
        let input = CreateAd {
            title: "Fix my sink".into(),
            description: "Leaking".into(),
            category: None,
        };
        assert!(check_create(&customer(Uuid::new_v4()), &input).is_ok());
        assert!(matches!(
            check_create(&contractor(Uuid::new_v4()), &input),
            Err(WorkflowError::Forbidden(_))
        ));
        // Admin keeps the customer capability regardless of role.
        let admin = Actor::new(Uuid::new_v4(), Role::Support, true);
        assert!(check_create(&admin, &input).is_ok());
    }

    #[test]
    fn create_rejects_blank_and_oversized_titles() {
        let blank = CreateAd {
            title: "   ".into(),
            description: "Leaking".into(),
            category: None,
        };
        assert!(matches!(
            check_create(&customer(Uuid::new_v4()), &blank),
            Err(WorkflowError::Validation(_))
        ));

        let oversized = CreateAd {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            description: "Leaking".into(),
            category: None,
        };
        assert!(matches!(
            check_create(&customer(Uuid::new_v4()), &oversized),
            Err(WorkflowError::Validation(_))
        ));
    }

    #[test]
    fn apply_requires_an_open_ad() {
        let creator = Uuid::new_v4();
        let worker = contractor(Uuid::new_v4());

        assert!(check_apply(&worker, &open_ad(creator)).is_ok());

        let mut canceled = open_ad(creator);
        canceled.status = Status::Canceled;
        canceled.canceled_at = Some(Utc::now());
        assert!(matches!(
            check_apply(&worker, &canceled),
            Err(WorkflowError::InvalidTransition(_))
        ));

        let taken = assigned_ad(creator, Uuid::new_v4());
        assert!(matches!(
            check_apply(&worker, &taken),
            Err(WorkflowError::InvalidTransition(_))
        ));
    }

    #[test]
    fn apply_rejects_own_ad_and_non_contractors() {
        let creator = Uuid::new_v4();
        let ad = open_ad(creator);

        assert!(matches!(
            check_apply(&contractor(creator), &ad),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            check_apply(&customer(Uuid::new_v4()), &ad),
            Err(WorkflowError::Forbidden(_))
        ));
    }

    #[test]
    fn assign_is_creator_only_and_open_only() {
        let creator = Uuid::new_v4();
        let target = Uuid::new_v4();
        let ad = open_ad(creator);

        assert!(check_assign(&customer(creator), &ad, &assign_input(target)).is_ok());
        assert!(matches!(
            check_assign(&customer(Uuid::new_v4()), &ad, &assign_input(target)),
            Err(WorkflowError::Forbidden(_))
        ));

        let taken = assigned_ad(creator, target);
        assert!(matches!(
            check_assign(&customer(creator), &taken, &assign_input(target)),
            Err(WorkflowError::InvalidTransition(_))
        ));
    }

    #[test]
    fn report_done_is_assignee_only() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let ad = assigned_ad(creator, assignee);

        assert!(check_report_done(&contractor(assignee), &ad).is_ok());
        assert!(matches!(
            check_report_done(&contractor(Uuid::new_v4()), &ad),
            Err(WorkflowError::Forbidden(_))
        ));
        // The creator cannot report on the contractor's behalf.
        assert!(matches!(
            check_report_done(&customer(creator), &ad),
            Err(WorkflowError::Forbidden(_))
        ));
    }

    #[test]
    fn confirm_requires_creator_and_reported_work() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let mut ad = assigned_ad(creator, assignee);

        // Not reported yet.
        assert!(matches!(
            check_confirm_completion(&customer(creator), &ad),
            Err(WorkflowError::InvalidTransition(_))
        ));

        ad.work_reported_done_at = Some(Utc::now());
        assert!(check_confirm_completion(&customer(creator), &ad).is_ok());

        // The assigned contractor must never confirm their own work.
        assert!(matches!(
            check_confirm_completion(&contractor(assignee), &ad),
            Err(WorkflowError::Forbidden(_))
        ));
    }

    #[test]
    fn cancel_blocks_done_and_tolerates_repeat() {
        let creator = Uuid::new_v4();
        let owner = customer(creator);

        assert_eq!(
            check_cancel(&owner, &open_ad(creator)).unwrap(),
            CancelDecision::Cancel
        );

        let mut canceled = open_ad(creator);
        canceled.status = Status::Canceled;
        canceled.canceled_at = Some(Utc::now());
        assert_eq!(
            check_cancel(&owner, &canceled).unwrap(),
            CancelDecision::AlreadyCanceled
        );

        let mut done = assigned_ad(creator, Uuid::new_v4());
        done.status = Status::Done;
        done.work_reported_done_at = Some(Utc::now());
        done.completed_at = Some(Utc::now());
        assert!(matches!(
            check_cancel(&owner, &done),
            Err(WorkflowError::InvalidTransition(_))
        ));

        assert!(matches!(
            check_cancel(&customer(Uuid::new_v4()), &open_ad(creator)),
            Err(WorkflowError::Forbidden(_))
        ));
    }

    #[test]
    fn review_guards_rating_state_and_author() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let mut ad = assigned_ad(creator, assignee);
        ad.status = Status::Done;
        ad.work_reported_done_at = Some(Utc::now());
        ad.completed_at = Some(Utc::now());

        let good = CreateReview {
            rating: 5,
            comment: Some("Great work, on time.".into()),
        };
        assert!(check_review(&customer(creator), &ad, &good).is_ok());

        let out_of_range = CreateReview {
            rating: 6,
            comment: None,
        };
        assert!(matches!(
            check_review(&customer(creator), &ad, &out_of_range),
            Err(WorkflowError::Validation(_))
        ));
        let zero = CreateReview {
            rating: 0,
            comment: None,
        };
        assert!(matches!(
            check_review(&customer(creator), &ad, &zero),
            Err(WorkflowError::Validation(_))
        ));

        assert!(matches!(
            check_review(&contractor(assignee), &ad, &good),
            Err(WorkflowError::Forbidden(_))
        ));

        let not_done = assigned_ad(creator, assignee);
        assert!(matches!(
            check_review(&customer(creator), &not_done, &good),
            Err(WorkflowError::InvalidTransition(_))
        ));
    }

    #[test]
    fn applicant_listing_is_creator_or_staff() {
        let creator = Uuid::new_v4();
        let ad = open_ad(creator);

        assert!(check_list_applicants(&customer(creator), &ad).is_ok());
        assert!(check_list_applicants(&Actor::new(Uuid::new_v4(), Role::Support, false), &ad).is_ok());
        assert!(matches!(
            check_list_applicants(&contractor(Uuid::new_v4()), &ad),
            Err(WorkflowError::Forbidden(_))
        ));
    }
}
