use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedActor;
use crate::models::ad_requests::ApplyInput;
use crate::models::ads::{AdListQuery, AssignInput, CreateAd};
use crate::models::reviews::CreateReview;
use crate::workflow::{WorkflowError, lifecycle};

/// GET /api/ads — list ads visible to the caller, newest-first.
/// Query params: ?status=OPEN&category=plumbing&limit=20
pub async fn get_ads(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    query: web::Query<AdListQuery>,
) -> Result<HttpResponse, WorkflowError> {
    let ads = lifecycle::list_ads(db.get_ref(), &auth.actor, &query).await?;
    Ok(HttpResponse::Ok().json(ads))
}

/// POST /api/ads — a customer posts a new service request (status OPEN).
pub async fn create_ad(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateAd>,
) -> Result<HttpResponse, WorkflowError> {
    let ad = lifecycle::create_ad(db.get_ref(), &auth.actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ad))
}

/// GET /api/ads/{id} — visibility-gated detail. An ad the caller may not
/// see responds 404, exactly like a missing one.
pub async fn get_ad(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WorkflowError> {
    let ad = lifecycle::get_ad(db.get_ref(), &auth.actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ad))
}

/// POST /api/ads/{id}/apply — a contractor applies to an OPEN ad.
/// Re-applying after a withdrawal resurrects the same application row.
pub async fn apply(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ApplyInput>,
) -> Result<HttpResponse, WorkflowError> {
    let request =
        lifecycle::apply(db.get_ref(), &auth.actor, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// POST /api/ads/{id}/withdraw — a contractor withdraws their application
/// (idempotent).
pub async fn withdraw(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WorkflowError> {
    let request = lifecycle::withdraw(db.get_ref(), &auth.actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// GET /api/ads/{id}/requests — APPLIED applications, newest-first. The
/// customer picks the contractor from this list. Creator/support/admin only.
pub async fn get_requests(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WorkflowError> {
    let requests = lifecycle::list_applicants(db.get_ref(), &auth.actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// POST /api/ads/{id}/assign — the creator picks an applicant; the ad
/// becomes ASSIGNED with a schedule and location.
pub async fn assign(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AssignInput>,
) -> Result<HttpResponse, WorkflowError> {
    let ad =
        lifecycle::assign(db.get_ref(), &auth.actor, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ad))
}

/// POST /api/ads/{id}/report-done — the assigned contractor reports the
/// work finished. Status stays ASSIGNED until the customer confirms.
pub async fn report_done(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WorkflowError> {
    let ad = lifecycle::report_done(db.get_ref(), &auth.actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ad))
}

/// POST /api/ads/{id}/confirm-completion — the customer confirms the
/// reported work; the ad becomes DONE.
pub async fn confirm_completion(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WorkflowError> {
    let ad = lifecycle::confirm_completion(db.get_ref(), &auth.actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ad))
}

/// POST /api/ads/{id}/cancel — the customer cancels before completion.
/// Re-canceling an already-canceled ad is a no-op success.
pub async fn cancel(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WorkflowError> {
    let ad = lifecycle::cancel(db.get_ref(), &auth.actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ad))
}

/// POST /api/ads/{id}/review — the customer rates the contractor once the
/// ad is DONE. One review per ad.
pub async fn review(
    auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> Result<HttpResponse, WorkflowError> {
    let created =
        lifecycle::review(db.get_ref(), &auth.actor, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}
