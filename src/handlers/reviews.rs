use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedActor;
use crate::db::reviews as review_db;

/// GET /api/reviews/contractor/{contractor_id} — reviews received by a
/// contractor, newest-first. Feeds the contractor profile page.
pub async fn get_reviews_by_contractor(
    _auth: AuthenticatedActor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contractor_id = path.into_inner();
    match review_db::list_by_contractor(db.get_ref(), contractor_id).await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
