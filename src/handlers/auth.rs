use actix_web::{HttpResponse, Responder};

use crate::auth::middleware::AuthenticatedActor;
use crate::models::users::UserResponse;

/// GET /api/auth/me — return the authenticated user's profile.
pub async fn me(auth: AuthenticatedActor) -> impl Responder {
    HttpResponse::Ok().json(UserResponse::from(auth.user))
}
