pub mod ads;
pub mod auth;
pub mod reviews;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedActor extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── User routes (all protected — require valid JWT) ──
    cfg.service(web::resource("/users").route(web::get().to(users::get_users)));
    cfg.service(web::resource("/users/{id}").route(web::get().to(users::get_user)));

    // ── Ad routes: CRUD plus the lifecycle actions ──
    cfg.service(
        web::scope("/ads")
            .route("", web::get().to(ads::get_ads))
            .route("", web::post().to(ads::create_ad))
            .route("/{id}", web::get().to(ads::get_ad))
            .route("/{id}/apply", web::post().to(ads::apply))
            .route("/{id}/withdraw", web::post().to(ads::withdraw))
            .route("/{id}/requests", web::get().to(ads::get_requests))
            .route("/{id}/assign", web::post().to(ads::assign))
            .route("/{id}/report-done", web::post().to(ads::report_done))
            .route(
                "/{id}/confirm-completion",
                web::post().to(ads::confirm_completion),
            )
            .route("/{id}/cancel", web::post().to(ads::cancel))
            .route("/{id}/review", web::post().to(ads::review)),
    );

    // ── Review routes ──
    cfg.service(
        web::resource("/reviews/contractor/{contractor_id}")
            .route(web::get().to(reviews::get_reviews_by_contractor)),
    );
}
