use actix_web::{HttpResponse, web};

use crate::error::{MarketError, ValidationError};
use crate::web::handlers::{interest_handlers, listing_handlers};

async fn health_check_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn malformed(detail: String) -> actix_web::Error {
    MarketError::from(ValidationError::Malformed(detail)).into()
}

// Called from main.rs (and the HTTP tests) to mount every route.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| malformed(err.to_string())))
        .app_data(
            web::QueryConfig::default().error_handler(|err, _req| malformed(err.to_string())),
        )
        .app_data(web::PathConfig::default().error_handler(|err, _req| malformed(err.to_string())));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check_handler))
            .service(
                web::scope("/crops")
                    .route("", web::post().to(listing_handlers::create_listing_handler))
                    .route("", web::get().to(listing_handlers::list_listings_handler))
                    // fixed segments before the {id} matcher
                    .route(
                        "/latest",
                        web::get().to(listing_handlers::latest_listings_handler),
                    )
                    .route(
                        "/locations",
                        web::get().to(listing_handlers::listing_locations_handler),
                    )
                    .route(
                        "/{id}",
                        web::get().to(listing_handlers::get_listing_handler),
                    )
                    .route(
                        "/{id}",
                        web::put().to(listing_handlers::update_listing_handler),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(listing_handlers::delete_listing_handler),
                    )
                    .route(
                        "/{id}/interests",
                        web::post().to(interest_handlers::submit_interest_handler),
                    )
                    .route(
                        "/{id}/interests/{interest_id}",
                        web::put().to(interest_handlers::decide_interest_handler),
                    ),
            )
            .route(
                "/my-posts",
                web::get().to(listing_handlers::my_posts_handler),
            )
            .route(
                "/my-interests",
                web::get().to(interest_handlers::my_interests_handler),
            )
            .route(
                "/received-interests",
                web::get().to(interest_handlers::received_interests_handler),
            ),
    );
}
