//! End-to-end tests of the HTTP/JSON surface

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use krishi_setu::{
    config::AppConfig,
    interest::Interest,
    listing::Listing,
    query::Page,
    service::MarketService,
    views::{ReceivedInterest, SentInterest},
    web::{AppState, configure_app_routes},
};
use serde_json::{Value, json};
use std::sync::Arc;

const OWNER: (&str, &str) = ("X-User-Email", "owner@farm.in");
const BUYER: (&str, &str) = ("X-User-Email", "buyer@mandi.in");

fn state(dir: &tempfile::TempDir) -> AppState {
    let db = sled::open(dir.path().join("http.db")).unwrap();
    let service = MarketService::new(Arc::new(db)).unwrap();
    AppState::new(service, AppConfig::default())
}

fn tomato() -> Value {
    json!({
        "name": "Tomato",
        "type": "Vegetable",
        "pricePerUnit": 50,
        "unit": "kg",
        "quantity": 200,
        "description": "Fresh red tomatoes",
        "location": "Nashik",
        "image": "https://img.example/tomato.jpg"
    })
}

#[actix_web::test]
async fn interest_workflow_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(&dir)))
            .configure(configure_app_routes),
    )
    .await;

    // create
    let req = test::TestRequest::post()
        .uri("/api/crops")
        .insert_header(OWNER)
        .insert_header(("X-User-Name", "Ravi"))
        .set_json(tomato())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let listing: Listing = test::read_body_json(resp).await;
    assert_eq!(listing.owner.owner_name, "Ravi");

    // submit
    let req = test::TestRequest::post()
        .uri(&format!("/api/crops/{}/interests", listing.id))
        .insert_header(BUYER)
        .set_json(json!({ "quantity": 10, "message": "for Monday" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let interest: Interest = test::read_body_json(resp).await;

    // duplicate
    let req = test::TestRequest::post()
        .uri(&format!("/api/crops/{}/interests", listing.id))
        .insert_header(BUYER)
        .set_json(json!({ "quantity": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "conflict");

    // received by owner
    let req = test::TestRequest::get()
        .uri("/api/received-interests")
        .insert_header(OWNER)
        .to_request();
    let page: Page<ReceivedInterest> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].interest.status.as_str(), "pending");
    assert_eq!(page.items[0].total_price, 500);

    // accept, then reject fails
    let uri = format!("/api/crops/{}/interests/{}", listing.id, interest.id);
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(OWNER)
        .set_json(json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(OWNER)
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // buyer's history shows the accepted interest
    let req = test::TestRequest::get()
        .uri("/api/my-interests?sort=status")
        .insert_header(BUYER)
        .to_request();
    let page: Page<SentInterest> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].interest.status.as_str(), "accepted");
    assert_eq!(page.items[0].owner.owner_name, "Ravi");
}

#[actix_web::test]
async fn identity_and_ownership_are_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(&dir)))
            .configure(configure_app_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/crops")
        .set_json(tomato())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/crops")
        .insert_header(OWNER)
        .set_json(tomato())
        .to_request();
    let listing: Listing = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/crops/{}", listing.id))
        .insert_header(BUYER)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/crops/{}/interests", listing.id))
        .insert_header(OWNER)
        .set_json(json!({ "quantity": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/crops/{}", listing.id))
        .insert_header(OWNER)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], listing.id.as_str());
    assert_eq!(body["removedInterests"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/crops/{}", listing.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bad_input_is_rejected_with_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(&dir)))
            .configure(configure_app_routes),
    )
    .await;

    let mut zero_price = tomato();
    zero_price["pricePerUnit"] = json!(0);
    let req = test::TestRequest::post()
        .uri("/api/crops")
        .insert_header(OWNER)
        .set_json(zero_price)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_input");

    let mut bad_unit = tomato();
    bad_unit["unit"] = json!("litre");
    let req = test::TestRequest::post()
        .uri("/api/crops")
        .insert_header(OWNER)
        .set_json(bad_unit)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/crops")
        .insert_header(OWNER)
        .set_json(tomato())
        .to_request();
    let listing: Listing = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/crops/{}/interests", listing.id))
        .insert_header(BUYER)
        .set_json(json!({ "quantity": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/crops/{}/interests", listing.id))
        .insert_header(BUYER)
        .set_json(json!({ "quantity": 2 }))
        .to_request();
    let interest: Interest = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/crops/{}/interests/{}", listing.id, interest.id))
        .insert_header(OWNER)
        .set_json(json!({ "status": "pending" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn browse_latest_and_locations() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(&dir)))
            .configure(configure_app_routes),
    )
    .await;

    for (name, location, price) in [("Tomato", "Nashik", 50), ("Onion", "Lasalgaon", 30)] {
        let mut body = tomato();
        body["name"] = json!(name);
        body["location"] = json!(location);
        body["pricePerUnit"] = json!(price);
        let req = test::TestRequest::post()
            .uri("/api/crops")
            .insert_header(OWNER)
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/crops?sort=price-low&limit=1")
        .to_request();
    let page: Page<Listing> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Onion");

    let req = test::TestRequest::get()
        .uri("/api/crops?search=nash")
        .to_request();
    let page: Page<Listing> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Tomato");

    let req = test::TestRequest::get().uri("/api/crops/latest").to_request();
    let latest: Vec<Listing> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(latest.len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/crops/locations")
        .to_request();
    let mut locations: Vec<String> = test::call_and_read_body_json(&app, req).await;
    locations.sort();
    assert_eq!(locations, vec!["Lasalgaon", "Nashik"]);

    let req = test::TestRequest::get()
        .uri("/api/my-posts")
        .insert_header(BUYER)
        .to_request();
    let page: Page<Listing> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.total, 0);
}

#[actix_web::test]
async fn health_needs_no_identity() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(&dir)))
            .configure(configure_app_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
