use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

use super::blocking;
use crate::error::MarketError;
use crate::listing::{ListingDraft, ListingPatch};
use crate::query::{self, BrowseQuery, PageParams, paginate};
use crate::web::AppState;
use crate::web::identity::Caller;

#[instrument(name = "handler::create_listing", skip(app_state, caller, draft), fields(owner = %caller.0.email()))]
pub async fn create_listing_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    draft: web::Json<ListingDraft>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let draft = draft.into_inner();
    let listing = blocking(move || service.create_listing(&draft, &caller.0)).await?;

    Ok(HttpResponse::Created().json(listing))
}

#[instrument(name = "handler::list_listings", skip(app_state))]
pub async fn list_listings_handler(
    app_state: web::Data<AppState>,
    browse: web::Query<BrowseQuery>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let listings = blocking(move || service.list_listings()).await?;

    let filtered = browse.apply(listings);
    info!("Browsing {} matching listings.", filtered.len());

    Ok(HttpResponse::Ok().json(paginate(
        filtered,
        page.into_inner(),
        app_state.config.page_limits,
    )))
}

#[instrument(name = "handler::latest_listings", skip(app_state))]
pub async fn latest_listings_handler(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let listings = blocking(move || service.list_listings()).await?;

    Ok(HttpResponse::Ok().json(query::latest(listings, app_state.config.latest_limit)))
}

#[instrument(name = "handler::listing_locations", skip(app_state))]
pub async fn listing_locations_handler(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let listings = blocking(move || service.list_listings()).await?;

    Ok(HttpResponse::Ok().json(query::locations(listings)))
}

#[instrument(name = "handler::get_listing", skip(app_state, path), fields(listing_id = %path.as_ref()))]
pub async fn get_listing_handler(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let id = path.into_inner();
    let listing = blocking(move || service.get_listing(&id)).await?;

    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(name = "handler::update_listing", skip(app_state, caller, path, patch), fields(listing_id = %path.as_ref()))]
pub async fn update_listing_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
    patch: web::Json<ListingPatch>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let id = path.into_inner();
    let patch = patch.into_inner();
    let listing = blocking(move || service.update_listing(&id, &patch, &caller.0)).await?;

    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(name = "handler::delete_listing", skip(app_state, caller, path), fields(listing_id = %path.as_ref()))]
pub async fn delete_listing_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let id = path.into_inner();
    let deleted = blocking(move || service.delete_listing(&id, &caller.0)).await?;

    Ok(HttpResponse::Ok().json(deleted))
}

#[instrument(name = "handler::my_posts", skip(app_state, caller), fields(owner = %caller.0.email()))]
pub async fn my_posts_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let mut listings = blocking(move || service.listings_owned_by(&caller.0)).await?;
    query::sort_listings(&mut listings, query::ListingSort::Newest);

    Ok(HttpResponse::Ok().json(paginate(
        listings,
        page.into_inner(),
        app_state.config.page_limits,
    )))
}
