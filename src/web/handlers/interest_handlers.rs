use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, instrument};

use super::blocking;
use crate::error::MarketError;
use crate::interest::{Decision, InterestRequest, InterestStatus};
use crate::query::{PageParams, paginate};
use crate::views::{InterestSort, sort_interests};
use crate::web::AppState;
use crate::web::identity::Caller;

#[derive(Deserialize, Debug)]
pub struct DecisionPayload {
    pub status: InterestStatus,
}

#[derive(Deserialize, Debug, Default)]
pub struct InterestSortQuery {
    #[serde(default)]
    pub sort: InterestSort,
}

#[instrument(
    name = "handler::submit_interest",
    skip(app_state, caller, path, request),
    fields(listing_id = %path.as_ref(), requester = %caller.0.email(), quantity = request.quantity)
)]
pub async fn submit_interest_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
    request: web::Json<InterestRequest>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let listing_id = path.into_inner();
    let request = request.into_inner();
    let interest =
        blocking(move || service.submit_interest(&listing_id, &caller.0, &request)).await?;

    Ok(HttpResponse::Created().json(interest))
}

#[instrument(
    name = "handler::decide_interest",
    skip(app_state, caller, path, payload),
    fields(status = payload.status.as_str())
)]
pub async fn decide_interest_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<(String, String)>,
    payload: web::Json<DecisionPayload>,
) -> Result<HttpResponse, MarketError> {
    let decision = Decision::try_from(payload.status)?;
    let service = app_state.service.clone();
    let (listing_id, interest_id) = path.into_inner();
    let interest = blocking(move || {
        service.decide_interest(&listing_id, &interest_id, decision, &caller.0)
    })
    .await?;

    Ok(HttpResponse::Ok().json(interest))
}

#[instrument(name = "handler::my_interests", skip(app_state, caller), fields(requester = %caller.0.email()))]
pub async fn my_interests_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    sort: web::Query<InterestSortQuery>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let mut sent = blocking(move || service.interests_sent_by(&caller.0)).await?;
    sort_interests(&mut sent, sort.sort);
    info!("Found {} sent interests.", sent.len());

    Ok(HttpResponse::Ok().json(paginate(
        sent,
        page.into_inner(),
        app_state.config.page_limits,
    )))
}

#[instrument(name = "handler::received_interests", skip(app_state, caller), fields(owner = %caller.0.email()))]
pub async fn received_interests_handler(
    app_state: web::Data<AppState>,
    caller: Caller,
    sort: web::Query<InterestSortQuery>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, MarketError> {
    let service = app_state.service.clone();
    let mut received = blocking(move || service.interests_received_by(&caller.0)).await?;
    sort_interests(&mut received, sort.sort);
    info!("Found {} received interests.", received.len());

    Ok(HttpResponse::Ok().json(paginate(
        received,
        page.into_inner(),
        app_state.config.page_limits,
    )))
}
