//! Caller identity extractor.
//!
//! The upstream gateway authenticates the user and forwards who they are in
//! `X-User-Email` / `X-User-Name`. Handlers that take a [`Caller`] answer 401
//! when the email header is missing or blank.

use crate::error::MarketError;
use crate::identity::Identity;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};
use tracing::warn;

pub const EMAIL_HEADER: &str = "X-User-Email";
pub const NAME_HEADER: &str = "X-User-Name";

#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

impl FromRequest for Caller {
    type Error = MarketError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let email = header(req, EMAIL_HEADER).unwrap_or_default();
        let result = Identity::new(email, header(req, NAME_HEADER)).map(Caller);
        if result.is_err() {
            warn!(path = %req.path(), "request without caller identity");
        }
        ready(result)
    }
}
