use crate::error::{ErrorKind, MarketError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

impl ResponseError for MarketError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let kind = self.kind();
        // storage and encoding details stay in the log
        let message = match kind {
            ErrorKind::Internal => {
                tracing::error!(application_error = %self, "Responding with internal error");
                "An internal error occurred".to_string()
            }
            _ => {
                tracing::debug!(application_error = %self, "Responding with error");
                self.to_string()
            }
        };
        HttpResponse::build(self.status_code())
            .json(json!({ "error": kind.as_str(), "message": message }))
    }
}
