use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use stockboard::Error;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) | Error::InvalidTickerCode(_) => StatusCode::BAD_REQUEST,
            Error::Fetch(_) | Error::Parse(_) | Error::Json(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.0.to_string(),
        }))
    }
}

/// Rejects a missing or empty `query` parameter before any lookup happens.
pub fn required_query(query: Option<&str>) -> Result<&str, ApiError> {
    match query {
        Some(query) if !query.is_empty() => Ok(query),
        _ => Err(ApiError(Error::InvalidInput(
            "enter a company name or ticker code".to_string(),
        ))),
    }
}
