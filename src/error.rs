use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Every failure the API surfaces. Business-rule failures carry the exact
/// client-facing message; store errors are logged and hidden behind a 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered.")]
    DuplicateEmail,
    #[error("Salon name already registered.")]
    DuplicateName,
    #[error("Owner not found.")]
    OwnerNotFound,
    #[error("Barber is already booked at this time")]
    SlotTaken,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Incorrect email or password")]
    BadCredentials,
    #[error("Could not validate credentials")]
    Unauthenticated,
    #[error("Internal server error")]
    Internal,
    #[error("store unavailable")]
    Unavailable(#[from] sqlx::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::DuplicateEmail
            | ApiError::DuplicateName
            | ApiError::SlotTaken => StatusCode::BAD_REQUEST,
            ApiError::OwnerNotFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal | ApiError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Unavailable(err) = self {
            log::error!("Store error: {err}");
            return HttpResponse::InternalServerError()
                .json(json!({ "detail": "Internal server error" }));
        }

        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, ApiError::Unauthenticated) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(json!({ "detail": self.to_string() }))
    }
}
