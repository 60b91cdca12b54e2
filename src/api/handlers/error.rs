//! GET /error: public placeholder that never answers 401.
//! Also the router fallbacks for unknown paths and methods.

use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::error::{AppError, ErrorBody, ErrorResponse};

pub async fn error_page() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ErrorResponse {
            error: ErrorBody {
                code: "NONE",
                message: "no error recorded".to_string(),
            },
        }),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
