use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use super::handlers::ApiError;
use super::handlers::FieldErrors;

/// `Json` whose rejections render as 422 validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejections render as 422 validation errors.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejections render as 422 validation errors.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = FieldErrors::default();
        errors.add("body", rejection.body_text());
        errors.into_api_error("Invalid request body.")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        let mut errors = FieldErrors::default();
        errors.add("query", rejection.body_text());
        errors.into_api_error("Invalid query parameters.")
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let mut errors = FieldErrors::default();
        errors.add("path", rejection.body_text());
        errors.into_api_error("Invalid path parameters.")
    }
}
