use std::collections::BTreeMap;
use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::authentication::errors::AuthenticationError;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::GeoPoint;
use crate::domain::order::models::Order;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::pagination::PaginationError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;

pub mod create_order;
pub mod create_user;
pub mod get_order;
pub mod get_profile;
pub mod get_user;
pub mod healthcheck;
pub mod list_orders;
pub mod list_users;
pub mod login;
pub mod search_orders;
pub mod service_info;
pub mod sign_up;

/// Successful response: a status code and a flat JSON body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Logged with its cause; the client only sees a generic detail.
    InternalServerError(String),
    UnprocessableEntity {
        detail: String,
        errors: Option<serde_json::Value>,
    },
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized,
    Forbidden,
}

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        ApiError::UnprocessableEntity {
            detail: detail.into(),
            errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InternalServerError(cause) => {
                tracing::error!(error = %cause, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody::new("Internal server error."),
                )
            }
            ApiError::UnprocessableEntity { detail, errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorBody { detail, errors },
            ),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, ApiErrorBody::new(detail)),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, ApiErrorBody::new(detail)),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, ApiErrorBody::new(detail)),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, ApiErrorBody::new("Unauthorized.")),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                ApiErrorBody::new("Forbidden by role."),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorBody {
    pub detail: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ApiErrorBody {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: None,
        }
    }
}

/// Collects per-field validation messages while parsing a request.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Keep the value, or record the error under `field`.
    pub fn check<T, E: Display>(&mut self, field: &'static str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.add(field, e.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_api_error(self, detail: impl Into<String>) -> ApiError {
        ApiError::UnprocessableEntity {
            detail: detail.into(),
            errors: Some(serde_json::json!(self.0)),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        errors.into_api_error("Validation error.")
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidEmail(_)
            | UserError::InvalidName(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidRole(_) => ApiError::unprocessable(err.to_string()),
            UserError::PasswordHashing(_) | UserError::Repository(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            OrderError::InvalidCoordinates(_)
            | OrderError::InvalidName(_)
            | OrderError::InvalidFilter(_) => ApiError::unprocessable(err.to_string()),
            OrderError::Repository(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AuthenticationError> for ApiError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthenticationError::UserNotFound(_) | AuthenticationError::InvalidCredentials => {
                ApiError::BadRequest(err.to_string())
            }
            AuthenticationError::Unauthorized => ApiError::Unauthorized,
            AuthenticationError::TokenIssuance(_) => ApiError::InternalServerError(err.to_string()),
            AuthenticationError::User(e) => ApiError::from(e),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        let field = match err {
            PaginationError::PageTooLow { .. } => "page",
            PaginationError::PageSizeOutOfRange { .. } => "page_size",
        };
        let mut errors = FieldErrors::default();
        errors.add(field, err.to_string());
        errors.into_api_error("Invalid pagination parameters.")
    }
}

/// `?page=&page_size=` with defaults applied.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    page: Option<u32>,
    page_size: Option<u32>,
}

impl PaginationParams {
    pub fn try_into_request(self) -> Result<PageRequest, PaginationError> {
        PageRequest::new(
            self.page.unwrap_or(PageRequest::MIN_PAGE),
            self.page_size.unwrap_or(PageRequest::DEFAULT_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageData<T: Serialize + PartialEq> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T: Serialize + PartialEq> PageData<T> {
    pub fn from_page<E>(page: Page<E>, f: impl FnMut(E) -> T) -> Self {
        let page = page.map(f);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

/// Public view of a user; the password hash is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointData {
    pub lat: f64,
    pub lng: f64,
}

impl From<&GeoPoint> for PointData {
    fn from(point: &GeoPoint) -> Self {
        Self {
            lat: point.latitude(),
            lng: point.longitude(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderData {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_point: PointData,
    pub end_point: PointData,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderData {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.0,
            name: order.name.as_ref().map(|name| name.as_str().to_string()),
            description: order.description.clone(),
            start_point: (&order.start_point).into(),
            end_point: (&order.end_point).into(),
            distance_km: order.distance_km,
            duration_minutes: order.duration_minutes,
            created_at: order.created_at,
        }
    }
}
