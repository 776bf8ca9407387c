use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtError;
use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_order::create_order;
use super::handlers::create_user::create_user;
use super::handlers::get_order::get_order;
use super::handlers::get_profile::get_profile;
use super::handlers::get_user::get_user;
use super::handlers::healthcheck::healthcheck;
use super::handlers::list_orders::list_orders;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::search_orders::search_orders;
use super::handlers::service_info::service_info;
use super::handlers::sign_up::sign_up;
use super::middleware::authenticate as auth_middleware;
use crate::config::Config;
use crate::config::ServiceConfig;
use crate::domain::authentication::service::AuthenticationService;
use crate::domain::order::service::OrderService;
use crate::domain::user::service::UserService;
use crate::outbound::database::PostgresDatabase;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresDatabase>>,
    pub order_service: Arc<OrderService<PostgresDatabase>>,
    pub authentication_service: Arc<AuthenticationService<UserService<PostgresDatabase>>>,
    pub database: Arc<PostgresDatabase>,
    pub service: ServiceConfig,
}

impl AppState {
    /// Wire the services over one shared database handle.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - `jwt.algorithm` is not an HMAC algorithm
    pub fn new(config: &Config, database: PostgresDatabase) -> Result<Self, JwtError> {
        let database = Arc::new(database);
        let authenticator = Arc::new(Authenticator::with_algorithm(
            config.jwt.secret.as_bytes(),
            &config.jwt.algorithm,
        )?);

        let user_service = Arc::new(UserService::new(Arc::clone(&database)));
        let order_service = Arc::new(OrderService::new(Arc::clone(&database)));
        let authentication_service = Arc::new(AuthenticationService::new(
            Arc::clone(&user_service),
            authenticator,
            config.jwt.access_token_exp_minutes,
        ));

        Ok(Self {
            user_service,
            order_service,
            authentication_service,
            database,
            service: config.service.clone(),
        })
    }
}

/// CORS for the configured origins, with credentials; methods and headers
/// mirror the preflight request.
///
/// # Errors
/// * `InvalidHeaderValue` - An origin is not a valid header value
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/authentication/sign-up", post(sign_up))
        .route("/api/v1/authentication/login", post(login))
        .route("/healthcheck", get(healthcheck));

    let protected_routes = Router::new()
        .route("/api/v1/authentication/profile", get(get_profile))
        .route("/api/v1/common/info", get(service_info))
        .route("/api/v1/users", post(create_user).get(list_users))
        .route("/api/v1/users/profile", get(get_profile))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/orders", post(create_order).get(list_orders))
        .route("/api/v1/orders/search", get(search_orders))
        .route("/api/v1/orders/:order_id", get(get_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(ServiceBuilder::new().layer(trace_layer).layer(cors))
        .with_state(state)
}
