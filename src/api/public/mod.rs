pub mod auth;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/login", post(auth::login::login))
        .route(
            "/s/{code}",
            get(crate::api::recipes::get_link::resolve_short_link),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(auth::login::login, auth::signup::signup),
    components(schemas(
        auth::login::LoginRequest,
        auth::login::LoginResponse,
        auth::signup::SignupRequest,
        auth::signup::SignupResponse,
    ))
)]
pub struct ApiDoc;
