use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::get_user_from_token;

/// Authenticated caller, resolved from a `Bearer` session token.
///
/// Handlers destructure it (`AuthUser(user): AuthUser`); a request without
/// a valid, unexpired session never reaches the handler body. Every
/// rejection is the same 401 so the response does not leak whether a
/// token was absent, malformed, or expired.
pub struct AuthUser(pub User);

/// Pull the token out of an `Authorization: Bearer <token>` value.
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Invalid or missing authentication token".to_string(),
        }),
    )
        .into_response()
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(unauthorized)?;

        let user = get_user_from_token(&pool, token)
            .await
            .ok_or_else(unauthorized)?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert_eq!(bearer_token("bearer abc123"), None);
        assert_eq!(bearer_token("Basic abc123"), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
