use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewShortLink;
use crate::schema::{recipes, short_links};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const CODE_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Random 8-character code drawn from a v4 UUID's hex form.
fn short_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(CODE_LENGTH);
    code
}

/// Build the absolute short URL for a code.
fn short_url(base: &str, code: &str) -> String {
    format!("{}/s/{}", base.trim_end_matches('/'), code)
}

fn base_url() -> String {
    std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Return the recipe's existing code, or mint one. Codes are unique; on a
/// collision (or a concurrent create of the same recipe's link) the insert
/// fails the unique constraint and we re-check before drawing a new code.
fn get_or_create_code(
    conn: &mut PgConnection,
    recipe_id: Uuid,
) -> Result<String, diesel::result::Error> {
    loop {
        if let Some(code) = short_links::table
            .filter(short_links::recipe_id.eq(recipe_id))
            .select(short_links::short_code)
            .first::<String>(conn)
            .optional()?
        {
            return Ok(code);
        }

        let code = short_code();
        let new_link = NewShortLink {
            recipe_id,
            short_code: &code,
        };

        match diesel::insert_into(short_links::table)
            .values(&new_link)
            .execute(conn)
        {
            Ok(_) => return Ok(code),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => continue,
            Err(e) => return Err(e),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Short link for the recipe", body = ShortLinkResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_short_link(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe_exists: bool = match diesel::select(exists(
        recipes::table.filter(recipes::id.eq(id)),
    ))
    .get_result(&mut conn)
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build short link".to_string(),
                }),
            )
                .into_response();
        }
    };

    if !recipe_exists {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    }

    match get_or_create_code(&mut conn, id) {
        Ok(code) => (
            StatusCode::OK,
            Json(ShortLinkResponse {
                short_link: short_url(&base_url(), &code),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to build short link: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build short link".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/s/{code}",
    tag = "recipes",
    params(
        ("code" = String, Path, description = "Short link code")
    ),
    responses(
        (status = 307, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown short link", body = ErrorResponse)
    )
)]
pub async fn resolve_short_link(
    State(pool): State<Arc<DbPool>>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe_id: Option<Uuid> = match short_links::table
        .filter(short_links::short_code.eq(&code))
        .select(short_links::recipe_id)
        .first(&mut conn)
        .optional()
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to resolve short link: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to resolve short link".to_string(),
                }),
            )
                .into_response();
        }
    };

    match recipe_id {
        Some(recipe_id) => Redirect::temporary(&format!("/recipes/{}", recipe_id)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Unknown short link".to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_eight_hex_chars() {
        let code = short_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_codes_vary() {
        assert_ne!(short_code(), short_code());
    }

    #[test]
    fn test_short_url_shape() {
        assert_eq!(
            short_url("https://example.com", "abcd1234"),
            "https://example.com/s/abcd1234"
        );
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        assert_eq!(
            short_url("https://example.com/", "abcd1234"),
            "https://example.com/s/abcd1234"
        );
    }
}
