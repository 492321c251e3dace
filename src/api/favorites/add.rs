use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewFavorite;
use crate::schema::{favorites, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub recipe_id: Uuid,
    pub name: String,
    pub cooking_time: i32,
}

/// Map an insert failure to a status. A foreign key violation means the
/// recipe was deleted between the existence check and the insert, so it
/// gets the same 404 as a recipe that never existed.
fn insert_error_status(e: &diesel::result::Error) -> StatusCode {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StatusCode::BAD_REQUEST
        }
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Recipe added to favorites", body = FavoriteResponse),
        (status = 400, description = "Recipe already favorited", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe: Option<(String, i32)> = match recipes::table
        .filter(recipes::id.eq(id))
        .select((recipes::name, recipes::cooking_time))
        .first(&mut conn)
        .optional()
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add favorite".to_string(),
                }),
            )
                .into_response();
        }
    };

    let (name, cooking_time) = match recipe {
        Some(row) => row,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
    };

    let new_favorite = NewFavorite {
        user_id: user.id,
        recipe_id: id,
    };

    match diesel::insert_into(favorites::table)
        .values(&new_favorite)
        .execute(&mut conn)
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(FavoriteResponse {
                recipe_id: id,
                name,
                cooking_time,
            }),
        )
            .into_response(),
        Err(e) => {
            let status = insert_error_status(&e);
            let error = if status == StatusCode::BAD_REQUEST {
                "Recipe is already in your favorites".to_string()
            } else if status == StatusCode::NOT_FOUND {
                "Recipe not found".to_string()
            } else {
                tracing::error!("Failed to add favorite: {}", e);
                "Failed to add favorite".to_string()
            };
            (status, Json(ErrorResponse { error })).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_error(kind: DatabaseErrorKind) -> diesel::result::Error {
        diesel::result::Error::DatabaseError(kind, Box::new("favorites".to_string()))
    }

    #[test]
    fn test_duplicate_favorite_is_bad_request() {
        assert_eq!(
            insert_error_status(&db_error(DatabaseErrorKind::UniqueViolation)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_recipe_deleted_mid_request_is_not_found() {
        assert_eq!(
            insert_error_status(&db_error(DatabaseErrorKind::ForeignKeyViolation)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_other_failures_are_server_errors() {
        assert_eq!(
            insert_error_status(&diesel::result::Error::NotFound),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
