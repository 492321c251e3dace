use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipeIngredient, NewRecipeTag};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::create::{
    all_ingredients_exist, all_tags_exist, validate_line_shapes, IngredientLineRequest,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image_url: Option<String>,
    /// When present, replaces the full ingredient line set
    pub ingredients: Option<Vec<IngredientLineRequest>>,
    /// When present, replaces the full tag set
    pub tags: Option<Vec<Uuid>>,
}

#[derive(AsChangeset)]
#[diesel(table_name = recipes)]
struct RecipeChanges<'a> {
    name: Option<&'a str>,
    text: Option<&'a str>,
    cooking_time: Option<i32>,
    image_url: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 204, description = "Recipe updated successfully"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> impl IntoResponse {
    if let Some(ref name) = request.name {
        if name.trim().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Name cannot be empty".to_string(),
                }),
            )
                .into_response();
        }
    }

    if let Some(ref text) = request.text {
        if text.trim().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Text cannot be empty".to_string(),
                }),
            )
                .into_response();
        }
    }

    if matches!(request.cooking_time, Some(t) if t < 1) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Cooking time must be at least 1 minute".to_string(),
            }),
        )
            .into_response();
    }

    if let Some(ref lines) = request.ingredients {
        if let Err(message) = validate_line_shapes(lines) {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                .into_response();
        }
    }

    let mut conn = get_conn!(pool);

    // Only the author may edit
    let author_id: Option<Uuid> = match recipes::table
        .filter(recipes::id.eq(id))
        .select(recipes::author_id)
        .first(&mut conn)
        .optional()
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    match author_id {
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Some(author) if author != user.id => {
            return (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Only the author can edit this recipe".to_string(),
                }),
            )
                .into_response()
        }
        Some(_) => {}
    }

    if let Some(ref lines) = request.ingredients {
        match all_ingredients_exist(&mut conn, lines) {
            Ok(true) => {}
            Ok(false) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Unknown ingredient id".to_string(),
                    }),
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!("Failed to validate ingredients: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to update recipe".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    if let Some(ref tag_ids) = request.tags {
        match all_tags_exist(&mut conn, tag_ids) {
            Ok(true) => {}
            Ok(false) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Unknown tag id".to_string(),
                    }),
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!("Failed to validate tags: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to update recipe".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    // Field updates and line/tag set replacement happen atomically; a
    // concurrent aggregation sees either the old or the new line set,
    // never a partially replaced one.
    let result: Result<(), diesel::result::Error> = conn.transaction(|conn| {
        let changes = RecipeChanges {
            name: request.name.as_deref(),
            text: request.text.as_deref(),
            cooking_time: request.cooking_time,
            image_url: request.image_url.as_deref(),
            updated_at: Utc::now(),
        };

        diesel::update(recipes::table.find(id))
            .set(&changes)
            .execute(conn)?;

        if let Some(ref lines) = request.ingredients {
            diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)))
                .execute(conn)?;

            let new_lines: Vec<NewRecipeIngredient> = lines
                .iter()
                .map(|l| NewRecipeIngredient {
                    recipe_id: id,
                    ingredient_id: l.ingredient_id,
                    amount: l.amount,
                })
                .collect();

            diesel::insert_into(recipe_ingredients::table)
                .values(&new_lines)
                .execute(conn)?;
        }

        if let Some(ref tag_ids) = request.tags {
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id)))
                .execute(conn)?;

            let links: Vec<NewRecipeTag> = tag_ids
                .iter()
                .map(|&tag_id| NewRecipeTag {
                    recipe_id: id,
                    tag_id,
                })
                .collect();

            if !links.is_empty() {
                diesel::insert_into(recipe_tags::table)
                    .values(&links)
                    .execute(conn)?;
            }
        }

        Ok(())
    });

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
