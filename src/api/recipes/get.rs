use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Recipe, Tag};
use crate::schema::{cart_entries, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientLine {
    pub ingredient_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image_url: Option<String>,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub tags: Vec<Tag>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe detail", body = RecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let found: Option<(Recipe, String)> = match recipes::table
        .inner_join(users::table)
        .filter(recipes::id.eq(id))
        .select((Recipe::as_select(), users::username))
        .first(&mut conn)
        .optional()
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let (recipe, author_username) = match found {
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

    let lines: Vec<(Uuid, String, String, i32)> = match recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(id))
        .order(ingredients::name.asc())
        .select((
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipe ingredients: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let recipe_tag_list: Vec<Tag> = match recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq(id))
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipe tags: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let is_favorited: bool = diesel::select(exists(
        favorites::table
            .filter(favorites::user_id.eq(user.id))
            .filter(favorites::recipe_id.eq(id)),
    ))
    .get_result(&mut conn)
    .unwrap_or(false);

    let is_in_shopping_cart: bool = diesel::select(exists(
        cart_entries::table
            .filter(cart_entries::user_id.eq(user.id))
            .filter(cart_entries::recipe_id.eq(id)),
    ))
    .get_result(&mut conn)
    .unwrap_or(false);

    let response = RecipeResponse {
        id: recipe.id,
        author_id: recipe.author_id,
        author_username,
        name: recipe.name,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        image_url: recipe.image_url,
        ingredients: lines
            .into_iter()
            .map(
                |(ingredient_id, name, measurement_unit, amount)| RecipeIngredientLine {
                    ingredient_id,
                    name,
                    measurement_unit,
                    amount,
                },
            )
            .collect(),
        tags: recipe_tag_list,
        is_favorited,
        is_in_shopping_cart,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    };

    (StatusCode::OK, Json(response)).into_response()
}
