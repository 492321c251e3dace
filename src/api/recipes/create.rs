use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeTag};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientLineRequest {
    pub ingredient_id: Uuid,
    /// Unit-less magnitude, interpreted via the ingredient's measurement unit
    pub amount: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    /// Minutes
    pub cooking_time: i32,
    pub image_url: Option<String>,
    pub ingredients: Vec<IngredientLineRequest>,
    pub tags: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

/// Shape-level validation of an ingredient line set: non-empty, positive
/// amounts, no ingredient referenced twice. Existence of the ids is
/// checked against the store separately.
pub(crate) fn validate_line_shapes(lines: &[IngredientLineRequest]) -> Result<(), String> {
    if lines.is_empty() {
        return Err("Recipe must have at least one ingredient".to_string());
    }

    let mut seen = HashSet::new();
    for line in lines {
        if line.amount < 1 {
            return Err("Ingredient amount must be at least 1".to_string());
        }
        if !seen.insert(line.ingredient_id) {
            return Err("Duplicate ingredient in recipe".to_string());
        }
    }

    Ok(())
}

/// Check that every referenced ingredient id exists in the catalog.
pub(crate) fn all_ingredients_exist(
    conn: &mut PgConnection,
    lines: &[IngredientLineRequest],
) -> Result<bool, diesel::result::Error> {
    let ids: Vec<Uuid> = lines.iter().map(|l| l.ingredient_id).collect();
    let found: i64 = ingredients::table
        .filter(ingredients::id.eq_any(&ids))
        .count()
        .get_result(conn)?;
    Ok(found == ids.len() as i64)
}

/// Check that every referenced tag id exists.
pub(crate) fn all_tags_exist(
    conn: &mut PgConnection,
    tag_ids: &[Uuid],
) -> Result<bool, diesel::result::Error> {
    let distinct: HashSet<Uuid> = tag_ids.iter().copied().collect();
    let found: i64 = tags::table
        .filter(tags::id.eq_any(&distinct))
        .count()
        .get_result(conn)?;
    Ok(found == distinct.len() as i64)
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    if request.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Text cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    if request.cooking_time < 1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Cooking time must be at least 1 minute".to_string(),
            }),
        )
            .into_response();
    }

    if let Err(message) = validate_line_shapes(&request.ingredients) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let mut conn = get_conn!(pool);

    match all_ingredients_exist(&mut conn, &request.ingredients) {
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
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    let tag_ids = request.tags.unwrap_or_default();
    match all_tags_exist(&mut conn, &tag_ids) {
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
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    // Recipe row, ingredient lines, and tag links are created atomically
    let result: Result<Uuid, diesel::result::Error> = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &request.name,
            text: &request.text,
            cooking_time: request.cooking_time,
            image_url: request.image_url.as_deref(),
        };

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        let lines: Vec<NewRecipeIngredient> = request
            .ingredients
            .iter()
            .map(|l| NewRecipeIngredient {
                recipe_id,
                ingredient_id: l.ingredient_id,
                amount: l.amount,
            })
            .collect();

        diesel::insert_into(recipe_ingredients::table)
            .values(&lines)
            .execute(conn)?;

        let links: Vec<NewRecipeTag> = tag_ids
            .iter()
            .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
            .collect();

        if !links.is_empty() {
            diesel::insert_into(recipe_tags::table)
                .values(&links)
                .execute(conn)?;
        }

        Ok(recipe_id)
    });

    match result {
        Ok(recipe_id) => (
            StatusCode::CREATED,
            Json(CreateRecipeResponse { id: recipe_id }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: Uuid, amount: i32) -> IngredientLineRequest {
        IngredientLineRequest {
            ingredient_id: id,
            amount,
        }
    }

    #[test]
    fn test_empty_line_set_rejected() {
        assert!(validate_line_shapes(&[]).is_err());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = vec![line(Uuid::new_v4(), 0)];
        assert!(validate_line_shapes(&lines).is_err());
    }

    #[test]
    fn test_duplicate_ingredient_rejected() {
        let id = Uuid::new_v4();
        let lines = vec![line(id, 1), line(id, 2)];
        assert!(validate_line_shapes(&lines).is_err());
    }

    #[test]
    fn test_valid_lines_accepted() {
        let lines = vec![line(Uuid::new_v4(), 1), line(Uuid::new_v4(), 200)];
        assert!(validate_line_shapes(&lines).is_ok());
    }
}
