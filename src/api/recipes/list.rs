use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::raw_sql::count_over;
use crate::schema::{cart_entries, favorites, recipe_tags, recipes, tags};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Filter by recipe author
    pub author: Option<Uuid>,
    /// Comma-separated tag slugs; a recipe matches if it carries any of them
    pub tags: Option<String>,
    /// Only recipes the caller has favorited
    pub is_favorited: Option<bool>,
    /// Only recipes in the caller's shopping cart
    pub is_in_shopping_cart: Option<bool>,
}

/// Split a comma-separated tag slug list, dropping empty segments.
fn parse_tag_slugs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items available
    pub total: i64,
    /// Number of items requested (limit)
    pub limit: i64,
    /// Number of items skipped (offset)
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub cooking_time: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PaginationMetadata,
}

// Type alias for query result row
type RecipeRow = (Uuid, Uuid, String, i32, Option<String>, DateTime<Utc>, i64);

/// Total match count from the page's window column. `None` when the page
/// is empty: an offset past the last match returns no rows, so the window
/// count is unavailable and the caller must count separately.
fn total_from_page(rows: &[RecipeRow]) -> Option<i64> {
    rows.last().map(|r| r.6)
}

/// Apply the list filters to a boxed recipes query. Used for both the page
/// select and the fallback count so the two can never disagree.
fn apply_filters(
    mut query: recipes::BoxedQuery<'static, diesel::pg::Pg>,
    params: &ListRecipesParams,
    user_id: Uuid,
) -> recipes::BoxedQuery<'static, diesel::pg::Pg> {
    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if let Some(raw) = params.tags.as_deref() {
        let slugs = parse_tag_slugs(raw);
        if !slugs.is_empty() {
            let tagged = recipe_tags::table
                .inner_join(tags::table)
                .filter(tags::slug.eq_any(slugs))
                .select(recipe_tags::recipe_id);
            query = query.filter(recipes::id.eq_any(tagged));
        }
    }

    if params.is_favorited == Some(true) {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .select(favorites::recipe_id);
        query = query.filter(recipes::id.eq_any(favorited));
    }

    if params.is_in_shopping_cart == Some(true) {
        let carted = cart_entries::table
            .filter(cart_entries::user_id.eq(user_id))
            .select(cart_entries::recipe_id);
        query = query.filter(recipes::id.eq_any(carted));
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "List of recipes, newest first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn!(pool);

    let query = apply_filters(recipes::table.into_boxed(), &params, user.id);

    let rows: Vec<RecipeRow> = match query
        .select((
            recipes::id,
            recipes::author_id,
            recipes::name,
            recipes::cooking_time,
            recipes::image_url,
            recipes::created_at,
            count_over(),
        ))
        .order(recipes::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Total comes from the page's window column. An empty page can still
    // mean matches exist (offset past the end), so recount in that case.
    let total = match total_from_page(&rows) {
        Some(total) => total,
        None => {
            match apply_filters(recipes::table.into_boxed(), &params, user.id)
                .count()
                .get_result(&mut conn)
            {
                Ok(total) => total,
                Err(e) => {
                    tracing::error!("Failed to count recipes: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to fetch recipes".to_string(),
                        }),
                    )
                        .into_response();
                }
            }
        }
    };

    let recipes = rows
        .into_iter()
        .map(
            |(id, author_id, name, cooking_time, image_url, created_at, _)| RecipeSummary {
                id,
                author_id,
                name,
                cooking_time,
                image_url,
                created_at,
            },
        )
        .collect();

    (
        StatusCode::OK,
        Json(ListRecipesResponse {
            recipes,
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_slug() {
        assert_eq!(parse_tag_slugs("breakfast"), vec!["breakfast"]);
    }

    #[test]
    fn test_parse_multiple_slugs() {
        assert_eq!(
            parse_tag_slugs("breakfast,dinner"),
            vec!["breakfast", "dinner"]
        );
    }

    #[test]
    fn test_parse_trims_and_drops_empty_segments() {
        assert_eq!(parse_tag_slugs(" breakfast , ,dinner,"), vec!["breakfast", "dinner"]);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(parse_tag_slugs("").is_empty());
    }

    fn row(total: i64) -> RecipeRow {
        (
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Pancakes".to_string(),
            20,
            None,
            Utc::now(),
            total,
        )
    }

    #[test]
    fn test_total_taken_from_window_column() {
        assert_eq!(total_from_page(&[row(7), row(7)]), Some(7));
    }

    #[test]
    fn test_empty_page_forces_recount() {
        // Offset past the last match yields no rows even when matches
        // exist, so the window count must not be trusted here.
        assert_eq!(total_from_page(&[]), None);
    }
}
