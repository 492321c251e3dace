use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive name prefix to search for
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Matching ingredients, ordered by name", body = Vec<Ingredient>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListIngredientsParams>,
) -> impl IntoResponse {
    // Pre-compute the pattern so it lives long enough for the boxed query
    let prefix_pattern = params
        .name
        .as_ref()
        .map(|n| format!("{}%", n.replace('%', "\\%").replace('_', "\\_")));

    let mut conn = get_conn!(pool);

    let mut query = ingredients::table.into_boxed();

    if let Some(ref pattern) = prefix_pattern {
        query = query.filter(ingredients::name.ilike(pattern));
    }

    match query
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .load(&mut conn)
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list ingredients: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list ingredients".to_string(),
                }),
            )
                .into_response()
        }
    }
}
