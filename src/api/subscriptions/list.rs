use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{recipes, subscriptions, users};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscribedAuthor {
    pub user_id: Uuid,
    pub username: String,
    pub recipe_count: i64,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "subscriptions",
    responses(
        (status = 200, description = "Authors the caller subscribes to", body = Vec<SubscribedAuthor>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let authors: Vec<(Uuid, String)> = match subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::subscribed_to_id)))
        .filter(subscriptions::subscriber_id.eq(user.id))
        .select((users::id, users::username))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list subscriptions: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list subscriptions".to_string(),
                }),
            )
                .into_response();
        }
    };

    let author_ids: Vec<Uuid> = authors.iter().map(|(id, _)| *id).collect();
    let counts: Vec<(Uuid, i64)> = match recipes::table
        .filter(recipes::author_id.eq_any(&author_ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, count_star()))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to count recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list subscriptions".to_string(),
                }),
            )
                .into_response();
        }
    };

    let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

    let mut result: Vec<SubscribedAuthor> = authors
        .into_iter()
        .map(|(user_id, username)| SubscribedAuthor {
            user_id,
            username,
            recipe_count: counts.get(&user_id).copied().unwrap_or(0),
        })
        .collect();

    // Most prolific authors first, username as a stable tiebreak
    result.sort_by(|a, b| {
        b.recipe_count
            .cmp(&a.recipe_count)
            .then_with(|| a.username.cmp(&b.username))
    });

    (StatusCode::OK, Json(result)).into_response()
}
