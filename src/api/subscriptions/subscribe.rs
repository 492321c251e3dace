use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewSubscription;
use crate::schema::{subscriptions, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub user_id: Uuid,
    pub username: String,
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "subscriptions",
    params(
        ("id" = Uuid, Path, description = "User ID to subscribe to")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self-subscription or already subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if id == user.id {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "You cannot subscribe to yourself".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let username: Option<String> = match users::table
        .find(id)
        .select(users::username)
        .first(&mut conn)
        .optional()
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to fetch user: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to subscribe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let username = match username {
        Some(name) => name,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                }),
            )
                .into_response()
        }
    };

    let new_subscription = NewSubscription {
        subscriber_id: user.id,
        subscribed_to_id: id,
    };

    match diesel::insert_into(subscriptions::table)
        .values(&new_subscription)
        .execute(&mut conn)
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(SubscriptionResponse {
                user_id: id,
                username,
            }),
        )
            .into_response(),
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "You are already subscribed to this user".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to subscribe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to subscribe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
