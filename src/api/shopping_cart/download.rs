use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::shopping::{self, AggregateError, ExportFormat};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DownloadParams {
    /// MIME type of the export, "application/pdf" when omitted
    pub format: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "shopping_cart",
    params(DownloadParams),
    responses(
        (status = 200, description = "Aggregated shopping list", content_type = "application/pdf"),
        (status = 400, description = "Unsupported export format", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<DownloadParams>,
) -> impl IntoResponse {
    let requested = params.format.as_deref().unwrap_or("application/pdf");
    let format = match ExportFormat::parse(requested) {
        Ok(format) => format,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let lines = match shopping::aggregate_for_user(&mut conn, user.id) {
        Ok(lines) => lines,
        Err(AggregateError::UnknownUser) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(AggregateError::Database(e)) => {
            tracing::error!("Failed to aggregate shopping cart: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build shopping list".to_string(),
                }),
            )
                .into_response();
        }
    };

    let bytes = shopping::render(&lines, format);
    let filename = format!(
        "shopping_list_{}.{}",
        user.username,
        format.file_extension()
    );

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
    {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to build download response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build shopping list".to_string(),
                }),
            )
                .into_response()
        }
    }
}
