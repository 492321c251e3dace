pub mod get;
pub mod list;

use crate::AppState;
use axum::{routing::get, Router};
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_ingredients))
        .route("/{id}", get(get::get_ingredient))
}

#[derive(OpenApi)]
#[openapi(paths(list::list_ingredients, get::get_ingredient))]
pub struct ApiDoc;
