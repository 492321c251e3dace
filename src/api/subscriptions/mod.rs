pub mod list;
pub mod subscribe;
pub mod unsubscribe;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(list::list_subscriptions))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(unsubscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        subscribe::subscribe,
        unsubscribe::unsubscribe,
        list::list_subscriptions,
    ),
    components(schemas(subscribe::SubscriptionResponse, list::SubscribedAuthor))
)]
pub struct ApiDoc;
