pub mod create;
pub mod delete;
pub mod get;
pub mod get_link;
pub mod list;
pub mod update;

use crate::api::{favorites, shopping_cart};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints.
///
/// The cart and favorite routes live under /api/recipes/{id} in the HTTP
/// surface, so they are wired here even though their handlers live in
/// sibling modules. The static download_shopping_cart route is registered
/// alongside the {id} capture; the router prefers static segments.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/download_shopping_cart",
            get(shopping_cart::download::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/get-link", get(get_link::get_short_link))
        .route(
            "/{id}/shopping_cart",
            post(shopping_cart::add::add_to_cart).delete(shopping_cart::remove::remove_from_cart),
        )
        .route(
            "/{id}/favorite",
            post(favorites::add::add_favorite).delete(favorites::remove::remove_favorite),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        get_link::get_short_link,
        get_link::resolve_short_link,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        create::IngredientLineRequest,
        list::ListRecipesResponse,
        list::PaginationMetadata,
        list::RecipeSummary,
        get::RecipeResponse,
        get::RecipeIngredientLine,
        update::UpdateRecipeRequest,
        get_link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;
