pub mod add;
pub mod remove;

use utoipa::OpenApi;

// Routes are registered under /api/recipes by the recipes router.
#[derive(OpenApi)]
#[openapi(
    paths(add::add_favorite, remove::remove_favorite),
    components(schemas(add::FavoriteResponse))
)]
pub struct ApiDoc;
