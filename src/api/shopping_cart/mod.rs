pub mod add;
pub mod download;
pub mod remove;

use utoipa::OpenApi;

// Routes are registered under /api/recipes by the recipes router.
#[derive(OpenApi)]
#[openapi(
    paths(
        add::add_to_cart,
        remove::remove_from_cart,
        download::download_shopping_cart,
    ),
    components(schemas(add::CartEntryResponse))
)]
pub struct ApiDoc;
