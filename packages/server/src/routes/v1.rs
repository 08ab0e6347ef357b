use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/catalog", catalog_routes())
        .nest("/products", product_routes(config))
        .nest("/orders", order_routes())
        .nest("/me", me_routes())
        .route("/assets/{*path}", get(handlers::assets::serve_asset))
}

fn catalog_routes() -> OpenApiRouter<AppState> {
    use crate::handlers::catalog::*;

    OpenApiRouter::new()
        .routes(routes!(search_catalog))
        .routes(routes!(clear_search))
        .routes(routes!(get_entry))
        .routes(routes!(open_entry))
}

fn product_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    use crate::handlers::products::*;

    OpenApiRouter::new()
        .routes(routes!(create_product))
        .routes(routes!(update_product, delete_product))
        .layer(product_body_limit(config.catalog.max_image_bytes))
}

fn order_routes() -> OpenApiRouter<AppState> {
    use crate::handlers::orders::*;

    OpenApiRouter::new()
        .routes(routes!(quote_order))
        .routes(routes!(submit_order))
}

fn me_routes() -> OpenApiRouter<AppState> {
    use crate::handlers::me::*;

    OpenApiRouter::new().routes(routes!(get_capabilities))
}
