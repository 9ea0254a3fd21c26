//! services/api/src/web/mod.rs
//!
//! Axum handlers and the master OpenAPI definition.

pub mod compare;
pub mod lists;
pub mod products;
pub mod state;

use axum::response::Json;
use utoipa::OpenApi;

pub use compare::compare_handler;
pub use lists::{
    create_list_handler, delete_list_handler, get_list_handler, get_lists_handler,
    update_list_handler,
};
pub use products::{
    best_match_handler, match_by_upc_handler, match_products_handler, refresh_cache_handler,
    similar_products_handler,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        lists::create_list_handler,
        lists::get_lists_handler,
        lists::get_list_handler,
        lists::update_list_handler,
        lists::delete_list_handler,
        compare::compare_handler,
        products::match_products_handler,
        products::best_match_handler,
        products::match_by_upc_handler,
        products::similar_products_handler,
        products::refresh_cache_handler,
    ),
    components(
        schemas(
            lists::ListItemPayload,
            lists::CreateListPayload,
            lists::UpdateListPayload,
            lists::ListItemResponse,
            lists::ListResponse,
            lists::ListSummaryResponse,
            compare::ComparisonRequest,
            compare::StorePriceResponse,
            compare::ItemComparisonResponse,
            compare::StoreTotalResponse,
            compare::ComparisonResponse,
            products::MatchResponse,
        )
    ),
    tags(
        (name = "GroceryCompare API", description = "A grocery price comparison API that helps users find the best prices across local stores.")
    )
)]
pub struct ApiDoc;

/// Root endpoint returning API information.
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "GroceryCompare API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api-docs/openapi.json",
    }))
}

/// Health check endpoint.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
