//! services/api/src/web/products.rs
//!
//! Axum handlers exposing the product matcher: fuzzy search, UPC lookup,
//! similar products, and a cache refresh hook for catalog maintenance.

use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use grocery_compare_core::domain::MatchResult;
use grocery_compare_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchQuery {
    /// Free-text product name to match.
    pub query: String,
    #[serde(default = "default_match_limit")]
    pub limit: usize,
}

fn default_match_limit() -> usize {
    5
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimilarQuery {
    #[serde(default = "default_match_limit")]
    pub limit: usize,
}

#[derive(Serialize, ToSchema)]
pub struct MatchResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub upc: Option<String>,
    /// Match confidence, 0–100.
    pub score: f64,
}

impl From<MatchResult> for MatchResponse {
    fn from(result: MatchResult) -> Self {
        Self {
            product_id: result.product_id,
            product_name: result.product_name,
            brand: result.brand,
            category: result.category,
            upc: result.upc,
            score: result.score,
        }
    }
}

fn port_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        PortError::Unexpected(message) => {
            error!("Matcher data source error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

/// Ranked fuzzy matches for a free-text product name.
#[utoipa::path(
    get,
    path = "/api/products/match",
    params(MatchQuery),
    responses(
        (status = 200, description = "Ranked matches", body = [MatchResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn match_products_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let matches = app_state
        .matcher
        .find_matches(&query.query, query.limit)
        .await
        .map_err(port_error)?;

    let response: Vec<MatchResponse> = matches.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// The single best match for a free-text product name.
#[utoipa::path(
    get,
    path = "/api/products/match/best",
    params(MatchQuery),
    responses(
        (status = 200, description = "The best match", body = MatchResponse),
        (status = 404, description = "Nothing matched above the threshold")
    )
)]
pub async fn best_match_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let best = app_state
        .matcher
        .find_best_match(&query.query)
        .await
        .map_err(port_error)?;

    match best {
        Some(result) => Ok(Json(MatchResponse::from(result))),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("No product matched '{}'", query.query),
        )),
    }
}

/// Exact product lookup by UPC code.
#[utoipa::path(
    get,
    path = "/api/products/upc/{upc}",
    params(("upc" = String, Path, description = "UPC code")),
    responses(
        (status = 200, description = "The product", body = MatchResponse),
        (status = 404, description = "No product with that UPC")
    )
)]
pub async fn match_by_upc_handler(
    State(app_state): State<Arc<AppState>>,
    Path(upc): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let result = app_state
        .matcher
        .match_by_upc(&upc)
        .await
        .map_err(port_error)?;

    match result {
        Some(result) => Ok(Json(MatchResponse::from(result))),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("No product with UPC {}", upc),
        )),
    }
}

/// Products similar to a given catalog product.
#[utoipa::path(
    get,
    path = "/api/products/{product_id}/similar",
    params(
        ("product_id" = Uuid, Path, description = "Reference product ID"),
        SimilarQuery
    ),
    responses(
        (status = 200, description = "Similar products", body = [MatchResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn similar_products_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<SimilarQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let matches = app_state
        .matcher
        .get_similar_products(product_id, query.limit)
        .await
        .map_err(port_error)?;

    let response: Vec<MatchResponse> = matches.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// Rebuild the matcher's catalog snapshot after catalog maintenance.
#[utoipa::path(
    post,
    path = "/api/products/refresh-cache",
    responses(
        (status = 204, description = "Snapshot rebuilt"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn refresh_cache_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state.matcher.refresh_cache().await.map_err(port_error)?;
    Ok(StatusCode::NO_CONTENT)
}
