//! services/api/src/web/compare.rs
//!
//! The price-comparison endpoint: resolves a grocery list against the
//! stores of a ZIP code and returns per-store totals and per-item
//! breakdowns. Responses are cached for a bounded time and recomputed
//! after any list mutation.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use grocery_compare_core::domain::{Comparison, ItemComparison, StorePrice, StoreTotal};
use grocery_compare_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// API Payload and Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ComparisonRequest {
    pub list_id: Uuid,
    /// ZIP code for the store lookup, 5 to 10 characters.
    pub zip_code: String,
}

#[derive(Serialize, ToSchema)]
pub struct StorePriceResponse {
    pub store_id: Uuid,
    pub store_name: String,
    pub store_chain: String,
    pub regular_price: f64,
    pub current_price: f64,
    pub is_on_sale: bool,
    pub sale_expires: Option<NaiveDate>,
    pub unit_price: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct ItemComparisonResponse {
    pub item_name: String,
    pub product_id: Option<Uuid>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub match_confidence: f64,
    pub prices_by_store: Vec<StorePriceResponse>,
    pub cheapest_store_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct StoreTotalResponse {
    pub store_id: Uuid,
    pub store_name: String,
    pub store_chain: String,
    pub store_address: Option<String>,
    pub total_price: f64,
    pub items_found: u32,
    pub items_on_sale: u32,
    pub is_cheapest: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ComparisonResponse {
    pub list_id: Uuid,
    pub list_name: String,
    pub zip_code: String,
    pub store_totals: Vec<StoreTotalResponse>,
    pub item_breakdown: Vec<ItemComparisonResponse>,
    pub cheapest_store_id: Option<Uuid>,
    /// Savings compared to the most expensive qualifying store.
    pub potential_savings: f64,
}

impl From<StorePrice> for StorePriceResponse {
    fn from(price: StorePrice) -> Self {
        Self {
            store_id: price.store_id,
            store_name: price.store_name,
            store_chain: price.store_chain,
            regular_price: price.regular_price,
            current_price: price.current_price,
            is_on_sale: price.is_on_sale,
            sale_expires: price.sale_expires,
            unit_price: price.unit_price,
        }
    }
}

impl From<ItemComparison> for ItemComparisonResponse {
    fn from(item: ItemComparison) -> Self {
        Self {
            item_name: item.item_name,
            product_id: item.product_id,
            quantity: item.quantity,
            unit: item.unit,
            match_confidence: item.match_confidence,
            prices_by_store: item.prices_by_store.into_iter().map(Into::into).collect(),
            cheapest_store_id: item.cheapest_store_id,
        }
    }
}

impl From<StoreTotal> for StoreTotalResponse {
    fn from(total: StoreTotal) -> Self {
        Self {
            store_id: total.store_id,
            store_name: total.store_name,
            store_chain: total.store_chain,
            store_address: total.store_address,
            total_price: total.total_price,
            items_found: total.items_found,
            items_on_sale: total.items_on_sale,
            is_cheapest: total.is_cheapest,
        }
    }
}

impl From<Comparison> for ComparisonResponse {
    fn from(comparison: Comparison) -> Self {
        Self {
            list_id: comparison.list_id,
            list_name: comparison.list_name,
            zip_code: comparison.zip_code,
            store_totals: comparison.store_totals.into_iter().map(Into::into).collect(),
            item_breakdown: comparison
                .item_breakdown
                .into_iter()
                .map(Into::into)
                .collect(),
            cheapest_store_id: comparison.cheapest_store_id,
            potential_savings: comparison.potential_savings,
        }
    }
}

//=========================================================================================
// Handler
//=========================================================================================

/// Compare prices for a grocery list across stores in a specific ZIP code.
#[utoipa::path(
    post,
    path = "/api/compare",
    request_body = ComparisonRequest,
    responses(
        (status = 200, description = "Comparison results", body = ComparisonResponse),
        (status = 404, description = "Unknown list, or no stores in the ZIP code"),
        (status = 422, description = "Invalid ZIP code"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn compare_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ComparisonRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if request.zip_code.len() < 5 || request.zip_code.len() > 10 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "zip_code must be between 5 and 10 characters".to_string(),
        ));
    }

    if let Some(cached) = app_state
        .comparison_cache
        .get(request.list_id, &request.zip_code)
    {
        return Ok(Json(cached));
    }

    let comparison = app_state
        .engine
        .compare(request.list_id, &request.zip_code)
        .await
        .map_err(|e| match e {
            PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            PortError::Unexpected(message) => {
                error!("Comparison failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        })?;

    let response = ComparisonResponse::from(comparison);
    let value = serde_json::to_value(&response).map_err(|e| {
        error!("Failed to serialize comparison: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    })?;

    app_state
        .comparison_cache
        .set(request.list_id, &request.zip_code, value.clone());

    Ok(Json(value))
}
