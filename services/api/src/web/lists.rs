//! services/api/src/web/lists.rs
//!
//! Axum handlers for grocery list CRUD.

use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use grocery_compare_core::domain::{GroceryList, ListItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// API Payload and Response Structs
//=========================================================================================

/// One item in a create/update payload.
#[derive(Deserialize, ToSchema)]
pub struct ListItemPayload {
    pub name: String,
    /// Defaults to 1; must be strictly positive.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
    /// Pins the item to a specific catalog product, skipping fuzzy matching.
    pub product_id: Option<Uuid>,
}

fn default_quantity() -> f64 {
    1.0
}

#[derive(Deserialize, ToSchema)]
pub struct CreateListPayload {
    pub name: String,
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<ListItemPayload>,
}

/// Partial update: a new name and/or a full item replacement.
#[derive(Deserialize, ToSchema)]
pub struct UpdateListPayload {
    pub name: Option<String>,
    pub items: Option<Vec<ListItemPayload>>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListsQuery {
    pub user_id: String,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_limit")]
    pub limit: i64,
}

fn default_page_limit() -> i64 {
    100
}

#[derive(Serialize, ToSchema)]
pub struct ListItemResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub position: i32,
}

#[derive(Serialize, ToSchema)]
pub struct ListResponse {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub items: Vec<ListItemResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct ListSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub item_count: i64,
}

impl From<GroceryList> for ListResponse {
    fn from(list: GroceryList) -> Self {
        Self {
            id: list.id,
            name: list.name,
            user_id: list.user_id,
            items: list
                .items
                .into_iter()
                .map(|item| ListItemResponse {
                    id: item.id,
                    product_id: item.product_id,
                    name: item.name,
                    quantity: item.quantity,
                    unit: item.unit,
                    notes: item.notes,
                    position: item.position,
                })
                .collect(),
        }
    }
}

/// Turns payload items into domain items, assigning positions in payload
/// order. Non-positive quantities are rejected here, before anything
/// reaches the database or the comparison core.
pub(crate) fn build_items(
    items: Vec<ListItemPayload>,
) -> Result<Vec<ListItem>, (StatusCode, String)> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, payload)| {
            if payload.quantity <= 0.0 {
                return Err((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Item '{}': quantity must be positive", payload.name),
                ));
            }
            Ok(ListItem {
                id: Uuid::new_v4(),
                product_id: payload.product_id,
                name: payload.name,
                quantity: payload.quantity,
                unit: payload.unit,
                notes: payload.notes,
                position: position as i32,
            })
        })
        .collect()
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    error!("Database error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn list_not_found(list_id: Uuid) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Grocery list with ID {} not found", list_id),
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Create a new grocery list with optional initial items.
#[utoipa::path(
    post,
    path = "/api/lists",
    request_body = CreateListPayload,
    responses(
        (status = 201, description = "List created", body = ListResponse),
        (status = 422, description = "Invalid item quantity"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_list_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateListPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let items = build_items(payload.items)?;

    let list_id = app_state
        .db
        .create_list(&payload.name, &payload.user_id, &items)
        .await
        .map_err(internal)?;

    let list = fetch_list(&app_state, list_id).await?;
    Ok((StatusCode::CREATED, Json(ListResponse::from(list))))
}

/// All grocery lists for a user, as summaries.
#[utoipa::path(
    get,
    path = "/api/lists",
    params(ListsQuery),
    responses(
        (status = 200, description = "List summaries", body = [ListSummaryResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_lists_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summaries = app_state
        .db
        .list_summaries(&query.user_id, query.limit, query.skip)
        .await
        .map_err(internal)?;

    let response: Vec<ListSummaryResponse> = summaries
        .into_iter()
        .map(|s| ListSummaryResponse {
            id: s.id,
            name: s.name,
            user_id: s.user_id,
            item_count: s.item_count,
        })
        .collect();
    Ok(Json(response))
}

/// A specific grocery list with all its items.
#[utoipa::path(
    get,
    path = "/api/lists/{list_id}",
    params(("list_id" = Uuid, Path, description = "Grocery list ID")),
    responses(
        (status = 200, description = "The list", body = ListResponse),
        (status = 404, description = "List not found")
    )
)]
pub async fn get_list_handler(
    State(app_state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let list = fetch_list(&app_state, list_id).await?;
    Ok(Json(ListResponse::from(list)))
}

/// Update a list's name and/or replace all of its items.
#[utoipa::path(
    put,
    path = "/api/lists/{list_id}",
    params(("list_id" = Uuid, Path, description = "Grocery list ID")),
    request_body = UpdateListPayload,
    responses(
        (status = 200, description = "The updated list", body = ListResponse),
        (status = 404, description = "List not found"),
        (status = 422, description = "Invalid item quantity")
    )
)]
pub async fn update_list_handler(
    State(app_state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<UpdateListPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let items = match payload.items {
        Some(items) => Some(build_items(items)?),
        None => None,
    };

    let updated = app_state
        .db
        .update_list(list_id, payload.name.as_deref(), items.as_deref())
        .await
        .map_err(internal)?;
    if !updated {
        return Err(list_not_found(list_id));
    }

    // The cached comparisons for this list are stale now.
    app_state.comparison_cache.invalidate_list(list_id);

    let list = fetch_list(&app_state, list_id).await?;
    Ok(Json(ListResponse::from(list)))
}

/// Delete a grocery list and all its items.
#[utoipa::path(
    delete,
    path = "/api/lists/{list_id}",
    params(("list_id" = Uuid, Path, description = "Grocery list ID")),
    responses(
        (status = 204, description = "List deleted"),
        (status = 404, description = "List not found")
    )
)]
pub async fn delete_list_handler(
    State(app_state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = app_state
        .db
        .delete_list(list_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(list_not_found(list_id));
    }

    app_state.comparison_cache.invalidate_list(list_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_list(
    app_state: &AppState,
    list_id: Uuid,
) -> Result<GroceryList, (StatusCode, String)> {
    use grocery_compare_core::ports::ListSource;

    app_state
        .db
        .list_with_items(list_id)
        .await
        .map_err(|e| {
            error!("Failed to load list {}: {:?}", list_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?
        .ok_or_else(|| list_not_found(list_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, quantity: f64) -> ListItemPayload {
        ListItemPayload {
            name: name.to_string(),
            quantity,
            unit: None,
            notes: None,
            product_id: None,
        }
    }

    #[test]
    fn items_get_positions_in_payload_order() {
        let items = build_items(vec![payload("Milk", 1.0), payload("Eggs", 2.0)]).unwrap();

        assert_eq!(items[0].position, 0);
        assert_eq!(items[1].position, 1);
        assert_eq!(items[1].quantity, 2.0);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let err = build_items(vec![payload("Milk", 0.0)]).unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let err = build_items(vec![payload("Milk", -1.5)]).unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
