//! crates/grocery_compare_core/src/ports.rs
//!
//! Defines the data-source contracts (traits) for the comparison core.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{GroceryList, Price, Product, Store};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
///
/// Transient data-source failures surface as `Unexpected` and propagate
/// as-is; they are never folded into a "no match" result.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Data Source Ports (Traits)
//=========================================================================================

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All products, in a stable catalog order.
    async fn list_products(&self) -> PortResult<Vec<Product>>;

    async fn product_by_id(&self, product_id: Uuid) -> PortResult<Option<Product>>;

    /// Exact-equality UPC lookup.
    async fn product_by_upc(&self, upc: &str) -> PortResult<Option<Product>>;
}

/// Read access to store price records.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// The record with the most recent effective date for the pair, if any.
    async fn latest_price(&self, product_id: Uuid, store_id: Uuid) -> PortResult<Option<Price>>;
}

/// Read access to store locations.
#[async_trait]
pub trait StoreSource: Send + Sync {
    /// Stores whose ZIP code matches exactly, preserving source order.
    async fn stores_in_zip(&self, zip_code: &str) -> PortResult<Vec<Store>>;
}

/// Read access to shopping lists.
#[async_trait]
pub trait ListSource: Send + Sync {
    /// A list with its items ordered by position, or `None` if it does not exist.
    async fn list_with_items(&self, list_id: Uuid) -> PortResult<Option<GroceryList>>;
}
