//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the data-source ports from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::NaiveDate;
use grocery_compare_core::domain::{GroceryList, ListItem, Price, Product, Store};
use grocery_compare_core::ports::{
    CatalogSource, ListSource, PortError, PortResult, PriceSource, StoreSource,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the core's data-source ports and the
/// maintenance queries used by the web layer and the seeder.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProductRecord {
    id: Uuid,
    name: String,
    brand: Option<String>,
    category: Option<String>,
    upc: Option<String>,
    unit_size: Option<f64>,
    unit_type: Option<String>,
}

impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            brand: self.brand,
            category: self.category,
            upc: self.upc,
            unit_size: self.unit_size,
            unit_type: self.unit_type,
        }
    }
}

#[derive(FromRow)]
struct StoreRecord {
    id: Uuid,
    name: String,
    chain: String,
    address: Option<String>,
    zip_code: String,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl StoreRecord {
    fn to_domain(self) -> Store {
        Store {
            id: self.id,
            name: self.name,
            chain: self.chain,
            address: self.address,
            zip_code: self.zip_code,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(FromRow)]
struct PriceRecord {
    id: Uuid,
    product_id: Uuid,
    store_id: Uuid,
    price: f64,
    sale_price: Option<f64>,
    unit_price: Option<f64>,
    effective_date: NaiveDate,
    expiration_date: Option<NaiveDate>,
}

impl PriceRecord {
    fn to_domain(self) -> Price {
        Price {
            id: self.id,
            product_id: self.product_id,
            store_id: self.store_id,
            price: self.price,
            sale_price: self.sale_price,
            unit_price: self.unit_price,
            effective_date: self.effective_date,
            expiration_date: self.expiration_date,
        }
    }
}

#[derive(FromRow)]
struct GroceryListRecord {
    id: Uuid,
    name: String,
    user_id: String,
}

#[derive(FromRow)]
struct ListItemRecord {
    id: Uuid,
    product_id: Option<Uuid>,
    name: String,
    quantity: f64,
    unit: Option<String>,
    notes: Option<String>,
    position: i32,
}

impl ListItemRecord {
    fn to_domain(self) -> ListItem {
        ListItem {
            id: self.id,
            product_id: self.product_id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            notes: self.notes,
            position: self.position,
        }
    }
}

/// A grocery list row joined with its item count, for summary listings.
#[derive(FromRow)]
pub struct ListSummaryRecord {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub item_count: i64,
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// Core Port Implementations
//=========================================================================================

#[async_trait]
impl CatalogSource for DbAdapter {
    async fn list_products(&self) -> PortResult<Vec<Product>> {
        let records = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, name, brand, category, upc, unit_size, unit_type
             FROM products ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn product_by_id(&self, product_id: Uuid) -> PortResult<Option<Product>> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, name, brand, category, upc, unit_size, unit_type
             FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(|r| r.to_domain()))
    }

    async fn product_by_upc(&self, upc: &str) -> PortResult<Option<Product>> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, name, brand, category, upc, unit_size, unit_type
             FROM products WHERE upc = $1",
        )
        .bind(upc)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(|r| r.to_domain()))
    }
}

#[async_trait]
impl PriceSource for DbAdapter {
    async fn latest_price(&self, product_id: Uuid, store_id: Uuid) -> PortResult<Option<Price>> {
        let record = sqlx::query_as::<_, PriceRecord>(
            "SELECT id, product_id, store_id, price, sale_price, unit_price,
                    effective_date, expiration_date
             FROM prices
             WHERE product_id = $1 AND store_id = $2
             ORDER BY effective_date DESC
             LIMIT 1",
        )
        .bind(product_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(|r| r.to_domain()))
    }
}

#[async_trait]
impl StoreSource for DbAdapter {
    async fn stores_in_zip(&self, zip_code: &str) -> PortResult<Vec<Store>> {
        let records = sqlx::query_as::<_, StoreRecord>(
            "SELECT id, name, chain, address, zip_code, lat, lng
             FROM stores WHERE zip_code = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(zip_code)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

#[async_trait]
impl ListSource for DbAdapter {
    async fn list_with_items(&self, list_id: Uuid) -> PortResult<Option<GroceryList>> {
        let list = sqlx::query_as::<_, GroceryListRecord>(
            "SELECT id, name, user_id FROM grocery_lists WHERE id = $1",
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(list) = list else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ListItemRecord>(
            "SELECT id, product_id, name, quantity, unit, notes, position
             FROM grocery_list_items
             WHERE grocery_list_id = $1
             ORDER BY position ASC",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(Some(GroceryList {
            id: list.id,
            name: list.name,
            user_id: list.user_id,
            items: items.into_iter().map(|r| r.to_domain()).collect(),
        }))
    }
}

//=========================================================================================
// Maintenance Queries (web layer and seeder)
//=========================================================================================

impl DbAdapter {
    /// Inserts a list and its items in one transaction. Item positions
    /// are taken from the `ListItem` values as provided.
    pub async fn create_list(
        &self,
        name: &str,
        user_id: &str,
        items: &[ListItem],
    ) -> Result<Uuid, sqlx::Error> {
        let list_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO grocery_lists (id, name, user_id) VALUES ($1, $2, $3)")
            .bind(list_id)
            .bind(name)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for item in items {
            insert_item(&mut tx, list_id, item).await?;
        }

        tx.commit().await?;
        Ok(list_id)
    }

    /// Updates a list's name and/or replaces its items wholesale.
    /// Returns false if the list does not exist.
    pub async fn update_list(
        &self,
        list_id: Uuid,
        name: Option<&str>,
        items: Option<&[ListItem]>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM grocery_lists WHERE id = $1)",
        )
        .bind(list_id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Ok(false);
        }

        if let Some(name) = name {
            sqlx::query("UPDATE grocery_lists SET name = $1 WHERE id = $2")
                .bind(name)
                .bind(list_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(items) = items {
            sqlx::query("DELETE FROM grocery_list_items WHERE grocery_list_id = $1")
                .bind(list_id)
                .execute(&mut *tx)
                .await?;
            for item in items {
                insert_item(&mut tx, list_id, item).await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Deletes a list and (via cascade) its items. Returns false if the
    /// list does not exist.
    pub async fn delete_list(&self, list_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM grocery_lists WHERE id = $1")
            .bind(list_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Summaries of a user's lists with item counts, newest first.
    pub async fn list_summaries(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ListSummaryRecord>, sqlx::Error> {
        sqlx::query_as::<_, ListSummaryRecord>(
            "SELECT l.id, l.name, l.user_id, COUNT(i.id) AS item_count
             FROM grocery_lists l
             LEFT JOIN grocery_list_items i ON i.grocery_list_id = l.id
             WHERE l.user_id = $1
             GROUP BY l.id, l.name, l.user_id, l.created_at
             ORDER BY l.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert_product(&self, product: &Product) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO products (id, name, brand, category, upc, unit_size, unit_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.upc)
        .bind(product.unit_size)
        .bind(&product.unit_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_store(&self, store: &Store) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO stores (id, name, chain, address, zip_code, lat, lng)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.chain)
        .bind(&store.address)
        .bind(&store.zip_code)
        .bind(store.lat)
        .bind(store.lng)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_price(&self, price: &Price) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO prices (id, product_id, store_id, price, sale_price, unit_price,
                                 effective_date, expiration_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(price.id)
        .bind(price.product_id)
        .bind(price.store_id)
        .bind(price.price)
        .bind(price.sale_price)
        .bind(price.unit_price)
        .bind(price.effective_date)
        .bind(price.expiration_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    list_id: Uuid,
    item: &ListItem,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO grocery_list_items
             (id, grocery_list_id, product_id, name, quantity, unit, notes, position)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(item.id)
    .bind(list_id)
    .bind(item.product_id)
    .bind(&item.name)
    .bind(item.quantity)
    .bind(&item.unit)
    .bind(&item.notes)
    .bind(item.position)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
