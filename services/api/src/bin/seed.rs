//! services/api/src/bin/seed.rs
//!
//! Loads deterministic sample data: a catalog of common grocery products,
//! a handful of San Diego stores, price records (some on sale), and one
//! demo shopping list.

use api_lib::{adapters::DbAdapter, config::Config, error::ApiError};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use grocery_compare_core::domain::{ListItem, Price, Product, Store};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

struct ProductSeed {
    name: &'static str,
    brand: Option<&'static str>,
    category: &'static str,
    upc: Option<&'static str>,
    unit_size: f64,
    unit_type: &'static str,
    base_price: f64,
}

const PRODUCTS: &[ProductSeed] = &[
    // Dairy
    ProductSeed { name: "Whole Milk", brand: Some("Organic Valley"), category: "Dairy", upc: Some("093966000016"), unit_size: 1.0, unit_type: "gallon", base_price: 5.99 },
    ProductSeed { name: "2% Milk", brand: Some("Horizon Organic"), category: "Dairy", upc: Some("742365004148"), unit_size: 0.5, unit_type: "gallon", base_price: 5.49 },
    ProductSeed { name: "Large Eggs", brand: Some("Eggland's Best"), category: "Dairy", upc: Some("070097000289"), unit_size: 12.0, unit_type: "count", base_price: 4.99 },
    ProductSeed { name: "Greek Yogurt", brand: Some("Chobani"), category: "Dairy", upc: Some("818290010636"), unit_size: 5.3, unit_type: "oz", base_price: 1.49 },
    ProductSeed { name: "Cheddar Cheese", brand: Some("Tillamook"), category: "Dairy", upc: Some("072830000314"), unit_size: 8.0, unit_type: "oz", base_price: 4.99 },
    // Bread & Bakery
    ProductSeed { name: "White Bread", brand: Some("Wonder"), category: "Bread", upc: Some("045000100022"), unit_size: 20.0, unit_type: "oz", base_price: 3.49 },
    ProductSeed { name: "Bagels", brand: Some("Thomas'"), category: "Bread", upc: Some("048121212230"), unit_size: 6.0, unit_type: "count", base_price: 4.99 },
    // Produce
    ProductSeed { name: "Bananas", brand: None, category: "Produce", upc: Some("4011"), unit_size: 1.0, unit_type: "lb", base_price: 0.59 },
    ProductSeed { name: "Baby Spinach", brand: Some("Earthbound Farm"), category: "Produce", upc: Some("032601505051"), unit_size: 5.0, unit_type: "oz", base_price: 4.99 },
    // Meat
    ProductSeed { name: "Chicken Breast", brand: Some("Tyson"), category: "Meat", upc: Some("023700014500"), unit_size: 1.0, unit_type: "lb", base_price: 3.99 },
    ProductSeed { name: "Bacon", brand: Some("Oscar Mayer"), category: "Meat", upc: Some("044700079751"), unit_size: 16.0, unit_type: "oz", base_price: 7.99 },
    // Beverages
    ProductSeed { name: "Coca-Cola", brand: Some("Coca-Cola"), category: "Beverages", upc: Some("049000042566"), unit_size: 12.0, unit_type: "count", base_price: 7.99 },
    ProductSeed { name: "Orange Juice", brand: Some("Tropicana"), category: "Beverages", upc: Some("048500202822"), unit_size: 52.0, unit_type: "oz", base_price: 4.99 },
    ProductSeed { name: "Coffee", brand: Some("Folgers"), category: "Beverages", upc: Some("025500000121"), unit_size: 30.6, unit_type: "oz", base_price: 9.99 },
    // Cereal
    ProductSeed { name: "Cheerios", brand: Some("General Mills"), category: "Cereal", upc: Some("016000275287"), unit_size: 10.8, unit_type: "oz", base_price: 5.49 },
    ProductSeed { name: "Frosted Flakes", brand: Some("Kellogg's"), category: "Cereal", upc: Some("038000001109"), unit_size: 13.5, unit_type: "oz", base_price: 4.99 },
    // Canned Goods
    ProductSeed { name: "Chicken Noodle Soup", brand: Some("Campbell's"), category: "Canned", upc: Some("051000012524"), unit_size: 10.75, unit_type: "oz", base_price: 1.99 },
    // Snacks
    ProductSeed { name: "Oreo Cookies", brand: Some("Nabisco"), category: "Snacks", upc: Some("044000006150"), unit_size: 14.3, unit_type: "oz", base_price: 5.49 },
];

struct StoreSeed {
    name: &'static str,
    chain: &'static str,
    address: &'static str,
    zip_code: &'static str,
    lat: f64,
    lng: f64,
}

const STORES: &[StoreSeed] = &[
    StoreSeed { name: "Kroger - Main St", chain: "Kroger", address: "100 Main Street", zip_code: "92101", lat: 32.7157, lng: -117.1611 },
    StoreSeed { name: "Ralphs - Downtown", chain: "Kroger", address: "200 Broadway", zip_code: "92101", lat: 32.7190, lng: -117.1625 },
    StoreSeed { name: "Walmart Supercenter", chain: "Walmart", address: "500 Commerce Way", zip_code: "92101", lat: 32.7220, lng: -117.1580 },
    StoreSeed { name: "Vons - Hillcrest", chain: "Albertsons", address: "711 University Ave", zip_code: "92103", lat: 32.7490, lng: -117.1600 },
    StoreSeed { name: "Whole Foods - Hillcrest", chain: "Whole Foods", address: "721 University Ave", zip_code: "92103", lat: 32.7495, lng: -117.1605 },
];

/// Pricing multiplier per chain; Walmart usually cheapest, Whole Foods premium.
fn chain_multiplier(chain: &str) -> f64 {
    match chain {
        "Walmart" => 0.95,
        "Albertsons" => 1.05,
        "Whole Foods" => 1.25,
        _ => 1.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db = DbAdapter::new(db_pool);
    db.run_migrations().await?;

    let today = Utc::now().date_naive();

    // --- Products ---
    let mut products: Vec<Product> = Vec::with_capacity(PRODUCTS.len());
    for seed in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            brand: seed.brand.map(str::to_string),
            category: Some(seed.category.to_string()),
            upc: seed.upc.map(str::to_string),
            unit_size: Some(seed.unit_size),
            unit_type: Some(seed.unit_type.to_string()),
        };
        db.insert_product(&product).await?;
        products.push(product);
    }
    info!("Seeded {} products", products.len());

    // --- Stores ---
    let mut stores: Vec<Store> = Vec::with_capacity(STORES.len());
    for seed in STORES {
        let store = Store {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            chain: seed.chain.to_string(),
            address: Some(seed.address.to_string()),
            zip_code: seed.zip_code.to_string(),
            lat: Some(seed.lat),
            lng: Some(seed.lng),
        };
        db.insert_store(&store).await?;
        stores.push(store);
    }
    info!("Seeded {} stores", stores.len());

    // --- Prices ---
    let mut price_count = 0usize;
    for (product_idx, (seed, product)) in PRODUCTS.iter().zip(&products).enumerate() {
        for (store_idx, store) in stores.iter().enumerate() {
            // Deterministic wobble of up to four cents either way, so the
            // same product still varies between same-chain stores.
            let wobble = ((product_idx + store_idx) % 5) as f64 * 0.02 - 0.04;
            let regular = round2(seed.base_price * chain_multiplier(&store.chain) + wobble);

            // Roughly a fifth of the records carry an active sale.
            let on_sale = (product_idx + 2 * store_idx) % 5 == 0;
            let (sale_price, expiration_date): (Option<f64>, Option<NaiveDate>) = if on_sale {
                (
                    Some(round2(regular * 0.8)),
                    Some(today + ChronoDuration::days(7 + ((product_idx % 7) as i64))),
                )
            } else {
                (None, None)
            };

            let price = Price {
                id: Uuid::new_v4(),
                product_id: product.id,
                store_id: store.id,
                price: regular,
                sale_price,
                unit_price: Some((regular / seed.unit_size * 10_000.0).round() / 10_000.0),
                effective_date: today - ChronoDuration::days(3),
                expiration_date,
            };
            db.insert_price(&price).await?;
            price_count += 1;
        }
    }
    info!("Seeded {} price records", price_count);

    // --- Demo shopping list ---
    let item_names = ["Whole Milk", "Large Eggs", "Coke 12 pack", "Cheerios", "Bananas"];
    let items: Vec<ListItem> = item_names
        .iter()
        .enumerate()
        .map(|(position, name)| ListItem {
            id: Uuid::new_v4(),
            product_id: None,
            name: (*name).to_string(),
            quantity: 1.0,
            unit: None,
            notes: None,
            position: position as i32,
        })
        .collect();
    let list_id = db.create_list("Weekly Groceries", "demo-user", &items).await?;
    info!("Seeded demo list {} with {} items", list_id, items.len());

    Ok(())
}
