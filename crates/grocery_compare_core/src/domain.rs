//! crates/grocery_compare_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::NaiveDate;
use uuid::Uuid;

/// A catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    /// Unique when present.
    pub upc: Option<String>,
    pub unit_size: Option<f64>,
    pub unit_type: Option<String>,
}

/// A grocery store location. `lat`/`lng` are carried as data only and
/// never participate in ranking.
#[derive(Debug, Clone)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub chain: String,
    pub address: Option<String>,
    pub zip_code: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A user's shopping list with its items in position order.
#[derive(Debug, Clone)]
pub struct GroceryList {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub items: Vec<ListItem>,
}

/// A single free-text entry on a shopping list. `quantity` is strictly
/// positive; the API boundary rejects anything else before it gets here.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub id: Uuid,
    /// Pinned catalog product, when the user picked one explicitly.
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub position: i32,
}

/// A price record for a (product, store) pair. Several records may exist
/// for the same pair over time; the one with the most recent
/// `effective_date` is the latest.
#[derive(Debug, Clone)]
pub struct Price {
    pub id: Uuid,
    pub product_id: Uuid,
    pub store_id: Uuid,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub unit_price: Option<f64>,
    pub effective_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
}

impl Price {
    /// The effective price on `today`: the sale price when one exists
    /// together with an expiration date that has not passed, otherwise
    /// the regular price. There is no sale start date; only the base
    /// row's `effective_date` selects the latest record.
    pub fn current_price_on(&self, today: NaiveDate) -> f64 {
        if let (Some(sale), Some(expires)) = (self.sale_price, self.expiration_date) {
            if today <= expires {
                return sale;
            }
        }
        self.price
    }

    /// Whether the sale price is what a shopper would pay on `today`.
    pub fn is_on_sale_on(&self, today: NaiveDate) -> bool {
        match self.sale_price {
            Some(sale) => self.current_price_on(today) == sale,
            None => false,
        }
    }
}

/// A ranked candidate produced by the product matcher. `score` is in
/// [0, 100].
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub product_id: Uuid,
    pub product_name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub upc: Option<String>,
    pub score: f64,
}

/// One store's price for a single list item.
#[derive(Debug, Clone)]
pub struct StorePrice {
    pub store_id: Uuid,
    pub store_name: String,
    pub store_chain: String,
    pub regular_price: f64,
    pub current_price: f64,
    pub is_on_sale: bool,
    pub sale_expires: Option<NaiveDate>,
    pub unit_price: Option<f64>,
}

/// The per-item breakdown of a comparison.
#[derive(Debug, Clone)]
pub struct ItemComparison {
    pub item_name: String,
    pub product_id: Option<Uuid>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub match_confidence: f64,
    pub prices_by_store: Vec<StorePrice>,
    pub cheapest_store_id: Option<Uuid>,
}

/// One store's running total across a whole list.
#[derive(Debug, Clone)]
pub struct StoreTotal {
    pub store_id: Uuid,
    pub store_name: String,
    pub store_chain: String,
    pub store_address: Option<String>,
    pub total_price: f64,
    pub items_found: u32,
    pub items_on_sale: u32,
    pub is_cheapest: bool,
}

/// The full result of comparing a list across the stores in a ZIP code.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub list_id: Uuid,
    pub list_name: String,
    pub zip_code: String,
    pub store_totals: Vec<StoreTotal>,
    pub item_breakdown: Vec<ItemComparison>,
    pub cheapest_store_id: Option<Uuid>,
    pub potential_savings: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(regular: f64, sale: Option<f64>, expires: Option<NaiveDate>) -> Price {
        Price {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            price: regular,
            sale_price: sale,
            unit_price: None,
            effective_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            expiration_date: expires,
        }
    }

    #[test]
    fn sale_price_applies_until_expiration() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let p = price(5.00, Some(3.50), Some(tomorrow));

        assert_eq!(p.current_price_on(today), 3.50);
        assert!(p.is_on_sale_on(today));
    }

    #[test]
    fn expired_sale_falls_back_to_regular_price() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let p = price(5.00, Some(3.50), Some(yesterday));

        assert_eq!(p.current_price_on(today), 5.00);
        assert!(!p.is_on_sale_on(today));
    }

    #[test]
    fn sale_without_expiration_date_is_inactive() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let p = price(5.00, Some(3.50), None);

        assert_eq!(p.current_price_on(today), 5.00);
        assert!(!p.is_on_sale_on(today));
    }

    #[test]
    fn sale_active_on_expiration_day_itself() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let p = price(5.00, Some(3.50), Some(today));

        assert_eq!(p.current_price_on(today), 3.50);
    }

    #[test]
    fn no_sale_price_means_regular_price() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let p = price(4.29, None, Some(today));

        assert_eq!(p.current_price_on(today), 4.29);
        assert!(!p.is_on_sale_on(today));
    }
}
