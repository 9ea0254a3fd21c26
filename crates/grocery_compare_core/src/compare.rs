//! crates/grocery_compare_core/src/compare.rs
//!
//! Aggregates per-store totals and per-item price breakdowns for a
//! shopping list across the stores in a ZIP code.

use crate::domain::{Comparison, ItemComparison, StorePrice, StoreTotal};
use crate::matcher::ProductMatcher;
use crate::ports::{ListSource, PortError, PortResult, PriceSource, StoreSource};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Resolves list items to products and aggregates store prices.
///
/// One pass per item with an inner pass per store, so O(items × stores)
/// price lookups. Both collections are small (one shopping list, the
/// stores of one ZIP code).
pub struct ComparisonEngine {
    matcher: Arc<ProductMatcher>,
    prices: Arc<dyn PriceSource>,
    stores: Arc<dyn StoreSource>,
    lists: Arc<dyn ListSource>,
}

impl ComparisonEngine {
    pub fn new(
        matcher: Arc<ProductMatcher>,
        prices: Arc<dyn PriceSource>,
        stores: Arc<dyn StoreSource>,
        lists: Arc<dyn ListSource>,
    ) -> Self {
        Self {
            matcher,
            prices,
            stores,
            lists,
        }
    }

    /// Compare a list across the stores of a ZIP code as of today.
    pub async fn compare(&self, list_id: Uuid, zip_code: &str) -> PortResult<Comparison> {
        self.compare_on(list_id, zip_code, Utc::now().date_naive())
            .await
    }

    /// Same as [`compare`](Self::compare) with an explicit reference date
    /// for the sale-validity check.
    pub async fn compare_on(
        &self,
        list_id: Uuid,
        zip_code: &str,
        today: NaiveDate,
    ) -> PortResult<Comparison> {
        let grocery_list = self
            .lists
            .list_with_items(list_id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("Grocery list {} not found", list_id)))?;

        let stores = self.stores.stores_in_zip(zip_code).await?;
        if stores.is_empty() {
            return Err(PortError::NotFound(format!(
                "No stores found in ZIP code {}",
                zip_code
            )));
        }

        // Running totals, one per store, in store input order.
        let mut store_totals: Vec<StoreTotal> = stores
            .iter()
            .map(|store| StoreTotal {
                store_id: store.id,
                store_name: store.name.clone(),
                store_chain: store.chain.clone(),
                store_address: store.address.clone(),
                total_price: 0.0,
                items_found: 0,
                items_on_sale: 0,
                is_cheapest: false,
            })
            .collect();

        let mut item_breakdown: Vec<ItemComparison> = Vec::with_capacity(grocery_list.items.len());

        for item in &grocery_list.items {
            // Resolve the item to a product: a pinned id wins outright,
            // otherwise fall back to fuzzy matching on the free text.
            let (product_id, match_confidence) = match item.product_id {
                Some(pinned) => (Some(pinned), 100.0),
                None => match self.matcher.find_best_match(&item.name).await? {
                    Some(matched) => (Some(matched.product_id), matched.score),
                    None => (None, 0.0),
                },
            };

            let mut prices_by_store: Vec<StorePrice> = Vec::new();
            let mut cheapest_price = f64::INFINITY;
            let mut cheapest_store_id: Option<Uuid> = None;

            for (store_idx, store) in stores.iter().enumerate() {
                let Some(product_id) = product_id else {
                    continue;
                };
                let Some(record) = self.prices.latest_price(product_id, store.id).await? else {
                    continue;
                };

                let current_price = record.current_price_on(today);
                let is_on_sale = record.is_on_sale_on(today);
                let item_total = current_price * item.quantity;

                prices_by_store.push(StorePrice {
                    store_id: store.id,
                    store_name: store.name.clone(),
                    store_chain: store.chain.clone(),
                    regular_price: record.price,
                    current_price,
                    is_on_sale,
                    sale_expires: if is_on_sale {
                        record.expiration_date
                    } else {
                        None
                    },
                    unit_price: record.unit_price,
                });

                let totals = &mut store_totals[store_idx];
                totals.total_price += item_total;
                totals.items_found += 1;
                if is_on_sale {
                    totals.items_on_sale += 1;
                }

                // Strict less-than: the first store keeps a tied price.
                if current_price < cheapest_price {
                    cheapest_price = current_price;
                    cheapest_store_id = Some(store.id);
                }
            }

            item_breakdown.push(ItemComparison {
                item_name: item.name.clone(),
                product_id,
                quantity: item.quantity,
                unit: item.unit.clone(),
                match_confidence,
                prices_by_store,
                cheapest_store_id,
            });
        }

        // Pick the overall cheapest among stores that found anything;
        // the first store encountered keeps a tied minimum.
        let mut cheapest_idx: Option<usize> = None;
        let mut max_total = f64::NEG_INFINITY;
        let mut qualifying = 0usize;
        for (idx, totals) in store_totals.iter().enumerate() {
            if totals.items_found == 0 {
                continue;
            }
            qualifying += 1;
            if cheapest_idx.map_or(true, |c| totals.total_price < store_totals[c].total_price) {
                cheapest_idx = Some(idx);
            }
            if totals.total_price > max_total {
                max_total = totals.total_price;
            }
        }

        let mut cheapest_store_id = None;
        let mut potential_savings = 0.0;
        if let Some(idx) = cheapest_idx {
            store_totals[idx].is_cheapest = true;
            cheapest_store_id = Some(store_totals[idx].store_id);
            if qualifying > 1 {
                potential_savings = max_total - store_totals[idx].total_price;
            }
        }

        for totals in &mut store_totals {
            totals.total_price = round2(totals.total_price);
        }

        Ok(Comparison {
            list_id: grocery_list.id,
            list_name: grocery_list.name.clone(),
            zip_code: zip_code.to_string(),
            store_totals,
            item_breakdown,
            cheapest_store_id,
            potential_savings: round2(potential_savings),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroceryList, ListItem, Price, Product, Store};
    use crate::ports::CatalogSource;
    use async_trait::async_trait;

    struct StubCatalog {
        products: Vec<Product>,
    }

    #[async_trait]
    impl CatalogSource for StubCatalog {
        async fn list_products(&self) -> PortResult<Vec<Product>> {
            Ok(self.products.clone())
        }

        async fn product_by_id(&self, product_id: Uuid) -> PortResult<Option<Product>> {
            Ok(self.products.iter().find(|p| p.id == product_id).cloned())
        }

        async fn product_by_upc(&self, upc: &str) -> PortResult<Option<Product>> {
            Ok(self
                .products
                .iter()
                .find(|p| p.upc.as_deref() == Some(upc))
                .cloned())
        }
    }

    struct StubPrices {
        records: Vec<Price>,
    }

    #[async_trait]
    impl PriceSource for StubPrices {
        async fn latest_price(
            &self,
            product_id: Uuid,
            store_id: Uuid,
        ) -> PortResult<Option<Price>> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.product_id == product_id && r.store_id == store_id)
                .max_by_key(|r| r.effective_date)
                .cloned())
        }
    }

    struct StubStores {
        stores: Vec<Store>,
    }

    #[async_trait]
    impl StoreSource for StubStores {
        async fn stores_in_zip(&self, zip_code: &str) -> PortResult<Vec<Store>> {
            Ok(self
                .stores
                .iter()
                .filter(|s| s.zip_code == zip_code)
                .cloned()
                .collect())
        }
    }

    struct StubLists {
        lists: Vec<GroceryList>,
    }

    #[async_trait]
    impl ListSource for StubLists {
        async fn list_with_items(&self, list_id: Uuid) -> PortResult<Option<GroceryList>> {
            Ok(self.lists.iter().find(|l| l.id == list_id).cloned())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: None,
            category: None,
            upc: None,
            unit_size: None,
            unit_type: None,
        }
    }

    fn store(name: &str, zip: &str) -> Store {
        Store {
            id: Uuid::new_v4(),
            name: name.to_string(),
            chain: name.to_string(),
            address: None,
            zip_code: zip.to_string(),
            lat: None,
            lng: None,
        }
    }

    fn item(name: &str, quantity: f64, position: i32) -> ListItem {
        ListItem {
            id: Uuid::new_v4(),
            product_id: None,
            name: name.to_string(),
            quantity,
            unit: None,
            notes: None,
            position,
        }
    }

    fn price_record(product_id: Uuid, store_id: Uuid, regular: f64) -> Price {
        Price {
            id: Uuid::new_v4(),
            product_id,
            store_id,
            price: regular,
            sale_price: None,
            unit_price: None,
            effective_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            expiration_date: None,
        }
    }

    fn engine(
        products: Vec<Product>,
        records: Vec<Price>,
        stores: Vec<Store>,
        lists: Vec<GroceryList>,
    ) -> ComparisonEngine {
        let matcher = Arc::new(ProductMatcher::new(Arc::new(StubCatalog { products })));
        ComparisonEngine::new(
            matcher,
            Arc::new(StubPrices { records }),
            Arc::new(StubStores { stores }),
            Arc::new(StubLists { lists }),
        )
    }

    fn one_item_list(item_name: &str) -> GroceryList {
        GroceryList {
            id: Uuid::new_v4(),
            name: "Weekly Groceries".to_string(),
            user_id: "user-1".to_string(),
            items: vec![item(item_name, 1.0, 0)],
        }
    }

    #[tokio::test]
    async fn totals_cheapest_store_and_savings() {
        let milk = product("Whole Milk");
        let store_a = store("Store A", "92101");
        let store_b = store("Store B", "92101");
        let list = one_item_list("Whole Milk");
        let list_id = list.id;

        let engine = engine(
            vec![milk.clone()],
            vec![
                price_record(milk.id, store_a.id, 4.99),
                price_record(milk.id, store_b.id, 5.49),
            ],
            vec![store_a.clone(), store_b.clone()],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.store_totals.len(), 2);
        assert_eq!(result.store_totals[0].total_price, 4.99);
        assert_eq!(result.store_totals[1].total_price, 5.49);
        assert_eq!(result.cheapest_store_id, Some(store_a.id));
        assert!(result.store_totals[0].is_cheapest);
        assert!(!result.store_totals[1].is_cheapest);
        assert_eq!(result.potential_savings, 0.5);

        let breakdown = &result.item_breakdown[0];
        assert_eq!(breakdown.product_id, Some(milk.id));
        assert!(breakdown.match_confidence >= 90.0);
        assert_eq!(breakdown.cheapest_store_id, Some(store_a.id));
        assert_eq!(breakdown.prices_by_store.len(), 2);
    }

    #[tokio::test]
    async fn quantity_multiplies_the_item_total() {
        let eggs = product("Large Eggs");
        let store_a = store("Store A", "92101");
        let mut list = one_item_list("Large Eggs");
        list.items[0].quantity = 3.0;
        let list_id = list.id;

        let engine = engine(
            vec![eggs.clone()],
            vec![price_record(eggs.id, store_a.id, 2.50)],
            vec![store_a],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.store_totals[0].total_price, 7.50);
        assert_eq!(result.store_totals[0].items_found, 1);
    }

    #[tokio::test]
    async fn active_sale_price_feeds_the_totals() {
        let soup = product("Chicken Noodle Soup");
        let store_a = store("Store A", "92101");
        let list = one_item_list("Chicken Noodle Soup");
        let list_id = list.id;

        let expires = today().succ_opt();
        let mut record = price_record(soup.id, store_a.id, 5.00);
        record.sale_price = Some(3.50);
        record.expiration_date = expires;

        let engine = engine(vec![soup.clone()], vec![record], vec![store_a], vec![list]);

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        let totals = &result.store_totals[0];
        assert_eq!(totals.total_price, 3.50);
        assert_eq!(totals.items_on_sale, 1);

        let line = &result.item_breakdown[0].prices_by_store[0];
        assert_eq!(line.regular_price, 5.00);
        assert_eq!(line.current_price, 3.50);
        assert!(line.is_on_sale);
        assert_eq!(line.sale_expires, expires);
    }

    #[tokio::test]
    async fn expired_sale_reverts_to_regular_price() {
        let soup = product("Chicken Noodle Soup");
        let store_a = store("Store A", "92101");
        let list = one_item_list("Chicken Noodle Soup");
        let list_id = list.id;

        let mut record = price_record(soup.id, store_a.id, 5.00);
        record.sale_price = Some(3.50);
        record.expiration_date = Some(today().pred_opt().unwrap());

        let engine = engine(vec![soup.clone()], vec![record], vec![store_a], vec![list]);

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        let totals = &result.store_totals[0];
        assert_eq!(totals.total_price, 5.00);
        assert_eq!(totals.items_on_sale, 0);
        assert!(!result.item_breakdown[0].prices_by_store[0].is_on_sale);
    }

    #[tokio::test]
    async fn latest_effective_date_wins() {
        let milk = product("Whole Milk");
        let store_a = store("Store A", "92101");
        let list = one_item_list("Whole Milk");
        let list_id = list.id;

        let mut older = price_record(milk.id, store_a.id, 3.99);
        older.effective_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut newer = price_record(milk.id, store_a.id, 4.79);
        newer.effective_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let engine = engine(
            vec![milk.clone()],
            vec![older, newer],
            vec![store_a],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.store_totals[0].total_price, 4.79);
    }

    #[tokio::test]
    async fn pinned_product_skips_matching_with_full_confidence() {
        let beans = product("Black Beans");
        let store_a = store("Store A", "92101");
        let mut list = one_item_list("some scribbled nonsense");
        list.items[0].product_id = Some(beans.id);
        let list_id = list.id;

        // Catalog is empty: resolution must not depend on the matcher.
        let engine = engine(
            Vec::new(),
            vec![price_record(beans.id, store_a.id, 1.29)],
            vec![store_a],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        let breakdown = &result.item_breakdown[0];
        assert_eq!(breakdown.product_id, Some(beans.id));
        assert_eq!(breakdown.match_confidence, 100.0);
        assert_eq!(result.store_totals[0].items_found, 1);
    }

    #[tokio::test]
    async fn unmatched_items_leave_the_comparison_intact() {
        let milk = product("Whole Milk");
        let store_a = store("Store A", "92101");
        let list = GroceryList {
            id: Uuid::new_v4(),
            name: "Mixed".to_string(),
            user_id: "user-1".to_string(),
            items: vec![
                item("Whole Milk", 1.0, 0),
                item("xyznonexistent", 1.0, 1),
            ],
        };
        let list_id = list.id;

        let engine = engine(
            vec![milk.clone()],
            vec![price_record(milk.id, store_a.id, 4.99)],
            vec![store_a],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.store_totals[0].items_found, 1);
        let unmatched = &result.item_breakdown[1];
        assert_eq!(unmatched.product_id, None);
        assert_eq!(unmatched.match_confidence, 0.0);
        assert!(unmatched.prices_by_store.is_empty());
        assert_eq!(unmatched.cheapest_store_id, None);
    }

    #[tokio::test]
    async fn tied_totals_keep_the_first_store() {
        let milk = product("Whole Milk");
        let store_a = store("Store A", "92101");
        let store_b = store("Store B", "92101");
        let list = one_item_list("Whole Milk");
        let list_id = list.id;

        let engine = engine(
            vec![milk.clone()],
            vec![
                price_record(milk.id, store_a.id, 3.00),
                price_record(milk.id, store_b.id, 3.00),
            ],
            vec![store_a.clone(), store_b],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.cheapest_store_id, Some(store_a.id));
        assert!(result.store_totals[0].is_cheapest);
        assert!(!result.store_totals[1].is_cheapest);
        assert_eq!(result.potential_savings, 0.0);
        assert_eq!(result.item_breakdown[0].cheapest_store_id, Some(store_a.id));
    }

    #[tokio::test]
    async fn missing_list_is_not_found() {
        let engine = engine(
            Vec::new(),
            Vec::new(),
            vec![store("Store A", "92101")],
            Vec::new(),
        );

        let err = engine
            .compare_on(Uuid::new_v4(), "92101", today())
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn zip_without_stores_is_not_found() {
        let list = one_item_list("Whole Milk");
        let list_id = list.id;
        let engine = engine(Vec::new(), Vec::new(), Vec::new(), vec![list]);

        let err = engine
            .compare_on(list_id, "00000", today())
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn no_store_finding_any_item_yields_no_cheapest_and_zero_savings() {
        let store_a = store("Store A", "92101");
        let list = one_item_list("Whole Milk");
        let list_id = list.id;

        // No products, no prices: nothing can be found anywhere.
        let engine = engine(Vec::new(), Vec::new(), vec![store_a], vec![list]);

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.cheapest_store_id, None);
        assert_eq!(result.potential_savings, 0.0);
        assert!(result.store_totals.iter().all(|t| !t.is_cheapest));
        assert_eq!(result.store_totals[0].total_price, 0.0);
    }

    #[tokio::test]
    async fn single_qualifying_store_has_zero_savings() {
        let milk = product("Whole Milk");
        let store_a = store("Store A", "92101");
        let store_b = store("Store B", "92101");
        let list = one_item_list("Whole Milk");
        let list_id = list.id;

        // Only store A carries the product.
        let engine = engine(
            vec![milk.clone()],
            vec![price_record(milk.id, store_a.id, 4.99)],
            vec![store_a.clone(), store_b],
            vec![list],
        );

        let result = engine.compare_on(list_id, "92101", today()).await.unwrap();

        assert_eq!(result.cheapest_store_id, Some(store_a.id));
        assert_eq!(result.potential_savings, 0.0);
    }
}
