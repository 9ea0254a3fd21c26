//! crates/grocery_compare_core/src/matcher.rs
//!
//! Fuzzy product matching over a cached catalog snapshot.
//!
//! The snapshot is built lazily from the catalog source on the first
//! match request and replaced wholesale by `refresh_cache`: readers clone
//! the current `Arc` and keep scoring against it, so a refresh can never
//! corrupt a match that is already in flight.

use crate::domain::{MatchResult, Product};
use crate::normalize::{normalize_name, normalize_unit};
use crate::ports::{CatalogSource, PortResult};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Candidates scoring below this are discarded unless configured otherwise.
pub const DEFAULT_MIN_SCORE: f64 = 60.0;

/// A point-in-time view of the catalog with precomputed normalized names.
/// `products` and `normalized_names` have the same length and matching
/// indices.
struct CatalogSnapshot {
    products: Vec<Product>,
    normalized_names: Vec<String>,
}

impl CatalogSnapshot {
    fn build(products: Vec<Product>) -> Self {
        let normalized_names = products
            .iter()
            .map(|p| normalize_name(&p.name, p.brand.as_deref()))
            .collect();
        Self {
            products,
            normalized_names,
        }
    }
}

/// Matches free-text grocery item names onto catalog products.
pub struct ProductMatcher {
    catalog: Arc<dyn CatalogSource>,
    min_score: f64,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl ProductMatcher {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self::with_min_score(catalog, DEFAULT_MIN_SCORE)
    }

    pub fn with_min_score(catalog: Arc<dyn CatalogSource>, min_score: f64) -> Self {
        Self {
            catalog,
            min_score,
            snapshot: RwLock::new(None),
        }
    }

    /// The current snapshot, building it from the catalog source on first use.
    async fn snapshot(&self) -> PortResult<Arc<CatalogSnapshot>> {
        {
            let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
            if let Some(snapshot) = guard.as_ref() {
                return Ok(Arc::clone(snapshot));
            }
        }

        // Not built yet; load outside the lock, then swap the reference in.
        let products = self.catalog.list_products().await?;
        let snapshot = Arc::new(CatalogSnapshot::build(products));
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Discard the snapshot and rebuild it from the current catalog source.
    /// Safe to call at any time; in-flight matches keep reading the
    /// snapshot they started with.
    pub async fn refresh_cache(&self) -> PortResult<()> {
        let products = self.catalog.list_products().await?;
        let snapshot = Arc::new(CatalogSnapshot::build(products));
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(snapshot);
        Ok(())
    }

    /// The single best match for a query, if any candidate clears the
    /// minimum score.
    pub async fn find_best_match(&self, query: &str) -> PortResult<Option<MatchResult>> {
        Ok(self.find_matches(query, 1).await?.into_iter().next())
    }

    /// Up to `limit` candidates ranked by similarity to the normalized
    /// query. Ties are broken by catalog order; candidates below the
    /// minimum score are filtered after the top-N selection.
    pub async fn find_matches(&self, query: &str, limit: usize) -> PortResult<Vec<MatchResult>> {
        let snapshot = self.snapshot().await?;
        if snapshot.products.is_empty() {
            return Ok(Vec::new());
        }

        let normalized_query = normalize_name(query, None);
        let ranked = rank_candidates(&snapshot, &normalized_query, limit);

        Ok(ranked
            .into_iter()
            .filter(|(_, score)| *score >= self.min_score)
            .map(|(idx, score)| to_match(&snapshot.products[idx], score))
            .collect())
    }

    /// Exact UPC lookup. A hit always scores 100 and bypasses the
    /// snapshot entirely.
    pub async fn match_by_upc(&self, upc: &str) -> PortResult<Option<MatchResult>> {
        let product = self.catalog.product_by_upc(upc).await?;
        Ok(product.map(|p| to_match(&p, 100.0)))
    }

    /// Products similar to the referenced one, excluding the reference
    /// itself. An unknown `product_id` yields an empty result.
    pub async fn get_similar_products(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> PortResult<Vec<MatchResult>> {
        let snapshot = self.snapshot().await?;

        let reference = match snapshot.products.iter().find(|p| p.id == product_id) {
            Some(product) => product,
            None => return Ok(Vec::new()),
        };

        let normalized_ref = normalize_name(&reference.name, reference.brand.as_deref());
        // Request one extra candidate to absorb the reference matching itself.
        let ranked = rank_candidates(&snapshot, &normalized_ref, limit + 1);

        let mut matches: Vec<MatchResult> = ranked
            .into_iter()
            .filter(|(idx, score)| {
                snapshot.products[*idx].id != product_id && *score >= self.min_score
            })
            .map(|(idx, score)| to_match(&snapshot.products[idx], score))
            .collect();
        matches.truncate(limit);
        Ok(matches)
    }

    /// Price per unit: `price` unchanged for a non-positive size,
    /// otherwise `price / size` rounded to 4 decimal places.
    pub fn calculate_unit_price(&self, price: f64, size: f64, unit_type: &str) -> f64 {
        if size <= 0.0 {
            return price;
        }
        // TODO: use the normalized unit to convert between unit systems
        // once catalog sizes carry compatible units.
        let _unit = normalize_unit(unit_type);
        round4(price / size)
    }
}

/// Score every snapshot entry against the normalized query and keep the
/// `limit` best. The sort is stable, so equal scores keep catalog order.
fn rank_candidates(
    snapshot: &CatalogSnapshot,
    normalized_query: &str,
    limit: usize,
) -> Vec<(usize, f64)> {
    let mut scored: Vec<(usize, f64)> = snapshot
        .normalized_names
        .iter()
        .enumerate()
        .map(|(idx, name)| (idx, token_sort_ratio(normalized_query, name)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Token-order-insensitive similarity on a 0–100 scale: both strings are
/// tokenized, sorted, and rejoined, then scored as
/// `100 * (|a| + |b| - levenshtein(a, b)) / (|a| + |b|)` over chars.
/// Identical normalized strings score 100 regardless of token order.
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a = sort_tokens(a);
    let b = sort_tokens(b);

    let combined_len = a.chars().count() + b.chars().count();
    if combined_len == 0 {
        return 100.0;
    }

    let distance = strsim::levenshtein(&a, &b);
    100.0 * (combined_len.saturating_sub(distance) as f64) / (combined_len as f64)
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn to_match(product: &Product, score: f64) -> MatchResult {
    MatchResult {
        product_id: product.id,
        product_name: product.name.clone(),
        brand: product.brand.clone(),
        category: product.category.clone(),
        upc: product.upc.clone(),
        score,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
