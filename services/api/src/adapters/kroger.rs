//! services/api/src/adapters/kroger.rs
//!
//! Stub client for the Kroger catalog/pricing API. Credentials are not
//! yet provisioned; until they are, search and location lookups return
//! mock data so the rest of the system can be developed against a
//! realistic shape.

use crate::config::Config;

/// A product as returned by the external catalog provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProduct {
    pub provider_id: String,
    pub upc: String,
    pub brand: String,
    pub description: String,
    pub size: String,
    pub regular_price: f64,
    pub promo_price: Option<f64>,
}

/// A store location as returned by the external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLocation {
    pub location_id: String,
    pub chain: String,
    pub name: String,
    pub address: String,
    pub zip_code: String,
}

/// Client for the Kroger API.
pub struct KrogerClient {
    client_id: Option<String>,
    client_secret: Option<String>,
    base_url: String,
}

impl KrogerClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.kroger_client_id.clone(),
            client_secret: config.kroger_client_secret.clone(),
            base_url: config.kroger_base_url.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Search the provider catalog. Returns mock data while credentials
    /// are missing.
    pub async fn search_products(&self, query: &str) -> Vec<ProviderProduct> {
        if !self.is_configured() {
            return Self::mock_search_results(query);
        }

        // TODO: implement the real call once credentials are provisioned.
        // OAuth2 client-credentials token from {base_url}/connect/oauth2/token,
        // then GET /products?filter.term={query}.
        tracing::warn!(
            "Kroger product search against {} is not implemented yet",
            self.base_url
        );
        Vec::new()
    }

    /// Provider store locations near a ZIP code. Returns mock data while
    /// credentials are missing.
    pub async fn get_locations(&self, zip_code: &str) -> Vec<ProviderLocation> {
        if !self.is_configured() {
            return vec![ProviderLocation {
                location_id: "01400943".to_string(),
                chain: "KROGER".to_string(),
                name: "Kroger".to_string(),
                address: "100 Main Street, San Diego, CA".to_string(),
                zip_code: zip_code.to_string(),
            }];
        }

        // TODO: GET /locations?filter.zipCode.near={zip_code} with a real token.
        Vec::new()
    }

    /// Simple substring filtering over a fixed mock catalog.
    fn mock_search_results(query: &str) -> Vec<ProviderProduct> {
        let mock_products = vec![
            ProviderProduct {
                provider_id: "0001111060903".to_string(),
                upc: "0001111060903".to_string(),
                brand: "Kroger".to_string(),
                description: "Kroger 2% Reduced Fat Milk".to_string(),
                size: "1 gal".to_string(),
                regular_price: 3.49,
                promo_price: Some(2.99),
            },
            ProviderProduct {
                provider_id: "0001111041700".to_string(),
                upc: "0001111041700".to_string(),
                brand: "Kroger".to_string(),
                description: "Kroger Whole Milk".to_string(),
                size: "1 gal".to_string(),
                regular_price: 3.99,
                promo_price: None,
            },
        ];

        let query_lower = query.to_lowercase();
        mock_products
            .into_iter()
            .filter(|p| p.description.to_lowercase().contains(&query_lower))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tracing::Level;

    fn config(client_id: Option<&str>, client_secret: Option<&str>) -> Config {
        Config {
            bind_address: "127.0.0.1:8000".parse::<SocketAddr>().unwrap(),
            database_url: "postgres://localhost/grocery_compare".to_string(),
            log_level: Level::INFO,
            cache_ttl_seconds: 3600,
            match_min_score: 60.0,
            kroger_client_id: client_id.map(str::to_string),
            kroger_client_secret: client_secret.map(str::to_string),
            kroger_base_url: "https://api.kroger.com/v1".to_string(),
        }
    }

    #[tokio::test]
    async fn unconfigured_client_serves_filtered_mock_data() {
        let client = KrogerClient::new(&config(None, None));

        let all_milk = client.search_products("milk").await;
        assert_eq!(all_milk.len(), 2);

        let whole = client.search_products("Whole Milk").await;
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].description, "Kroger Whole Milk");

        let none = client.search_products("asparagus").await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_client_serves_mock_locations() {
        let client = KrogerClient::new(&config(None, None));

        let locations = client.get_locations("92101").await;

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].zip_code, "92101");
    }

    #[tokio::test]
    async fn configured_client_returns_empty_until_implemented() {
        let client = KrogerClient::new(&config(Some("id"), Some("secret")));

        assert!(client.search_products("milk").await.is_empty());
        assert!(client.get_locations("92101").await.is_empty());
    }
}
