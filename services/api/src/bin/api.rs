//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{ComparisonCache, DbAdapter},
    config::Config,
    error::ApiError,
    web::{
        best_match_handler, compare_handler, create_list_handler, delete_list_handler,
        get_list_handler, get_lists_handler, health_handler, match_by_upc_handler,
        match_products_handler, refresh_cache_handler, root_handler, similar_products_handler,
        state::AppState, update_list_handler, ApiDoc,
    },
};
use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use grocery_compare_core::{
    ComparisonEngine, ProductMatcher,
    ports::{CatalogSource, ListSource, PriceSource, StoreSource},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Build the Matcher, Engine, and Cache ---
    let matcher = Arc::new(ProductMatcher::with_min_score(
        Arc::clone(&db_adapter) as Arc<dyn CatalogSource>,
        config.match_min_score,
    ));
    let engine = Arc::new(ComparisonEngine::new(
        Arc::clone(&matcher),
        Arc::clone(&db_adapter) as Arc<dyn PriceSource>,
        Arc::clone(&db_adapter) as Arc<dyn StoreSource>,
        Arc::clone(&db_adapter) as Arc<dyn ListSource>,
    ));
    let comparison_cache = Arc::new(ComparisonCache::new(Duration::from_secs(
        config.cache_ttl_seconds,
    )));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        matcher,
        engine,
        comparison_cache,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/lists", post(create_list_handler).get(get_lists_handler))
        .route(
            "/lists/{list_id}",
            get(get_list_handler)
                .put(update_list_handler)
                .delete(delete_list_handler),
        )
        .route("/compare", post(compare_handler))
        .route("/products/match", get(match_products_handler))
        .route("/products/match/best", get(best_match_handler))
        .route("/products/upc/{upc}", get(match_by_upc_handler))
        .route("/products/{product_id}/similar", get(similar_products_handler))
        .route("/products/refresh-cache", post(refresh_cache_handler));

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
