//! 应用层: 路由装配

pub mod catalog;

use std::time::Duration;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::middleware::{request_logging_middleware, timeout_as_json};
use crate::infrastructure::config::{CatalogConfig, Config};
use catalog::{handler, AppState, CatalogService, CatalogStore};

/// 按配置创建商品目录状态
pub fn state_from_config(config: &CatalogConfig) -> AppState {
    let categories = config.categories.clone();
    let store = if config.seed_sample_data {
        CatalogStore::with_sample_products(categories)
    } else {
        CatalogStore::new(categories)
    };

    AppState {
        catalog: CatalogService::new(store).with_strict_sort(config.strict_sort),
    }
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handler::home))
        .route("/health", get(handler::health))
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/products/search", get(handler::search_products))
        .route(
            "/products/category/:category",
            get(handler::products_by_category),
        )
        .route(
            "/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
        .route("/categories", get(handler::list_categories))
        .route("/stats", get(handler::stats))
        .fallback(handler::not_found)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_as_json))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

pub fn build(config: &Config) -> Router {
    let state = state_from_config(&config.catalog);
    router(state, Duration::from_secs(config.http.timeout_seconds))
}
