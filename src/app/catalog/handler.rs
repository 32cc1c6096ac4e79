//! 商品目录处理器
//!
//! 只负责把请求参数翻译成 `CatalogService` 调用。

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use super::{
    model::{CatalogStats, PriceFilter, Product, ProductDraft, ProductPatch, SortSpec},
    service::CatalogService,
};
use crate::core::{
    error::{CatalogError, Result},
    response::{
        CategoriesResponse, CategoryProductsResponse, DeletedResponse, HealthResponse,
        ListResponse, SearchResponse,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

/// `GET /products` 查询参数，无法解析的价格按未提供处理
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    pub fn price_filter(&self) -> PriceFilter {
        PriceFilter {
            min_price: parse_price(self.min_price.as_deref()),
            max_price: parse_price(self.max_price.as_deref()),
        }
    }

    pub fn sort_spec(&self, strict: bool) -> Result<SortSpec> {
        SortSpec::parse(self.sort_by.as_deref(), self.order.as_deref(), strict)
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

// 非数字或负数 id 视为路由不存在
fn product_id(path: std::result::Result<Path<u64>, PathRejection>) -> Result<u64> {
    path.map(|Path(id)| id)
        .map_err(|_| CatalogError::RouteNotFound)
}

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "E-Commerce Product Catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "RESTful API for managing product catalog",
        "endpoints": {
            "/products": "GET - List all products, POST - Add new product",
            "/products/<id>": "GET - Get product details, PUT - Update product, DELETE - Remove product",
            "/products/search": "GET - Search products by name or category",
            "/products/category/<category>": "GET - Get products by category",
            "/categories": "GET - List all categories",
            "/stats": "GET - Get catalog statistics",
            "/health": "GET - Health check endpoint"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.catalog.total_products()))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<Product>>> {
    let sort = params.sort_spec(state.catalog.strict_sort())?;
    let products = state.catalog.list(&params.price_filter(), &sort);
    Ok(Json(ListResponse::new(products)))
}

pub async fn get_product(
    State(state): State<AppState>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<Product>> {
    let id = product_id(path)?;
    Ok(Json(state.catalog.get(id)?))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(draft) = payload?;
    let product = state.catalog.create(draft)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    path: std::result::Result<Path<u64>, PathRejection>,
    payload: std::result::Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>> {
    let id = product_id(path)?;
    // 商品不存在时优先返回 404，与请求体是否合法无关
    state.catalog.get(id)?;
    let Json(patch) = payload?;
    Ok(Json(state.catalog.update(id, patch)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<DeletedResponse>> {
    let id = product_id(path)?;
    let id = state.catalog.delete(id)?;
    Ok(Json(DeletedResponse::new(id)))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse<Product>>> {
    let query = params.q.to_lowercase();
    let category = params.category.to_lowercase();
    let results = state.catalog.search(&query, &category)?;
    Ok(Json(SearchResponse::new(query, category, results)))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<CategoryProductsResponse<Product>> {
    let products = state.catalog.by_category(&category);
    Json(CategoryProductsResponse::new(category, products))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let categories = state.catalog.categories();
    Json(CategoriesResponse {
        total: categories.len(),
        categories,
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog.stats())
}

pub async fn not_found() -> CatalogError {
    CatalogError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_prices_are_ignored() {
        let params = ListParams {
            min_price: Some("abc".into()),
            max_price: Some(" 1500 ".into()),
            ..Default::default()
        };
        let filter = params.price_filter();
        assert_eq!(filter.min_price, None);
        assert_eq!(filter.max_price, Some(1500.0));
    }

    #[test]
    fn missing_sort_params_use_ascending_id() {
        let spec = ListParams::default().sort_spec(false).unwrap();
        assert_eq!(spec, SortSpec::default());
    }

    #[test]
    fn strict_mode_rejects_unknown_sort_field() {
        let params = ListParams {
            sort_by: Some("popularity".into()),
            ..Default::default()
        };
        assert!(params.sort_spec(false).is_ok());
        assert!(matches!(
            params.sort_spec(true),
            Err(CatalogError::Validation(_))
        ));
    }
}
