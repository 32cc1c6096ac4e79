//! 核心响应处理模块
//!
//! 商品目录结果的 JSON 包装结构

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub total: usize,
    pub products: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(products: Vec<T>) -> Self {
        Self {
            total: products.len(),
            products,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub query: String,
    pub category: String,
    pub total_results: usize,
    pub results: Vec<T>,
}

impl<T> SearchResponse<T> {
    pub fn new(query: String, category: String, results: Vec<T>) -> Self {
        Self {
            query,
            category,
            total_results: results.len(),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryProductsResponse<T> {
    pub category: String,
    pub total: usize,
    pub products: Vec<T>,
}

impl<T> CategoryProductsResponse<T> {
    pub fn new(category: String, products: Vec<T>) -> Self {
        Self {
            category,
            total: products.len(),
            products,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub total: usize,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
    pub product_id: u64,
}

impl DeletedResponse {
    pub fn new(product_id: u64) -> Self {
        Self {
            message: "Product deleted successfully",
            product_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub total_products: usize,
}

impl HealthResponse {
    pub fn healthy(total_products: usize) -> Self {
        Self {
            status: "healthy",
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_products,
        }
    }
}
