//! 商品目录存储
//!
//! `CatalogStore` 只通过下列操作暴露数据，不对外提供可变迭代器，
//! 由 `CatalogService` 负责加锁。

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::model::{
    CatalogStats, CategoryBreakdown, CategoryStats, PriceFilter, Product, ProductDraft,
    ProductPatch, SortSpec,
};
use crate::core::error::{CatalogError, Result};

pub struct CatalogStore {
    products: Vec<Product>,
    categories: Vec<String>,
    next_id: u64,
}

impl CatalogStore {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            products: Vec::new(),
            categories,
            next_id: 1,
        }
    }

    /// 创建带示例商品的存储，分类未配置的示例会被跳过
    pub fn with_sample_products(categories: Vec<String>) -> Self {
        let mut store = Self::new(categories);
        for (draft, created_at) in sample_products() {
            let name = draft.name.clone().unwrap_or_default();
            if let Err(e) = store.create(draft, created_at) {
                warn!(product = %name, error = %e, "Skipping sample product");
            }
        }
        store
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn list(&self, filter: &PriceFilter, sort: &SortSpec) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort.sort(&mut products);
        products
    }

    pub fn get(&self, id: u64) -> Result<Product> {
        self.find(id).cloned()
    }

    pub fn create(&mut self, draft: ProductDraft, created_at: NaiveDate) -> Result<Product> {
        let name = required(draft.name, "name")?;
        let category = required(draft.category, "category")?;
        let price = required(draft.price, "price")?;
        let stock = required(draft.stock, "stock")?;

        check_price(price)?;
        let stock = check_stock(stock)?;
        self.check_category(&category)?;

        let product = Product {
            id: self.next_id,
            name,
            category,
            price,
            stock,
            description: draft.description.unwrap_or_default(),
            rating: draft.rating.unwrap_or(0.0),
            created_at,
        };
        self.next_id += 1;
        self.products.push(product.clone());
        Ok(product)
    }

    /// 先校验全部字段再写入，任一字段不合法时商品保持不变
    pub fn update(&mut self, id: u64, patch: ProductPatch) -> Result<Product> {
        let index = self.position(id)?;

        if let Some(category) = &patch.category {
            self.check_category(category)?;
        }
        if let Some(price) = patch.price {
            check_price(price)?;
        }
        let stock = patch.stock.map(check_stock).transpose()?;

        let product = &mut self.products[index];
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = stock {
            product.stock = stock;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(rating) = patch.rating {
            product.rating = rating;
        }
        Ok(product.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<u64> {
        let index = self.position(id)?;
        self.products.remove(index);
        Ok(id)
    }

    /// 名称包含 `query` 或分类包含 `category` 即命中，均不区分大小写。
    /// 空字符串表示该维度不参与匹配。
    pub fn search(&self, query: &str, category: &str) -> Result<Vec<Product>> {
        if query.is_empty() && category.is_empty() {
            return Err(CatalogError::Validation(
                "Please provide 'q' (query) or 'category' parameter".to_string(),
            ));
        }

        let query = query.to_lowercase();
        let category = category.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| {
                (!query.is_empty() && p.name.to_lowercase().contains(&query))
                    || (!category.is_empty() && p.category.to_lowercase().contains(&category))
            })
            .cloned()
            .collect())
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        let wanted = category.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.category.to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let count = self.products.len();
        let total_value: f64 = self.products.iter().map(|p| p.price * p.stock as f64).sum();
        let (average_price, average_rating) = if count == 0 {
            (0.0, 0.0)
        } else {
            let prices: f64 = self.products.iter().map(|p| p.price).sum();
            let ratings: f64 = self.products.iter().map(|p| p.rating).sum();
            (prices / count as f64, ratings / count as f64)
        };

        let categories = self
            .categories
            .iter()
            .map(|category| {
                let mut stats = CategoryStats {
                    count: 0,
                    total_stock: 0,
                };
                for product in self.products.iter().filter(|p| &p.category == category) {
                    stats.count += 1;
                    stats.total_stock = stats.total_stock.saturating_add(product.stock);
                }
                (category.clone(), stats)
            })
            .collect();

        CatalogStats {
            total_products: count,
            total_inventory_value: round2(total_value),
            average_price: round2(average_price),
            average_rating: round2(average_rating),
            total_stock: self
                .products
                .iter()
                .fold(0u64, |total, p| total.saturating_add(p.stock)),
            categories: CategoryBreakdown(categories),
        }
    }

    fn find(&self, id: u64) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound)
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound)
    }

    fn check_category(&self, category: &str) -> Result<()> {
        if self.categories.iter().any(|c| c == category) {
            return Ok(());
        }
        debug!(category, "Rejected unknown category");
        Err(CatalogError::Validation(format!(
            "Invalid category. Choose from: {}",
            self.categories.join(", ")
        )))
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| CatalogError::Validation(format!("Missing required field: {}", field)))
}

fn check_price(price: f64) -> Result<()> {
    // NaN 也不满足 > 0
    if price > 0.0 && price.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::Validation(
            "Price must be greater than 0".to_string(),
        ))
    }
}

fn check_stock(stock: i64) -> Result<u64> {
    u64::try_from(stock)
        .map_err(|_| CatalogError::Validation("Stock cannot be negative".to_string()))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sample_products() -> Vec<(ProductDraft, NaiveDate)> {
    let sample = |name: &str, category: &str, price, stock, description: &str, rating, date| {
        (
            ProductDraft {
                name: Some(name.to_string()),
                category: Some(category.to_string()),
                price: Some(price),
                stock: Some(stock),
                description: Some(description.to_string()),
                rating: Some(rating),
            },
            seed_date(date),
        )
    };

    vec![
        sample(
            "Laptop Pro 15",
            "Electronics",
            1299.99,
            45,
            "High-performance laptop with 16GB RAM and 512GB SSD",
            4.5,
            (2024, 1, 15),
        ),
        sample(
            "Wireless Mouse",
            "Accessories",
            29.99,
            150,
            "Ergonomic wireless mouse with USB receiver",
            4.2,
            (2024, 2, 20),
        ),
        sample(
            "USB-C Hub",
            "Accessories",
            49.99,
            80,
            "7-in-1 USB-C hub with HDMI, USB 3.0, and SD card reader",
            4.7,
            (2024, 3, 10),
        ),
    ]
}

fn seed_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
