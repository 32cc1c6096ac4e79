//! 商品目录数据模型

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

use crate::core::error::{CatalogError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u64,
    pub description: String,
    pub rating: f64,
    /// 序列化为 `YYYY-MM-DD`
    pub created_at: NaiveDate,
}

/// 创建商品请求，必填字段在 store 中逐一检查
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

/// 更新商品请求，`None` 表示字段未出现，保持原值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

/// 库存接受整数或小数部分为 0 的浮点数（`30.0`），其他浮点数拒绝
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Int(n)) => Ok(Some(n)),
        Some(Number::Float(f))
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Ok(Some(f as i64))
        }
        Some(Number::Float(f)) => Err(de::Error::custom(format!(
            "expected a whole number for stock, found {}",
            f
        ))),
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.description.is_none()
            && self.rating.is_none()
    }
}

/// 价格区间过滤，两端均为闭区间且可选
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl PriceFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Category,
    Price,
    Stock,
    Description,
    Rating,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Id,
        SortField::Name,
        SortField::Category,
        SortField::Price,
        SortField::Stock,
        SortField::Description,
        SortField::Rating,
        SortField::CreatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Category => "category",
            SortField::Price => "price",
            SortField::Stock => "stock",
            SortField::Description => "description",
            SortField::Rating => "rating",
            SortField::CreatedAt => "created_at",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Stock => a.stock.cmp(&b.stock),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// 排序方式。`field` 为 `None` 时所有商品的排序键相同，保持插入顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: Some(SortField::Id),
            descending: false,
        }
    }
}

impl SortSpec {
    /// 解析 `sort_by` / `order` 参数。
    ///
    /// 未知字段在宽松模式下退化为插入顺序，严格模式下返回校验错误；
    /// 只有 `order=desc` 表示降序。
    pub fn parse(sort_by: Option<&str>, order: Option<&str>, strict: bool) -> Result<Self> {
        let field = match sort_by {
            None => Some(SortField::Id),
            Some(name) => match SortField::from_name(name) {
                Some(field) => Some(field),
                None if strict => {
                    let valid: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
                    return Err(CatalogError::Validation(format!(
                        "Invalid sort field: {}. Choose from: {}",
                        name,
                        valid.join(", ")
                    )));
                }
                None => None,
            },
        };

        Ok(Self {
            field,
            descending: order == Some("desc"),
        })
    }

    pub fn sort(&self, products: &mut [Product]) {
        let Some(field) = self.field else {
            return;
        };
        if self.descending {
            products.sort_by(|a, b| field.compare(b, a));
        } else {
            products.sort_by(|a, b| field.compare(a, b));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    pub total_stock: u64,
}

/// 按配置顺序输出的分类统计，序列化为 JSON 对象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown(pub Vec<(String, CategoryStats)>);

impl CategoryBreakdown {
    pub fn get(&self, category: &str) -> Option<&CategoryStats> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, stats)| stats)
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, stats)| (name, stats)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_inventory_value: f64,
    pub average_price: f64,
    pub average_rating: f64,
    pub total_stock: u64,
    pub categories: CategoryBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: "Books".to_string(),
            price,
            stock: 1,
            description: String::new(),
            rating: 0.0,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn parse_defaults_to_ascending_id() {
        let spec = SortSpec::parse(None, None, false).unwrap();
        assert_eq!(spec, SortSpec::default());
    }

    #[test]
    fn parse_only_treats_desc_as_descending() {
        assert!(SortSpec::parse(Some("price"), Some("desc"), false).unwrap().descending);
        assert!(!SortSpec::parse(Some("price"), Some("DESC"), false).unwrap().descending);
        assert!(!SortSpec::parse(Some("price"), Some("whatever"), false).unwrap().descending);
    }

    #[test]
    fn unknown_field_falls_back_unless_strict() {
        let lenient = SortSpec::parse(Some("colour"), None, false).unwrap();
        assert_eq!(lenient.field, None);

        match SortSpec::parse(Some("colour"), None, true) {
            Err(CatalogError::Validation(msg)) => {
                assert!(msg.contains("colour"));
                assert!(msg.contains("created_at"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn fallback_keeps_insertion_order_in_both_directions() {
        let mut products = vec![product(3, "c", 5.0), product(1, "a", 9.0), product(2, "b", 1.0)];
        for order in [None, Some("desc")] {
            let spec = SortSpec::parse(Some("colour"), order, false).unwrap();
            spec.sort(&mut products);
            let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![3, 1, 2]);
        }
    }

    #[test]
    fn sorts_by_price_descending() {
        let mut products = vec![product(1, "a", 5.0), product(2, "b", 9.0), product(3, "c", 1.0)];
        SortSpec::parse(Some("price"), Some("desc"), false)
            .unwrap()
            .sort(&mut products);
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![9.0, 5.0, 1.0]);
    }

    #[test]
    fn price_filter_bounds_are_inclusive() {
        let filter = PriceFilter {
            min_price: Some(30.0),
            max_price: Some(50.0),
        };
        assert!(filter.matches(&product(1, "a", 30.0)));
        assert!(filter.matches(&product(1, "a", 50.0)));
        assert!(!filter.matches(&product(1, "a", 29.99)));
        assert!(!filter.matches(&product(1, "a", 50.01)));
        assert!(PriceFilter::default().matches(&product(1, "a", 0.01)));
    }

    #[test]
    fn product_serializes_created_at_as_plain_date() {
        let value = serde_json::to_value(product(7, "Atlas", 12.5)).unwrap();
        assert_eq!(value["created_at"], "2024-01-01");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn patch_only_holds_fields_present_in_the_body() {
        let patch: ProductPatch = serde_json::from_str(r#"{"price": 54.99}"#).unwrap();
        assert_eq!(patch.price, Some(54.99));
        assert!(patch.name.is_none());
        assert!(patch.stock.is_none());
        assert!(!patch.is_empty());
        assert!(serde_json::from_str::<ProductPatch>("{}").unwrap().is_empty());
    }

    #[test]
    fn stock_accepts_integral_floats() {
        let draft: ProductDraft =
            serde_json::from_str(r#"{"name":"Pad","category":"Books","price":2.5,"stock":30.0}"#)
                .unwrap();
        assert_eq!(draft.stock, Some(30));

        let patch: ProductPatch = serde_json::from_str(r#"{"stock":-2.0}"#).unwrap();
        assert_eq!(patch.stock, Some(-2));

        let patch: ProductPatch = serde_json::from_str(r#"{"stock":null}"#).unwrap();
        assert_eq!(patch.stock, None);
    }

    #[test]
    fn stock_rejects_fractional_values() {
        let err = serde_json::from_str::<ProductDraft>(r#"{"stock":30.5}"#).unwrap_err();
        assert!(err.to_string().contains("whole number"));
        assert!(serde_json::from_str::<ProductPatch>(r#"{"stock":"ten"}"#).is_err());
    }

    #[test]
    fn breakdown_serializes_in_configured_order() {
        let breakdown = CategoryBreakdown(vec![
            ("Gaming".into(), CategoryStats { count: 0, total_stock: 0 }),
            ("Books".into(), CategoryStats { count: 2, total_stock: 7 }),
        ]);
        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(
            json,
            r#"{"Gaming":{"count":0,"total_stock":0},"Books":{"count":2,"total_stock":7}}"#
        );
    }
}
