//! 商品目录: 模型、存储、服务和处理器

pub mod handler;
pub mod model;
pub mod service;
pub mod store;

pub use handler::AppState;
pub use model::{CatalogStats, PriceFilter, Product, ProductDraft, ProductPatch, SortField, SortSpec};
pub use service::CatalogService;
pub use store::CatalogStore;
