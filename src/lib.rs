//! # 商品目录服务
//!
//! 内存中的商品目录，通过 JSON HTTP API 提供增删改查、过滤排序、搜索、分类查询和统计。
//! - `app`: 路由、处理器和目录存储
//! - `core`: 错误处理、响应结构、中间件
//! - `infrastructure`: 配置和日志

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::catalog::{AppState, CatalogService, CatalogStore};
pub use crate::core::error::{CatalogError, Result};
pub use infrastructure::config::Config;
