//! 商品目录业务服务

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use super::model::{CatalogStats, PriceFilter, Product, ProductDraft, ProductPatch, SortSpec};
use super::store::CatalogStore;
use crate::core::error::Result;

/// 进程内共享的商品目录。
///
/// 写操作（含 id 计数器递增）持有写锁，查询持有读锁。
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<RwLock<CatalogStore>>,
    strict_sort: bool,
}

impl CatalogService {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            strict_sort: false,
        }
    }

    /// 未知的 `sort_by` 返回校验错误而不是退化为插入顺序
    pub fn with_strict_sort(mut self, strict: bool) -> Self {
        self.strict_sort = strict;
        self
    }

    pub fn strict_sort(&self) -> bool {
        self.strict_sort
    }

    // store 的每个写操作都先校验后写入，锁中毒时内部状态仍然一致
    fn read(&self) -> RwLockReadGuard<'_, CatalogStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self, filter: &PriceFilter, sort: &SortSpec) -> Vec<Product> {
        self.read().list(filter, sort)
    }

    pub fn get(&self, id: u64) -> Result<Product> {
        self.read().get(id)
    }

    pub fn create(&self, draft: ProductDraft) -> Result<Product> {
        let today = chrono::Local::now().date_naive();
        let product = self.write().create(draft, today)?;
        info!(product_id = product.id, category = %product.category, "Product created");
        Ok(product)
    }

    pub fn update(&self, id: u64, patch: ProductPatch) -> Result<Product> {
        let changed = !patch.is_empty();
        let product = self.write().update(id, patch)?;
        info!(product_id = id, changed, "Product updated");
        Ok(product)
    }

    pub fn delete(&self, id: u64) -> Result<u64> {
        let id = self.write().delete(id)?;
        info!(product_id = id, "Product deleted");
        Ok(id)
    }

    pub fn search(&self, query: &str, category: &str) -> Result<Vec<Product>> {
        self.read().search(query, category)
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.read().by_category(category)
    }

    pub fn categories(&self) -> Vec<String> {
        self.read().categories().to_vec()
    }

    pub fn stats(&self) -> CatalogStats {
        self.read().stats()
    }

    pub fn total_products(&self) -> usize {
        self.read().len()
    }
}
