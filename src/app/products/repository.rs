//! 产品仓储
//!
//! 所有操作都对数据文件做完整的「读取-修改-写回」，并在同一把进程内互斥锁
//! 下执行：并发写入不会丢失更新，也不会分配出重复的 id。

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::model::{NewProduct, Product, ProductPatch};
use crate::infrastructure::json_store::{JsonFileStore, StoreError};

/// 仓储错误类型
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Product with id: {0} not found.")]
    NotFound(u64),
    #[error("Product with code {0} already exists")]
    DuplicateCode(String),
    #[error("Cannot update 'id' or 'code' property")]
    ImmutableField,
    #[error("Invalid product fields: {0}")]
    InvalidPatch(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// 基于 JSON 文件的产品仓储
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: JsonFileStore,
    lock: Arc<Mutex<()>>,
}

impl ProductRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// 数据文件不存在时创建空数组文件
    pub async fn ensure_file(&self) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;
        self.store.ensure_file().await.map_err(log_store_error)?;
        Ok(())
    }

    /// 读取全部产品，新建的存储与空存储同样返回 `[]`
    pub async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// 下一个 id：现有最大 id + 1，空集合为 1
    pub fn next_id(products: &[Product]) -> u64 {
        products.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }

    /// 新增产品，`code` 重复时拒绝
    pub async fn add(&self, new_product: NewProduct) -> RepositoryResult<Product> {
        let _guard = self.lock.lock().await;
        let mut products = self.load().await?;

        if products.iter().any(|p| p.code == new_product.code) {
            warn!("产品编码 {} 已存在", new_product.code);
            return Err(RepositoryError::DuplicateCode(new_product.code));
        }

        let product = new_product.into_product(Self::next_id(&products));
        products.push(product.clone());
        self.save(&products).await?;

        info!("产品创建成功: id={} code={}", product.id, product.code);
        Ok(product)
    }

    /// 按 id 查询产品
    pub async fn get_by_id(&self, id: u64) -> RepositoryResult<Product> {
        let _guard = self.lock.lock().await;
        let products = self.load().await?;

        match products.into_iter().find(|p| p.id == id) {
            Some(product) => Ok(product),
            None => {
                warn!("产品不存在: id={}", id);
                Err(RepositoryError::NotFound(id))
            }
        }
    }

    /// 部分更新产品
    ///
    /// 依次检查：id 是否存在、补丁是否包含 `id`/`code`、补丁字段是否合法
    pub async fn update(&self, id: u64, patch: Map<String, Value>) -> RepositoryResult<Product> {
        let _guard = self.lock.lock().await;
        let mut products = self.load().await?;

        let Some(ix) = products.iter().position(|p| p.id == id) else {
            warn!("产品不存在: id={}", id);
            return Err(RepositoryError::NotFound(id));
        };

        if patch.contains_key("id") || patch.contains_key("code") {
            warn!("拒绝修改产品 {} 的 id 或 code", id);
            return Err(RepositoryError::ImmutableField);
        }

        let patch: ProductPatch =
            serde_json::from_value(Value::Object(patch)).map_err(RepositoryError::InvalidPatch)?;
        patch.apply(&mut products[ix]);

        let updated = products[ix].clone();
        self.save(&products).await?;

        info!("产品更新成功: id={}", id);
        Ok(updated)
    }

    /// 删除产品
    pub async fn delete(&self, id: u64) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;
        let products = self.load().await?;

        if !products.iter().any(|p| p.id == id) {
            warn!("产品不存在: id={}", id);
            return Err(RepositoryError::NotFound(id));
        }

        let remaining: Vec<Product> = products.into_iter().filter(|p| p.id != id).collect();
        self.save(&remaining).await?;

        info!("产品删除成功: id={}", id);
        Ok(())
    }

    async fn load(&self) -> RepositoryResult<Vec<Product>> {
        self.store.read_all().await.map_err(log_store_error)
    }

    async fn save(&self, products: &[Product]) -> RepositoryResult<()> {
        self.store.write_all(products).await.map_err(log_store_error)?;
        Ok(())
    }
}

fn log_store_error(err: StoreError) -> RepositoryError {
    error!("数据文件访问失败: {}", err);
    RepositoryError::Store(err)
}
