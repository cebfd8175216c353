//! 产品业务服务

use serde_json::{Map, Value};

use super::model::{CreateProductRequest, Product};
use super::repository::{ProductRepository, RepositoryError};
use crate::core::error::CoreError;

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) | RepositoryError::ImmutableField => {
                CoreError::NotFound(err.to_string())
            }
            RepositoryError::DuplicateCode(_) => {
                CoreError::BadRequest("Product already exists".to_string())
            }
            RepositoryError::InvalidPatch(_) => CoreError::BadRequest(err.to_string()),
            RepositoryError::Store(_) => CoreError::InternalServerError(err.to_string()),
        }
    }
}

/// 列表查询结果
#[derive(Debug)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// 是否按 `limit` 截断
    pub limited: bool,
}

#[derive(Debug, Clone)]
pub struct ProductService {
    repository: ProductRepository,
}

impl ProductService {
    pub fn new(repository: ProductRepository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &ProductRepository {
        &self.repository
    }

    /// 校验请求后创建产品，缺少字段时不会触碰存储
    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, CoreError> {
        let new_product = request.into_new_product()?;
        Ok(self.repository.add(new_product).await?)
    }

    /// `limit` 为正数时只返回前 `limit` 条，非正数或缺省视为不限制
    pub async fn list_products(&self, limit: Option<i64>) -> Result<ProductPage, CoreError> {
        let mut products = self.repository.list().await?;

        match limit.filter(|n| *n > 0) {
            Some(n) => {
                products.truncate(usize::try_from(n).unwrap_or(usize::MAX));
                Ok(ProductPage {
                    products,
                    limited: true,
                })
            }
            None => Ok(ProductPage {
                products,
                limited: false,
            }),
        }
    }

    /// 路径参数不是合法 id 时与 id 不存在同样处理
    pub async fn get_product(&self, pid: &str) -> Result<Product, CoreError> {
        let id = parse_id(pid)?;
        Ok(self.repository.get_by_id(id).await?)
    }

    pub async fn update_product(
        &self,
        pid: &str,
        patch: Map<String, Value>,
    ) -> Result<Product, CoreError> {
        let id = parse_id(pid)?;
        Ok(self.repository.update(id, patch).await?)
    }

    pub async fn delete_product(&self, pid: &str) -> Result<(), CoreError> {
        let id = parse_id(pid)?;
        Ok(self.repository.delete(id).await?)
    }
}

fn parse_id(pid: &str) -> Result<u64, CoreError> {
    pid.trim()
        .parse::<u64>()
        .map_err(|_| CoreError::NotFound(format!("Product with id: {} not found.", pid)))
}
