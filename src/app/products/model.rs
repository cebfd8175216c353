//! 产品数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 持久化的产品记录，字段顺序即文件中的顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Vec<String>,
    pub code: String,
    pub stock: i64,
}

/// 待创建的产品（尚未分配 id）
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: Vec<String>,
    pub code: String,
    pub stock: i64,
}

impl NewProduct {
    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
            code: self.code,
            stock: self.stock,
        }
    }
}

const REQUIRED: &str = "All fields are required";

/// 创建产品请求，所有字段在反序列化阶段都可缺失，由校验统一拒绝
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(required(message = "All fields are required"), length(min = 1, message = "All fields are required"))]
    pub title: Option<String>,
    #[validate(required(message = "All fields are required"), length(min = 1, message = "All fields are required"))]
    pub description: Option<String>,
    #[validate(required(message = "All fields are required"), custom(function = "non_zero_price"))]
    pub price: Option<f64>,
    #[validate(required(message = "All fields are required"), length(min = 1, message = "All fields are required"))]
    pub code: Option<String>,
    #[validate(required(message = "All fields are required"), custom(function = "non_zero_stock"))]
    pub stock: Option<i64>,
    pub thumbnail: Option<Vec<String>>,
}

impl CreateProductRequest {
    /// 校验通过后转换为 [`NewProduct`]
    pub fn into_new_product(self) -> Result<NewProduct, validator::ValidationErrors> {
        self.validate()?;

        let (Some(title), Some(description), Some(price), Some(code), Some(stock)) =
            (self.title, self.description, self.price, self.code, self.stock)
        else {
            return Err(missing_fields());
        };

        Ok(NewProduct {
            title,
            description,
            price,
            thumbnail: self.thumbnail.unwrap_or_default(),
            code,
            stock,
        })
    }
}

// 数值字段为 0 与缺失同样视为未填写
fn non_zero_price(price: f64) -> Result<(), validator::ValidationError> {
    if price == 0.0 || price.is_nan() {
        return Err(required_error());
    }
    Ok(())
}

fn non_zero_stock(stock: i64) -> Result<(), validator::ValidationError> {
    if stock == 0 {
        return Err(required_error());
    }
    Ok(())
}

fn required_error() -> validator::ValidationError {
    let mut error = validator::ValidationError::new("required");
    error.message = Some(REQUIRED.into());
    error
}

fn missing_fields() -> validator::ValidationErrors {
    let mut errors = validator::ValidationErrors::new();
    errors.add("product", required_error());
    errors
}

/// 部分更新，只覆盖出现的字段；`id` 与 `code` 不在其中
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub thumbnail: Option<Vec<String>>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(thumbnail) = self.thumbnail {
            product.thumbnail = thumbnail;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}
