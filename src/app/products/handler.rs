//! 产品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    model::{CreateProductRequest, Product},
    service::ProductService,
};
use crate::core::{error::CoreError, response::ApiResponse};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(product_service: ProductService) -> Self {
        Self { product_service }
    }
}

// 查询参数
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// 创建产品
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let Json(request) = payload?;
    let product = state.product_service.create_product(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(product, "Successfully created product")),
    ))
}

/// 获取产品列表，带正数 `limit` 时返回 206
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Product>>>), CoreError> {
    let Query(query) = query?;
    let page = state.product_service.list_products(query.limit).await?;

    let status = if page.limited {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };
    let message = format!("{} products", page.products.len());

    Ok((status, Json(ApiResponse::success(page.products, message))))
}

/// 获取单个产品
pub async fn get_product(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let product = state.product_service.get_product(&pid).await?;
    Ok(Json(ApiResponse::success(product, "Product found")))
}

/// 部分更新产品
pub async fn update_product(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let Json(patch) = payload?;
    let product = state.product_service.update_product(&pid, patch).await?;
    Ok(Json(ApiResponse::success(product, "Product updated")))
}

/// 删除产品
pub async fn delete_product(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<Json<ApiResponse<()>>, CoreError> {
    state.product_service.delete_product(&pid).await?;
    Ok(Json(ApiResponse::message(format!(
        "Product with id: {} was removed",
        pid
    ))))
}
