//! 应用层：路由组装

pub mod products;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::{error::CoreError, middleware::request_logging_middleware};
use products::handler::{self, AppState};

/// 组装全部路由与中间件
pub fn router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/products/:pid",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 欢迎信息
async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome, to access the products go to the route /products"
    }))
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, CoreError> {
    let repository = state.product_service.repository();
    let products = repository.list().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "type": "json-file",
            "path": repository.path().display().to_string(),
            "products": products.len()
        }
    })))
}
