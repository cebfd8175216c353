//! # 产品目录服务
//!
//! 以单个 JSON 文件持久化产品记录的 HTTP CRUD 服务：
//! - app：路由、处理器、业务服务与文件仓储
//! - core：统一错误、响应结构与请求日志中间件
//! - infrastructure：JSON 文件存储与日志初始化
//! - config：TOML 配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use std::time::Duration;

use app::products::{handler::AppState, repository::ProductRepository, service::ProductService};
use config::Config;

/// 按配置构建完整的应用路由
pub fn build_app(config: &Config) -> axum::Router {
    let repository = ProductRepository::new(config.storage.data_path.clone());
    let state = AppState::new(ProductService::new(repository));

    app::router(state, Duration::from_secs(config.http.timeout_seconds))
}
