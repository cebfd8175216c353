//! 产品目录服务入口

use anyhow::Context;
use product_catalog::{
    app::products::repository::ProductRepository, build_app, config::load_config,
    infrastructure::logger::Logger,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("配置加载失败")?;

    Logger::init(&config.logging.level);
    info!("启动产品目录服务...");

    // 启动时预先创建数据文件
    ProductRepository::new(config.storage.data_path.clone())
        .ensure_file()
        .await
        .context("数据文件初始化失败")?;

    let app = build_app(&config);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;

    info!("🚀 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /                 - 欢迎信息");
    info!("   GET    /health           - 健康检查");
    info!("   GET    /products?limit=N - 获取产品列表");
    info!("   POST   /products         - 创建产品");
    info!("   GET    /products/:pid    - 获取产品");
    info!("   PUT    /products/:pid    - 更新产品");
    info!("   DELETE /products/:pid    - 删除产品");

    axum::serve(listener, app).await.context("服务器运行失败")?;

    Ok(())
}
