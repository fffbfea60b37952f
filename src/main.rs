use std::time::Duration;

use kirana_backoffice::infrastructure::{load_config, Logger};
use kirana_backoffice::{create_routes, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    Logger::init(&config.logging.level)?;

    info!("启动杂货店后台服务...");

    let state = AppState::new();
    if config.store.seed_sample_data {
        state.product_service.seed_sample_products()?;
    }

    let app = create_routes(state, Duration::from_secs(config.http.timeout_seconds));

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("🚀 服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /                        - 服务信息");
    info!("   GET    /health                  - 健康检查");
    info!("   GET    /products?category=      - 商品列表");
    info!("   POST   /products                - 创建商品");
    info!("   GET    /products/:id            - 获取商品");
    info!("   PUT    /products/:id            - 更新商品");
    info!("   DELETE /products/:id            - 删除商品");
    info!("   GET    /categories              - 分类列表");
    info!("   POST   /categories              - 创建分类");
    info!("   DELETE /categories/:id          - 删除分类");
    info!("   POST   /purchases               - 登记进货");
    info!("   DELETE /purchases/:id           - 撤销进货");
    info!("   POST   /sales                   - 登记销售");
    info!("   DELETE /sales/:id               - 撤销销售");
    info!("   GET    /opening-stock-register?category= - 期初库存登记");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("✅ 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听停止信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，正在关闭...");
}
