//! 应用层：各业务模块与路由

pub mod category;
pub mod product;
pub mod stock;

use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::error::CoreError;
use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::store::MemoryTable;
use category::{model::Category, service::CategoryService};
use product::{model::Product, service::ProductService};
use stock::{
    model::{Purchase, Sale},
    service::StockService,
};

/// 所有处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub category_service: CategoryService,
    pub product_service: ProductService,
    pub stock_service: StockService,
    products: MemoryTable<Product>,
    categories: MemoryTable<Category>,
    purchases: MemoryTable<Purchase>,
    sales: MemoryTable<Sale>,
}

impl AppState {
    /// 创建空的内存数据表并组装服务
    pub fn new() -> Self {
        let products = MemoryTable::new("products");
        let categories = MemoryTable::new("categories");
        let purchases = MemoryTable::new("purchases");
        let sales = MemoryTable::new("sales");

        let category_service = CategoryService::new(categories.clone(), products.clone());
        let product_service = ProductService::new(
            products.clone(),
            purchases.clone(),
            sales.clone(),
            category_service.clone(),
        );
        let stock_service = StockService::new(products.clone(), purchases.clone(), sales.clone());

        Self {
            category_service,
            product_service,
            stock_service,
            products,
            categories,
            purchases,
            sales,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 构建完整路由
pub fn create_routes(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/products",
            get(product::handler::list_products).post(product::handler::create_product),
        )
        .route(
            "/products/:id",
            get(product::handler::get_product)
                .put(product::handler::update_product)
                .delete(product::handler::delete_product),
        )
        .route(
            "/categories",
            get(category::handler::list_categories).post(category::handler::create_category),
        )
        .route("/categories/:id", delete(category::handler::delete_category))
        .route("/purchases", post(stock::handler::record_purchase))
        .route("/purchases/:id", delete(stock::handler::delete_purchase))
        .route("/sales", post(stock::handler::record_sale))
        .route("/sales/:id", delete(stock::handler::delete_sale))
        .route(
            "/opening-stock-register",
            get(stock::handler::opening_stock_register),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TimeoutLayer::new(timeout))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Kirana Store API is running",
        "status": "active",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, CoreError> {
    let mut tables = serde_json::Map::new();
    tables.insert(state.products.name().to_string(), state.products.len()?.into());
    tables.insert(state.categories.name().to_string(), state.categories.len()?.into());
    tables.insert(state.purchases.name().to_string(), state.purchases.len()?.into());
    tables.insert(state.sales.name().to_string(), state.sales.len()?.into());

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "database": {
            "type": "in-memory",
            "tables": tables,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
