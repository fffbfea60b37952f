//! # 杂货店后台服务
//!
//! 管理商品、分类、进货与期初库存：
//! - 商品目录与分类目录
//! - 进货登记
//! - 期初库存登记，按商品名解析分类并支持按分类过滤

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{create_routes, AppState};
pub use crate::core::error::CoreError;
pub use infrastructure::config::Config;
