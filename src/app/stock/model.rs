//! 库存数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 期初库存登记中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub quantity: u64,
    pub purchase_price: f64,
    /// quantity * purchase_price
    pub stock_value: f64,
    pub created_at: DateTime<Utc>,
    /// 按商品名解析出的分类，每次生成时重新计算
    #[serde(default)]
    pub category_name: Option<String>,
}

/// 一次进货
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,
    pub total_cost: f64,
    pub purchase_date: DateTime<Utc>,
}

/// 登记进货请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    pub product_id: u64,
    #[validate(range(min = 1, message = "进货数量必须大于0"))]
    pub quantity: u32,
    #[validate(range(exclusive_min = 0.0, message = "进货单价必须大于0"))]
    pub unit_cost: f64,
}

/// 一次销售
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,
    /// selling_price * quantity
    pub total_amount: f64,
    pub sale_date: DateTime<Utc>,
}

/// 登记销售请求，金额按商品售价计算
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSaleRequest {
    pub product_id: u64,
    #[validate(range(min = 1, message = "销售数量必须大于0"))]
    pub quantity: u32,
}
