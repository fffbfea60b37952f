//! 商品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 计量单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Kgs,
    Ltr,
    Pcs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    /// 缺失时按空字符串处理
    #[serde(default)]
    pub name: String,
    /// 进货价
    pub purchase_price: f64,
    /// 售价
    pub selling_price: f64,
    pub unit_type: UnitType,
    #[serde(default)]
    pub category: Option<String>,
    /// 当前库存，随进货变化
    pub stock: f64,
    /// 建档时的库存，不再变化
    pub initial_stock: f64,
    pub created_at: DateTime<Utc>,
}

/// 创建商品请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "商品名称长度必须在1到100之间"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "进货价必须大于0"))]
    pub purchase_price: f64,
    #[validate(range(exclusive_min = 0.0, message = "售价必须大于0"))]
    pub selling_price: f64,
    pub unit_type: UnitType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "库存不能为负数"))]
    pub stock: f64,
}

/// 更新商品请求，只修改提供的字段
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "商品名称长度必须在1到100之间"))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "进货价必须大于0"))]
    pub purchase_price: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "售价必须大于0"))]
    pub selling_price: Option<f64>,
    pub unit_type: Option<UnitType>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "库存不能为负数"))]
    pub stock: Option<f64>,
}
