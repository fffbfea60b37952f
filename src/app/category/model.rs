//! 分类数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// 创建分类请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "分类名称长度必须在1到100之间"))]
    pub name: String,
}

/// `?category=` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: Option<String>,
}

impl CategoryQuery {
    /// 空字符串视为未指定
    pub fn requested(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}
