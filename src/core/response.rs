//! 核心响应处理模块

use serde::{Deserialize, Serialize};

use super::middleware::current_request_id;

/// API 响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// 删除操作的结果
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub id: u64,
    pub name: String,
    pub message: String,
    /// 级联删除的关联记录数
    #[serde(default)]
    pub cascaded: usize,
}
