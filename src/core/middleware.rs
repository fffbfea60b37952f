//! 核心中间件模块

use axum::{
    extract::Request,
    http::{header::USER_AGENT, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 当前请求的 ID；不在请求上下文中时生成新的 ID
pub fn current_request_id() -> String {
    REQUEST_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| Uuid::new_v4().to_string())
}

/// 请求日志中间件，并在响应头中写入请求 ID
///
/// 处理器在同一个请求 ID 作用域内执行，响应体里的 `request_id` 与响应头一致。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let mut response = REQUEST_ID.scope(request_id.clone(), next.run(req)).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%request_id, %method, %uri, %user_agent, status = status.as_u16(), elapsed_ms, "请求失败");
    } else {
        info!(%request_id, %method, %uri, %user_agent, status = status.as_u16(), elapsed_ms, "请求完成");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
