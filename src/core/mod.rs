//! 核心层：错误、响应封装、中间件

pub mod error;
pub mod middleware;
pub mod response;

pub use error::{CoreError, ErrorResponse};
pub use response::{ApiResponse, DeleteSummary};
