//! 核心响应处理模块

use serde::Serialize;

/// API 响应结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    /// 仅携带提示信息的响应，`data` 序列化为 `null`
    pub fn message(message: impl Into<String>) -> Self {
        Self::success((), message)
    }
}
