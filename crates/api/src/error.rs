//! # API 统一错误处理
//!
//! 将桥接层的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kura_core::bridge::error::BridgeError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 会话已关闭，暂不可用 (503)
    #[error("会话不可用: {0}")]
    ServiceUnavailable(String),

    /// 会话执行失败 (502)
    #[error("会话执行失败: {0}")]
    BadGateway(String),

    /// 网关自身错误 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::BadGateway(msg) => {
                tracing::warn!("会话执行失败: {}", msg);
                msg
            }
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                "服务器内部错误".to_string()
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `BridgeError` 转换
impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match &err {
            BridgeError::InvalidArgument(msg) => ApiError::BadRequest(msg.clone()),
            BridgeError::SessionClosed => ApiError::ServiceUnavailable(err.to_string()),
            BridgeError::SessionFault(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}
