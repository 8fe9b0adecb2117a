//! 统一错误处理
//!
//! 领域层使用 [`crate::orders::OrderError`]；HTTP 层统一转换为 [`AppError`]，
//! 由 `IntoResponse` 输出 `{code, message}` 响应体。
//!
//! # 错误码规范
//!
//! | 错误码 | 分类 | HTTP |
//! |--------|------|------|
//! | E0001 | 数据库错误 | 500 |
//! | E0002 | 验证失败 | 400 |
//! | E0003 | 资源不存在 | 404 |
//! | E0004 | 资源冲突 | 409 |
//! | E0005 | 业务规则违反 | 422 |
//! | E0006 | 内部错误 | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::orders::{OrderError, StorageError};

/// API 错误响应结构
///
/// ```json
/// {
///   "code": "E0003",
///   "message": "Order not found: ..."
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Conflict: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// 业务规则违反 (422)
    BusinessRule(String),

    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "E0004"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002"),
            AppError::BusinessRule(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0005"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E0001"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E0006"),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }

        let body = AppResponse {
            code: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::TableNotFound(_) | OrderError::OrderNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            OrderError::AlreadyPaid(_) | OrderError::ConflictRetryExhausted(_) => {
                AppError::Conflict(err.to_string())
            }
            OrderError::EmptyOrder(_) => AppError::BusinessRule(err.to_string()),
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Database(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
