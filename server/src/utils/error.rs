//! 统一错误处理
//!
//! 提供应用级错误类型和响应封装：
//! - [`AppError`] - 应用错误枚举
//! - [`FieldError`] - 字段级校验错误
//!
//! # 错误分类
//!
//! | 变体 | HTTP | status |
//! |------|------|--------|
//! | Validation | 400 | fail |
//! | BadCredentials | 401 | fail |
//! | Forbidden | 403 | fail |
//! | NotFound | 404 | fail |
//! | Database / Internal | 500 | error |
//!
//! 所有响应共用 `{status, data}` 信封；校验失败在 `data.validation`
//! 携带逐字段错误列表。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("That photo does not exist."))
//!
//! // 返回成功响应
//! Ok(success(data))
//! ```

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::db::repository::RepoError;
use crate::utils::response::{ApiResponse, Status};

/// A single field-level validation error.
///
/// Shape matches what the client renders next to each form field:
/// `{path, msg, location, type, value}`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// Field name, e.g. `"altText"` or `"create[0].name"`
    pub path: String,
    /// Human-readable message
    pub msg: String,
    /// Where the value came from (`"body"`, `"query"`, `"session"`)
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// The offending value as submitted (null when absent)
    pub value: serde_json::Value,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
            location: "body".to_string(),
            kind: "field".to_string(),
            value,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 校验错误 (400) ==========
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    // ========== 认证错误 (401) ==========
    #[error("Bad credentials: {0}")]
    BadCredentials(String),

    // ========== 权限错误 (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 业务逻辑错误 (404) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure on a single field
    pub fn field(
        path: impl Into<String>,
        msg: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self::Validation(vec![FieldError::new(path, msg, value)])
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }

    pub fn bad_credentials(msg: impl Into<String>) -> Self {
        Self::BadCredentials(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (http_status, status, data) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Status::Fail,
                json!({ "validation": errors }),
            ),
            AppError::BadCredentials(msg) => (
                StatusCode::UNAUTHORIZED,
                Status::Fail,
                json!({ "message": msg }),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                Status::Fail,
                json!({ "message": msg }),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Status::Fail,
                json!({ "message": msg }),
            ),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Status::Error,
                    json!({ "message": msg }),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Status::Error,
                    json!({ "message": msg }),
                )
            }
        };

        (http_status, Json(ApiResponse { status, data })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::field(
            "photo",
            format!("Invalid multipart request: {e}"),
            serde_json::Value::Null,
        )
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("Session error: {e}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {e}"))
    }
}
