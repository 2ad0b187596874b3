//! 工具模块
//!
//! - [`error`] - 统一错误类型和响应封装
//! - [`response`] - 成功响应辅助函数
//! - [`validation`] - 声明式表单校验
//! - [`logger`] - 日志初始化
//! - [`time`] - 时间戳辅助函数

pub mod error;
pub mod logger;
pub mod response;
pub mod time;
pub mod validation;

pub use error::{AppError, FieldError};
pub use response::{ApiResponse, Status, success, success_message};

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;
