//! API 统一响应结构
//!
//! ```json
//! {
//!   "status": "success",
//!   "data": { ... }
//! }
//! ```

use axum::Json;
use serde::Serialize;
use serde_json::json;

/// Envelope status discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
    Error,
}

/// API 统一响应信封
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: Status,
    pub data: T,
}

/// Create a successful response
pub fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status: Status::Success,
        data,
    })
}

/// Create a successful response carrying only a message
pub fn success_message(message: impl Into<String>) -> Json<ApiResponse<serde_json::Value>> {
    success(json!({ "message": message.into() }))
}
