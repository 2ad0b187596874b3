//! Health API 模块

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::utils::{ApiResponse, success_message};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/v1/health", get(health))
}

/// GET /api/v1/health - 健康检查
async fn health() -> axum::Json<ApiResponse<serde_json::Value>> {
    success_message("ok")
}
