//! Play API 模块 (点击判定)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/v1/check-tag", post(handler::check_tag))
}
