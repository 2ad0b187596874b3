//! Score API 模块 (排行榜)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/v1/time",
        get(handler::best_times).post(handler::submit_time),
    )
}
