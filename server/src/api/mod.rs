//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员会话门禁接口
//! - [`photos`] - 照片公开读取接口
//! - [`play`] - 游戏点击判定接口
//! - [`scores`] - 排行榜接口
//! - [`admin_photos`] - 照片管理接口 (admin)
//! - [`admin_tags`] - 标签管理接口 (admin)
//!
//! All API routes live under `/api/v1`; uploaded images are served
//! statically from `/uploads`, outside the API prefix.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use uuid::Uuid;

use crate::core::ServerState;
use crate::storage::MAX_FILE_SIZE;

pub mod admin_photos;
pub mod admin_tags;
pub mod auth;
pub mod health;
pub mod photos;
pub mod play;
pub mod scores;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Public API
        .merge(photos::router())
        .merge(play::router())
        .merge(scores::router())
        .merge(auth::router())
        .merge(health::router())
        // Admin API - session gate required (tag routes nest inside)
        .merge(admin_photos::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: ServerState) -> Router {
    // Admin flag and play state are per-session, cookie-keyed, in-memory;
    // they expire with the session, never persisted.
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.session_ttl_minutes,
        )));

    build_router()
        // Static uploads, outside the API prefix
        .nest_service("/uploads", ServeDir::new(state.config.uploads_dir()))
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // ========== Application Middleware ==========
        // Session - executes before routes, injects Session
        .layer(session_layer)
        // Uploads may reach the 5MB cap plus multipart overhead
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024))
        .with_state(state)
}
