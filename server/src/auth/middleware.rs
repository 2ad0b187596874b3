//! 认证中间件
//!
//! Axum middleware guarding the admin content-management routes.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::auth::AdminGate;
use crate::security_log;
use crate::utils::AppError;

/// 管理员中间件 - 要求会话处于 admin 状态
///
/// Reads the session injected by the session layer and rejects the request
/// with 403 before the handler runs unless the gate is enabled.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let session = req
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::internal("Session layer missing"))?;

    if !AdminGate::is_enabled(&session).await? {
        security_log!(
            "WARN",
            "admin_required",
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::forbidden("Admin mode required."));
    }

    Ok(next.run(req).await)
}
