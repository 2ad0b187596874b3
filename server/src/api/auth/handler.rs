//! Auth API Handlers
//!
//! Enable/disable the session's admin gate.

use std::collections::HashMap;

use axum::{Form, Json, extract::State};
use tower_sessions::Session;

use crate::auth::AdminGate;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::{self, FieldRule, MAX_PASSWORD_LEN};
use crate::utils::{ApiResponse, AppError, AppResult, success_message};

const ENABLE_RULES: &[FieldRule] = &[FieldRule::text("password", 1, MAX_PASSWORD_LEN)];

/// POST /api/v1/auth/enable-admin - 开启管理员模式
///
/// Idempotent when the session is already enabled: any password reports
/// success and keeps the state.
pub async fn enable_admin(
    State(state): State<ServerState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let v = validation::check(ENABLE_RULES, &form)?;
    let password = v.require_text("password")?;

    if AdminGate::enable(&session, password, &state.config.admin_password).await? {
        tracing::info!("Admin mode enabled for session");
        Ok(success_message("Admin mode enabled."))
    } else {
        security_log!("WARN", "admin_enable_failed", reason = "wrong_password");
        Err(AppError::bad_credentials("Wrong password."))
    }
}

/// POST /api/v1/auth/disable-admin - 关闭管理员模式
///
/// Always succeeds, whatever the current state.
pub async fn disable_admin(
    session: Session,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    AdminGate::disable(&session).await?;
    Ok(success_message("Admin mode disabled."))
}
