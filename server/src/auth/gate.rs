//! Admin gate state machine
//!
//! Two states per session: `disabled` (initial) and `enabled`.
//!
//! | 操作 | 前置状态 | 结果 |
//! |------|---------|------|
//! | enable(correct) | disabled | enabled, success |
//! | enable(wrong)   | disabled | disabled, failure |
//! | enable(anything)| enabled  | enabled, success (idempotent) |
//! | disable()       | any      | disabled, success |
//!
//! State lives in the caller's cookie-backed session record; each session
//! is independent and the flag dies with the session.

use tower_sessions::Session;

use crate::utils::AppResult;

const ADMIN_KEY: &str = "admin";

/// Session-scoped admin gate
pub struct AdminGate;

impl AdminGate {
    /// Whether this session is in the `enabled` state
    pub async fn is_enabled(session: &Session) -> AppResult<bool> {
        Ok(session.get::<bool>(ADMIN_KEY).await?.unwrap_or(false))
    }

    /// Try to enter the `enabled` state.
    ///
    /// Succeeds when the password matches the server secret, or when the
    /// session is already enabled (re-entering any password keeps admin on).
    pub async fn enable(session: &Session, password: &str, secret: &str) -> AppResult<bool> {
        if Self::is_enabled(session).await? {
            return Ok(true);
        }
        if password == secret {
            session.insert(ADMIN_KEY, true).await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Unconditionally enter the `disabled` state
    pub async fn disable(session: &Session) -> AppResult<()> {
        session.remove::<bool>(ADMIN_KEY).await?;
        Ok(())
    }
}
