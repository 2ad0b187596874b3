//! 管理员会话门禁
//!
//! Session-scoped admin gate: a per-session boolean unlocked by a shared
//! password, gating the content-management routes.

pub mod gate;
pub mod middleware;

pub use gate::AdminGate;
pub use middleware::require_admin;
