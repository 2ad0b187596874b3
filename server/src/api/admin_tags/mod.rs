//! Admin Tag API 模块
//!
//! Tag management nested under its photo. Every route is behind the
//! session admin gate.

mod handler;

pub(crate) use handler::TAG_NOT_FOUND;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Routes nested under `/api/v1/admin/photo/{photo_id}/tag` by the admin
/// photo router.
pub(crate) fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create).put(handler::bulk_update))
        .route("/{tag_id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin))
}
