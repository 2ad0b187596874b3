//! Admin Photo API 模块
//!
//! Content management for photos. Every route is behind the session
//! admin gate.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/admin/photo", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(super::photos::handler::list).post(handler::create))
        .route(
            "/{photo_id}",
            get(super::photos::handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_admin))
        // Tag management lives under its photo
        .nest("/{photo_id}/tag", super::admin_tags::routes())
}
