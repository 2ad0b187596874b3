//! Photo API Handlers (public reads)

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::core::ServerState;
use crate::db::repository::{photo, tag};
use crate::utils::{ApiResponse, AppError, AppResult, success};

pub const PHOTO_NOT_FOUND: &str = "That photo does not exist.";

/// GET /api/v1/photo - 获取所有照片 (含标签数量)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let base = &state.config.public_base_url;
    let photos: Vec<_> = photo::find_all(&state.pool)
        .await?
        .into_iter()
        .map(|p| p.into_view(base))
        .collect();

    Ok(success(json!({
        "message": "Photos retrieved.",
        "photos": photos,
    })))
}

/// GET /api/v1/photo/{id} - 获取单张照片
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let record = photo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;
    let tag_count = tag::count_for_photo(&state.pool, id).await?;

    Ok(success(json!({
        "message": "Photo retrieved.",
        "photo": record.into_view(&state.config.public_base_url, tag_count),
    })))
}
