//! Admin Tag API Handlers
//!
//! Single-tag CRUD plus the bulk endpoint the tagging editor saves with.
//! Bulk payloads are JSON; single-tag writes are plain forms. All paths
//! verify the parent photo first so a tag can never be managed under the
//! wrong photo.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::api::photos::handler::PHOTO_NOT_FOUND;
use crate::core::ServerState;
use crate::db::models::{BulkTagUpdate, TagCreate, TagUpdate};
use crate::db::repository::{RepoError, photo, tag};
use crate::utils::validation::{self, FieldRule, MAX_TAG_NAME_LEN};
use crate::utils::{ApiResponse, AppError, AppResult, FieldError, success};

pub const TAG_NOT_FOUND: &str = "That tag does not exist.";

const CREATE_RULES: &[FieldRule] = &[
    FieldRule::alphanumeric("name", 1, MAX_TAG_NAME_LEN),
    FieldRule::float("posX", 0.0, 1.0),
    FieldRule::float("posY", 0.0, 1.0),
];

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::alphanumeric("name", 1, MAX_TAG_NAME_LEN).optional(),
    FieldRule::float("posX", 0.0, 1.0).optional(),
    FieldRule::float("posY", 0.0, 1.0).optional(),
];

async fn require_photo(state: &ServerState, photo_id: i64) -> AppResult<()> {
    photo::find_by_id(&state.pool, photo_id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;
    Ok(())
}

/// GET /api/v1/admin/photo/{photo_id}/tag - 获取照片的所有标签
pub async fn list(
    State(state): State<ServerState>,
    Path(photo_id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    require_photo(&state, photo_id).await?;
    let tags = tag::find_for_photo(&state.pool, photo_id).await?;
    Ok(success(json!({
        "message": "Tags retrieved.",
        "tags": tags,
    })))
}

/// POST /api/v1/admin/photo/{photo_id}/tag - 创建标签
pub async fn create(
    State(state): State<ServerState>,
    Path(photo_id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let v = validation::check(CREATE_RULES, &form)?;
    require_photo(&state, photo_id).await?;

    let created = tag::create(
        &state.pool,
        photo_id,
        TagCreate {
            name: v.require_text("name")?.to_string(),
            pos_x: v.require_float("posX")?,
            pos_y: v.require_float("posY")?,
        },
    )
    .await?;

    tracing::info!(photo_id, tag_id = created.id, "Tag created");
    Ok(success(json!({
        "message": "Tag created.",
        "tag": created,
    })))
}

/// PUT /api/v1/admin/photo/{photo_id}/tag/{tag_id} - 更新标签 (部分更新)
pub async fn update(
    State(state): State<ServerState>,
    Path((photo_id, tag_id)): Path<(i64, i64)>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let v = validation::check(UPDATE_RULES, &form)?;
    let fields = TagUpdate {
        name: v.text("name").map(str::to_string),
        pos_x: v.float("posX"),
        pos_y: v.float("posY"),
    };
    if fields.name.is_none() && fields.pos_x.is_none() && fields.pos_y.is_none() {
        return Err(AppError::field(
            "name",
            "At least one of name, posX or posY is required",
            Value::Null,
        ));
    }

    require_photo(&state, photo_id).await?;
    let updated = tag::update(&state.pool, photo_id, tag_id, fields)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::not_found(TAG_NOT_FOUND),
            other => other.into(),
        })?;

    tracing::info!(photo_id, tag_id, "Tag updated");
    Ok(success(json!({
        "message": "Tag updated.",
        "tag": updated,
    })))
}

/// DELETE /api/v1/admin/photo/{photo_id}/tag/{tag_id} - 删除标签
pub async fn delete(
    State(state): State<ServerState>,
    Path((photo_id, tag_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    require_photo(&state, photo_id).await?;
    if !tag::delete(&state.pool, photo_id, tag_id).await? {
        return Err(AppError::not_found(TAG_NOT_FOUND));
    }

    tracing::info!(photo_id, tag_id, "Tag deleted");
    Ok(success(json!({ "message": "Tag deleted." })))
}

/// PUT /api/v1/admin/photo/{photo_id}/tag - 批量保存标签
///
/// Applies the editor's whole create/update/delete set as one transaction;
/// a missing id anywhere rolls the entire request back.
pub async fn bulk_update(
    State(state): State<ServerState>,
    Path(photo_id): Path<i64>,
    Json(bulk): Json<BulkTagUpdate>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    validate_bulk(&bulk)?;
    require_photo(&state, photo_id).await?;

    let tags = tag::apply_bulk(&state.pool, photo_id, bulk).await?;

    tracing::info!(photo_id, tag_count = tags.len(), "Tags bulk-saved");
    Ok(success(json!({
        "message": "Tags saved.",
        "tags": tags,
    })))
}

/// Field checks for the bulk payload, with express-style indexed paths so
/// the editor can mark the offending entry.
fn validate_bulk(bulk: &BulkTagUpdate) -> AppResult<()> {
    if bulk.is_empty() {
        return Err(AppError::field(
            "create",
            "At least one of create, update or delete is required",
            Value::Null,
        ));
    }

    let mut errors = Vec::new();

    for (i, item) in bulk.create.iter().enumerate() {
        check_name(&format!("create[{i}].name"), &item.name, &mut errors);
        check_pos(&format!("create[{i}].posX"), item.pos_x, &mut errors);
        check_pos(&format!("create[{i}].posY"), item.pos_y, &mut errors);
    }

    for (i, item) in bulk.update.iter().enumerate() {
        let fields = &item.fields;
        if fields.name.is_none() && fields.pos_x.is_none() && fields.pos_y.is_none() {
            errors.push(FieldError::new(
                format!("update[{i}]"),
                "At least one of name, posX or posY is required",
                json!(item.id),
            ));
            continue;
        }
        if let Some(name) = &fields.name {
            check_name(&format!("update[{i}].name"), name, &mut errors);
        }
        if let Some(x) = fields.pos_x {
            check_pos(&format!("update[{i}].posX"), x, &mut errors);
        }
        if let Some(y) = fields.pos_y {
            check_pos(&format!("update[{i}].posY"), y, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(errors))
    }
}

fn check_name(path: &str, name: &str, errors: &mut Vec<FieldError>) {
    let len = name.chars().count();
    if len < 1 || len > MAX_TAG_NAME_LEN {
        errors.push(FieldError::new(
            path,
            format!("name must be between 1 and {MAX_TAG_NAME_LEN} characters"),
            json!(name),
        ));
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(
            path,
            "name must contain only letters and numbers",
            json!(name),
        ));
    }
}

fn check_pos(path: &str, value: f64, errors: &mut Vec<FieldError>) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        errors.push(FieldError::new(
            path,
            "position must be between 0 and 1",
            json!(value),
        ));
    }
}
