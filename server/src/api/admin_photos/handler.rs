//! Admin Photo API Handlers
//!
//! Multipart uploads carry the image under the `photo` part and text
//! fields alongside it. The stored file and the database row are kept in
//! step: on create the row insert follows the file write and a failed
//! insert removes the fresh file; on delete the rows go first and the
//! file is removed only after the transaction committed.

use std::collections::HashMap;
use std::path::Path as FsPath;

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde_json::{Value, json};

use crate::api::photos::handler::PHOTO_NOT_FOUND;
use crate::core::ServerState;
use crate::db::repository::photo;
use crate::utils::validation::{self, FieldRule, MAX_ALT_TEXT_LEN};
use crate::utils::{ApiResponse, AppError, AppResult, FieldError, success, success_message};

const CREATE_RULES: &[FieldRule] = &[FieldRule::text("altText", 1, MAX_ALT_TEXT_LEN)];
const UPDATE_RULES: &[FieldRule] = &[FieldRule::text("altText", 1, MAX_ALT_TEXT_LEN).optional()];

/// An uploaded image part, as received
struct UploadedFile {
    name: String,
    ext: String,
    data: Vec<u8>,
}

/// Parsed multipart request: text fields plus the optional `photo` part
struct Upload {
    text: HashMap<String, String>,
    file: Option<UploadedFile>,
}

async fn read_upload(multipart: &mut Multipart) -> AppResult<Upload> {
    let mut upload = Upload {
        text: HashMap::new(),
        file: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "photo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let ext = FsPath::new(&file_name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string();
            let data = field.bytes().await?.to_vec();
            upload.file = Some(UploadedFile {
                name: file_name,
                ext,
                data,
            });
        } else {
            upload.text.insert(name, field.text().await?);
        }
    }

    Ok(upload)
}

/// Run the text schema but keep collecting, so file errors and text errors
/// land in one validation response.
fn check_text(
    rules: &[FieldRule],
    form: &HashMap<String, String>,
    errors: &mut Vec<FieldError>,
) -> AppResult<Option<validation::Validated>> {
    match validation::check(rules, form) {
        Ok(v) => Ok(Some(v)),
        Err(AppError::Validation(e)) => {
            errors.extend(e);
            Ok(None)
        }
        Err(other) => Err(other),
    }
}

/// POST /api/v1/admin/photo - 上传新照片
pub async fn create(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let upload = read_upload(&mut multipart).await?;

    let mut errors = Vec::new();
    let validated = check_text(CREATE_RULES, &upload.text, &mut errors)?;
    match &upload.file {
        None => errors.push(FieldError::new("photo", "photo is required", Value::Null)),
        Some(file) => {
            if let Err(msg) = state.images.validate(&file.data, &file.ext) {
                errors.push(FieldError::new("photo", msg, json!(file.name)));
            }
        }
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let (Some(validated), Some(file)) = (validated, upload.file) else {
        return Err(AppError::internal("Upload passed validation without data"));
    };
    let alt_text = validated.require_text("altText")?;

    let filename = state.images.save(&file.data, &file.ext).await?;
    let record = match photo::create(&state.pool, &filename, alt_text).await {
        Ok(record) => record,
        Err(e) => {
            // Roll the stored file back so a failed insert leaves no orphan
            if let Err(cleanup) = state.images.delete(&filename).await {
                tracing::error!(error = %cleanup, "Orphaned upload left behind");
            }
            return Err(e.into());
        }
    };

    tracing::info!(photo_id = record.id, filename = %filename, "Photo created");
    Ok(success(json!({
        "message": "Photo created.",
        "photo": record.into_view(&state.config.public_base_url, 0),
    })))
}

/// PUT /api/v1/admin/photo/{id} - 更新照片 (部分更新)
///
/// Accepts a new image, a new alt text, or both; rejects a request that
/// supplies neither.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let existing = photo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;

    let upload = read_upload(&mut multipart).await?;

    let mut errors = Vec::new();
    let validated = check_text(UPDATE_RULES, &upload.text, &mut errors)?;
    if let Some(file) = &upload.file {
        if let Err(msg) = state.images.validate(&file.data, &file.ext) {
            errors.push(FieldError::new("photo", msg, json!(file.name)));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let Some(validated) = validated else {
        return Err(AppError::internal("Upload passed validation without data"));
    };
    let alt_text = validated.text("altText");
    if upload.file.is_none() && alt_text.is_none() {
        return Err(AppError::field(
            "photo",
            "At least one of photo or altText is required",
            Value::Null,
        ));
    }

    let new_filename = match &upload.file {
        Some(file) => Some(state.images.save(&file.data, &file.ext).await?),
        None => None,
    };

    let record = match photo::update(&state.pool, id, new_filename.as_deref(), alt_text).await {
        Ok(record) => record,
        Err(e) => {
            if let Some(filename) = &new_filename {
                if let Err(cleanup) = state.images.delete(filename).await {
                    tracing::error!(error = %cleanup, "Orphaned upload left behind");
                }
            }
            return Err(e.into());
        }
    };

    // The replaced image is deleted only after the row points elsewhere
    if new_filename.is_some() {
        state.images.delete(&existing.url).await?;
    }

    let tag_count = crate::db::repository::tag::count_for_photo(&state.pool, id).await?;
    tracing::info!(photo_id = id, "Photo updated");
    Ok(success(json!({
        "message": "Photo updated.",
        "photo": record.into_view(&state.config.public_base_url, tag_count),
    })))
}

/// DELETE /api/v1/admin/photo/{id} - 删除照片及其标签
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let removed_url = photo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;

    // Rows are already gone; a failed file removal is reported, not hidden
    state.images.delete(&removed_url).await?;

    tracing::info!(photo_id = id, "Photo deleted");
    Ok(success_message("Photo deleted."))
}
