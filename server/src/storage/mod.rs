//! Image Storage
//!
//! Saves and deletes uploaded photo files under the uploads directory.
//! Stored names are `{millis}-{uuid}.{ext}` so two uploads with identical
//! original filenames never collide.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::utils::AppError;
use crate::utils::time::now_millis;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// File store for uploaded photos
#[derive(Debug, Clone)]
pub struct ImageStore {
    uploads_dir: PathBuf,
}

impl ImageStore {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    /// Validate an upload payload: size cap, extension whitelist, and an
    /// actual decode so a renamed non-image is rejected.
    ///
    /// Returns the field-level message on failure; the handler attaches it
    /// to the `photo` field.
    pub fn validate(&self, data: &[u8], ext: &str) -> Result<(), String> {
        if data.is_empty() {
            return Err("Empty file provided".to_string());
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ));
        }

        let ext_lower = ext.to_lowercase();
        if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
            return Err(format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ));
        }

        if let Err(e) = image::load_from_memory(data) {
            return Err(format!("Invalid image file ({ext_lower}): {e}"));
        }

        Ok(())
    }

    /// Save a validated payload under a unique filename; returns the bare
    /// filename to persist.
    pub async fn save(&self, data: &[u8], ext: &str) -> Result<String, AppError> {
        fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {e}")))?;

        let filename = format!("{}-{}.{}", now_millis(), Uuid::new_v4(), ext.to_lowercase());
        let path = self.uploads_dir.join(&filename);

        fs::write(&path, data)
            .await
            .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;

        tracing::info!(filename = %filename, size = data.len(), "Image stored");
        Ok(filename)
    }

    /// Delete a stored file by its bare filename.
    ///
    /// A missing file is not an error (nothing leaks); real I/O failures
    /// surface so the caller can report them.
    pub async fn delete(&self, filename: &str) -> Result<(), AppError> {
        // Filenames are generated by us; anything path-like is rejected.
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(AppError::internal(format!(
                "Refusing to delete suspicious filename: {filename}"
            )));
        }

        let path = self.uploads_dir.join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(filename = %filename, "Stored file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(filename = %filename, "Stored file already gone");
                Ok(())
            }
            Err(e) => Err(AppError::internal(format!(
                "Failed to delete stored file {filename}: {e}"
            ))),
        }
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.uploads_dir.join(filename)
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}
