//! Photo Model
//!
//! `url` persists the bare stored filename only; the absolute URL is
//! computed at response time by prefixing the configured public base,
//! so the base can change without a data migration.

use serde::{Deserialize, Serialize};

/// Photo row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: i64,
    /// Bare stored filename, never an absolute URL
    pub url: String,
    pub alt_text: String,
    pub created_at: i64,
}

/// Photo row joined with its tag count (list query)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhotoWithCount {
    pub id: i64,
    pub url: String,
    pub alt_text: String,
    pub created_at: i64,
    pub tag_count: i64,
}

/// Client-facing photo representation with the re-based URL
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoView {
    pub id: i64,
    pub alt_text: String,
    pub url: String,
    pub tag_count: i64,
}

impl Photo {
    pub fn into_view(self, public_base: &str, tag_count: i64) -> PhotoView {
        PhotoView {
            id: self.id,
            alt_text: self.alt_text,
            url: join_url(public_base, &self.url),
            tag_count,
        }
    }
}

impl PhotoWithCount {
    pub fn into_view(self, public_base: &str) -> PhotoView {
        PhotoView {
            id: self.id,
            alt_text: self.alt_text,
            url: join_url(public_base, &self.url),
            tag_count: self.tag_count,
        }
    }
}

fn join_url(base: &str, filename: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), filename)
}
