//! Tag Model
//!
//! A tag is a named point on a photo. Coordinates are fractions of the
//! image width/height so they are resolution-independent.

use serde::{Deserialize, Serialize};

/// Tag row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Fraction of image width, in [0,1]
    pub pos_x: f64,
    /// Fraction of image height, in [0,1]
    pub pos_y: f64,
    pub photo_id: i64,
    pub created_at: i64,
}

/// Create payload (validated before persistence)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCreate {
    pub name: String,
    pub pos_x: f64,
    pub pos_y: f64,
}

/// Partial update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    pub name: Option<String>,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
}

/// One entry of a bulk update's `update` list, carrying the target id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdateItem {
    pub id: i64,
    #[serde(flatten)]
    pub fields: TagUpdate,
}

/// Bulk create/update/delete request, applied as one logical unit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkTagUpdate {
    #[serde(default)]
    pub create: Vec<TagCreate>,
    #[serde(default)]
    pub update: Vec<TagUpdateItem>,
    #[serde(default)]
    pub delete: Vec<i64>,
}

impl BulkTagUpdate {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}
