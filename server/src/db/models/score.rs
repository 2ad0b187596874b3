//! Score Model
//!
//! One leaderboard row per completed run.

use serde::{Deserialize, Serialize};

/// Score row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: i64,
    /// Arcade-style 3-character name
    pub name: String,
    pub ms_to_finish: i64,
    pub photo_id: i64,
    pub created_at: i64,
}
