//! Proximity Matcher
//!
//! Decides whether a player's click corresponds to a stored tag. A tag at
//! `(qx, qy)` matches a click at `(px, py)` iff `|qx-px| <= t` and
//! `|qy-py| <= t`: an axis-aligned box, not a Euclidean radius, so
//! diagonal near-misses at the corners still count as hits.

use sqlx::SqlitePool;

use crate::db::models::Tag;
use crate::db::repository::{RepoResult, tag};

/// Per-axis match tolerance, as a fraction of the image dimension
pub const TOLERANCE: f64 = 0.1;

/// A click in fractional image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPos {
    pub x: f64,
    pub y: f64,
}

/// Inclusive box predicate
pub fn is_hit(tag: &Tag, click: ClickPos, tolerance: f64) -> bool {
    (tag.pos_x - click.x).abs() <= tolerance && (tag.pos_y - click.y).abs() <= tolerance
}

/// All tags of a photo within [`TOLERANCE`] of the click.
///
/// Pure query; no found-state is mutated here.
pub async fn find_matches(
    pool: &SqlitePool,
    photo_id: i64,
    click: ClickPos,
) -> RepoResult<Vec<Tag>> {
    tag::find_in_box(
        pool,
        photo_id,
        click.x - TOLERANCE,
        click.x + TOLERANCE,
        click.y - TOLERANCE,
        click.y + TOLERANCE,
    )
    .await
}
