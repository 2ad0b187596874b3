//! Photo Repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{Photo, PhotoWithCount};
use crate::utils::time::now_millis;

/// Find all photos with their tag counts, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PhotoWithCount>> {
    let photos = sqlx::query_as::<_, PhotoWithCount>(
        "SELECT p.id, p.url, p.alt_text, p.created_at, COUNT(t.id) AS tag_count \
         FROM photo p LEFT JOIN tag t ON t.photo_id = p.id \
         GROUP BY p.id ORDER BY p.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(photos)
}

/// Find photo by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Photo>> {
    let photo = sqlx::query_as::<_, Photo>(
        "SELECT id, url, alt_text, created_at FROM photo WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(photo)
}

/// Create a photo row. `url` is the bare stored filename.
pub async fn create(pool: &SqlitePool, url: &str, alt_text: &str) -> RepoResult<Photo> {
    let photo = sqlx::query_as::<_, Photo>(
        "INSERT INTO photo (url, alt_text, created_at) VALUES (?, ?, ?) \
         RETURNING id, url, alt_text, created_at",
    )
    .bind(url)
    .bind(alt_text)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(photo)
}

/// Partial update: only the supplied fields change.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    url: Option<&str>,
    alt_text: Option<&str>,
) -> RepoResult<Photo> {
    let photo = sqlx::query_as::<_, Photo>(
        "UPDATE photo SET url = COALESCE(?, url), alt_text = COALESCE(?, alt_text) \
         WHERE id = ? RETURNING id, url, alt_text, created_at",
    )
    .bind(url)
    .bind(alt_text)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    photo.ok_or_else(|| RepoError::NotFound(format!("Photo {id} not found")))
}

/// Delete a photo and its tags in one transaction.
///
/// Returns the stored filename when a row was deleted, `None` when the id
/// no longer exists (a concurrent delete may have won; callers report
/// not-found rather than crash). The stored file itself is the caller's
/// responsibility and is removed after this commit succeeds.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Option<String>> {
    let mut tx = pool.begin().await?;

    let url: Option<String> = sqlx::query_scalar("SELECT url FROM photo WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(url) = url else {
        return Ok(None);
    };

    // Explicit two-step cascade: child rows first, then the parent row.
    sqlx::query("DELETE FROM tag WHERE photo_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM photo WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(url))
}
