//! Tag Repository
//!
//! Tags always belong to a photo; every query here is scoped by
//! `photo_id` so one photo's tags can never leak into another's game.

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{RepoError, RepoResult};
use crate::db::models::{BulkTagUpdate, Tag, TagCreate, TagUpdate};
use crate::utils::time::now_millis;

const SELECT: &str = "SELECT id, name, pos_x, pos_y, photo_id, created_at FROM tag";

/// Find all tags of a photo
pub async fn find_for_photo(pool: &SqlitePool, photo_id: i64) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(&format!("{SELECT} WHERE photo_id = ? ORDER BY id"))
        .bind(photo_id)
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

/// Find one tag of a photo
pub async fn find_by_id(pool: &SqlitePool, photo_id: i64, tag_id: i64) -> RepoResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>(&format!("{SELECT} WHERE photo_id = ? AND id = ?"))
        .bind(photo_id)
        .bind(tag_id)
        .fetch_optional(pool)
        .await?;
    Ok(tag)
}

/// Tags of a photo whose position lies inside an axis-aligned box
/// (bounds inclusive)
pub async fn find_in_box(
    pool: &SqlitePool,
    photo_id: i64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(&format!(
        "{SELECT} WHERE photo_id = ? AND pos_x BETWEEN ? AND ? AND pos_y BETWEEN ? AND ? ORDER BY id"
    ))
    .bind(photo_id)
    .bind(x_min)
    .bind(x_max)
    .bind(y_min)
    .bind(y_max)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

/// Number of tags on a photo
pub async fn count_for_photo(pool: &SqlitePool, photo_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag WHERE photo_id = ?")
        .bind(photo_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Create a tag under an existing photo
pub async fn create(pool: &SqlitePool, photo_id: i64, data: TagCreate) -> RepoResult<Tag> {
    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tag (name, pos_x, pos_y, photo_id, created_at) VALUES (?, ?, ?, ?, ?) \
         RETURNING id, name, pos_x, pos_y, photo_id, created_at",
    )
    .bind(&data.name)
    .bind(data.pos_x)
    .bind(data.pos_y)
    .bind(photo_id)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(tag)
}

/// Update one tag; only the supplied fields change.
pub async fn update(
    pool: &SqlitePool,
    photo_id: i64,
    tag_id: i64,
    data: TagUpdate,
) -> RepoResult<Tag> {
    let tag = sqlx::query_as::<_, Tag>(
        "UPDATE tag SET name = COALESCE(?, name), pos_x = COALESCE(?, pos_x), \
         pos_y = COALESCE(?, pos_y) WHERE photo_id = ? AND id = ? \
         RETURNING id, name, pos_x, pos_y, photo_id, created_at",
    )
    .bind(data.name)
    .bind(data.pos_x)
    .bind(data.pos_y)
    .bind(photo_id)
    .bind(tag_id)
    .fetch_optional(pool)
    .await?;
    tag.ok_or_else(|| RepoError::NotFound(format!("Tag {tag_id} not found")))
}

/// Delete one tag. Returns false when the tag did not exist.
pub async fn delete(pool: &SqlitePool, photo_id: i64, tag_id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM tag WHERE photo_id = ? AND id = ?")
        .bind(photo_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Apply a bulk create/update/delete as one transaction.
///
/// Partial failure rolls everything back; the caller either sees the whole
/// unit applied or an error stating it was not. Returns the photo's full
/// tag list after the unit committed.
pub async fn apply_bulk(
    pool: &SqlitePool,
    photo_id: i64,
    bulk: BulkTagUpdate,
) -> RepoResult<Vec<Tag>> {
    let mut tx = pool.begin().await?;

    for item in &bulk.create {
        insert_tx(&mut tx, photo_id, item).await?;
    }

    for item in &bulk.update {
        let updated = sqlx::query(
            "UPDATE tag SET name = COALESCE(?, name), pos_x = COALESCE(?, pos_x), \
             pos_y = COALESCE(?, pos_y) WHERE photo_id = ? AND id = ?",
        )
        .bind(item.fields.name.as_deref())
        .bind(item.fields.pos_x)
        .bind(item.fields.pos_y)
        .bind(photo_id)
        .bind(item.id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Tag {} not found", item.id)));
        }
    }

    for tag_id in &bulk.delete {
        let deleted = sqlx::query("DELETE FROM tag WHERE photo_id = ? AND id = ?")
            .bind(photo_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Tag {tag_id} not found")));
        }
    }

    tx.commit().await?;
    find_for_photo(pool, photo_id).await
}

async fn insert_tx(
    tx: &mut Transaction<'_, Sqlite>,
    photo_id: i64,
    data: &TagCreate,
) -> RepoResult<Tag> {
    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tag (name, pos_x, pos_y, photo_id, created_at) VALUES (?, ?, ?, ?, ?) \
         RETURNING id, name, pos_x, pos_y, photo_id, created_at",
    )
    .bind(&data.name)
    .bind(data.pos_x)
    .bind(data.pos_y)
    .bind(photo_id)
    .bind(now_millis())
    .fetch_one(&mut **tx)
    .await?;
    Ok(tag)
}
