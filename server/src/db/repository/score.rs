//! Score Repository

use sqlx::SqlitePool;

use super::RepoResult;
use crate::db::models::Score;
use crate::utils::time::now_millis;

/// Leaderboard length per query
pub const LEADERBOARD_LIMIT: i64 = 10;

/// Record a completed run
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    ms_to_finish: i64,
    photo_id: i64,
) -> RepoResult<Score> {
    let score = sqlx::query_as::<_, Score>(
        "INSERT INTO score (name, ms_to_finish, photo_id, created_at) VALUES (?, ?, ?, ?) \
         RETURNING id, name, ms_to_finish, photo_id, created_at",
    )
    .bind(name)
    .bind(ms_to_finish)
    .bind(photo_id)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(score)
}

/// Best (fastest) times, optionally scoped to one photo
pub async fn best_times(pool: &SqlitePool, photo_id: Option<i64>) -> RepoResult<Vec<Score>> {
    let scores = match photo_id {
        Some(id) => {
            sqlx::query_as::<_, Score>(
                "SELECT id, name, ms_to_finish, photo_id, created_at FROM score \
                 WHERE photo_id = ? ORDER BY ms_to_finish ASC LIMIT ?",
            )
            .bind(id)
            .bind(LEADERBOARD_LIMIT)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Score>(
                "SELECT id, name, ms_to_finish, photo_id, created_at FROM score \
                 ORDER BY ms_to_finish ASC LIMIT ?",
            )
            .bind(LEADERBOARD_LIMIT)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(scores)
}
