//! Score API Handlers
//!
//! The finish time never comes from the client. A submission only carries
//! the 3-character name; the time is read from the session's finished run,
//! which the server froze when the last tag was found.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{Query, State},
};
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::api::photos::handler::PHOTO_NOT_FOUND;
use crate::core::ServerState;
use crate::db::repository::{photo, score};
use crate::game::PlayState;
use crate::utils::validation::{self, FieldRule, SCORE_NAME_LEN};
use crate::utils::{ApiResponse, AppError, AppResult, FieldError, success};

const SUBMIT_RULES: &[FieldRule] = &[FieldRule::alphanumeric("name", SCORE_NAME_LEN, SCORE_NAME_LEN)];
const QUERY_RULES: &[FieldRule] = &[FieldRule::integer("photoId").optional()];

/// POST /api/v1/time - 提交成绩
pub async fn submit_time(
    State(state): State<ServerState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let v = validation::check(SUBMIT_RULES, &form)?;
    let name = v.require_text("name")?;

    let play = PlayState::load(&session).await?;
    let Some(play) = play.filter(|p| p.ms_to_finish.is_some()) else {
        return Err(AppError::validation(vec![
            FieldError::new(
                "msToFinish",
                "No finished run in this session",
                Value::Null,
            )
            .with_location("session"),
        ]));
    };
    let Some(ms_to_finish) = play.ms_to_finish else {
        return Err(AppError::internal("Finished run lost its time"));
    };

    // The photo may have been deleted since the run finished; a stale run
    // can never land on the board, so drop it rather than hit the FK.
    if photo::find_by_id(&state.pool, play.photo_id).await?.is_none() {
        PlayState::clear(&session).await?;
        return Err(AppError::not_found(PHOTO_NOT_FOUND));
    }

    let recorded = score::create(&state.pool, name, ms_to_finish, play.photo_id).await?;

    // The run is spent once it is on the board
    PlayState::clear(&session).await?;

    tracing::info!(name = %recorded.name, ms_to_finish, "Score recorded");
    Ok(success(json!({
        "message": "Score recorded.",
        "score": recorded,
    })))
}

/// GET /api/v1/time - 最快成绩排行 (可按照片过滤)
pub async fn best_times(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let v = match validation::check(QUERY_RULES, &query) {
        Ok(v) => v,
        Err(AppError::Validation(errors)) => {
            return Err(AppError::validation(
                errors.into_iter().map(|e| e.with_location("query")).collect(),
            ));
        }
        Err(other) => return Err(other),
    };

    let scores = score::best_times(&state.pool, v.int("photoId")).await?;
    Ok(success(json!({
        "message": "Best times retrieved.",
        "scores": scores,
    })))
}
