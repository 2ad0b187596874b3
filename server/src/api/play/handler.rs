//! Play API Handler
//!
//! One endpoint drives the whole game loop. Without a `tagId` the click is
//! a probe: the response lists the tags near the click for the player to
//! pick from, and the session's timer starts on the first probe. With a
//! `tagId` the click is a claim: it is a hit only when the named tag sits
//! within the proximity box of the click.

use std::collections::HashMap;

use axum::{Form, Json, extract::State};
use serde_json::json;
use tower_sessions::Session;

use crate::api::admin_tags::TAG_NOT_FOUND;
use crate::api::photos::handler::PHOTO_NOT_FOUND;
use crate::core::ServerState;
use crate::db::repository::tag;
use crate::game::{ClickPos, PlayState, TOLERANCE, matcher};
use crate::utils::validation::{self, FieldRule};
use crate::utils::{ApiResponse, AppError, AppResult, success};

const CHECK_RULES: &[FieldRule] = &[
    FieldRule::integer("photoId"),
    FieldRule::integer("tagId").optional(),
    FieldRule::float("posX", 0.0, 1.0),
    FieldRule::float("posY", 0.0, 1.0),
];

/// POST /api/v1/check-tag - 判定一次点击
pub async fn check_tag(
    State(state): State<ServerState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let v = validation::check(CHECK_RULES, &form)?;
    let photo_id = v.require_int("photoId")?;
    let click = ClickPos {
        x: v.require_float("posX")?,
        y: v.require_float("posY")?,
    };

    crate::db::repository::photo::find_by_id(&state.pool, photo_id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;

    // Loading starts the timer on the very first click of a run
    let mut play = PlayState::load_or_start(&session, photo_id).await?;

    let Some(tag_id) = v.int("tagId") else {
        // Probe: list nearby tags, mutate nothing but the timer
        let candidates = matcher::find_matches(&state.pool, photo_id, click).await?;
        play.save(&session).await?;
        return Ok(success(json!({
            "message": "Tags near the click.",
            "tags": candidates,
        })));
    };

    // Claim: the named tag must exist on this photo and sit near the click
    let target = tag::find_by_id(&state.pool, photo_id, tag_id)
        .await?
        .ok_or_else(|| AppError::not_found(TAG_NOT_FOUND))?;

    let hit = matcher::is_hit(&target, click, TOLERANCE);
    let mut found_all = false;
    if hit {
        play.record_found(target.id);
        let total = tag::count_for_photo(&state.pool, photo_id).await?;
        found_all = play.finish_if_done(total);
    }
    play.save(&session).await?;

    let message = if found_all {
        format!("You found everyone! {} was the last one.", target.name)
    } else if hit {
        format!("You found {}!", target.name)
    } else {
        format!("That is not where {} is.", target.name)
    };

    Ok(success(json!({
        "message": message,
        "hit": hit,
        "foundTags": play.found_tag_ids,
        "foundAllTags": found_all,
        "msToFinish": play.ms_to_finish,
    })))
}
