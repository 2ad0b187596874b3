//! Play-session state
//!
//! One run per browser session: the timer starts on the first click-check
//! for a photo, found tag ids accumulate as the player identifies people,
//! and the finish time freezes once every tag is found. Held in the
//! cookie-backed session record, never in process globals, so concurrent
//! sessions cannot interfere.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::utils::AppResult;
use crate::utils::time::now_millis;

const PLAY_STATE_KEY: &str = "play_state";

/// State of one run against one photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayState {
    pub photo_id: i64,
    pub started_at_ms: i64,
    pub found_tag_ids: Vec<i64>,
    /// Set exactly once, when the last tag is found
    pub ms_to_finish: Option<i64>,
}

impl PlayState {
    pub fn start(photo_id: i64) -> Self {
        Self {
            photo_id,
            started_at_ms: now_millis(),
            found_tag_ids: Vec::new(),
            ms_to_finish: None,
        }
    }

    /// Record a verified find. Returns false when the tag was already found.
    pub fn record_found(&mut self, tag_id: i64) -> bool {
        if self.found_tag_ids.contains(&tag_id) {
            return false;
        }
        self.found_tag_ids.push(tag_id);
        true
    }

    /// Freeze the finish time once all of the photo's tags are found.
    /// Returns true when this run is complete.
    pub fn finish_if_done(&mut self, total_tags: i64) -> bool {
        if total_tags > 0 && self.found_tag_ids.len() as i64 == total_tags {
            if self.ms_to_finish.is_none() {
                self.ms_to_finish = Some(now_millis() - self.started_at_ms);
            }
            return true;
        }
        false
    }

    /// Load the session's run for a photo, starting a fresh one when the
    /// session has none or was playing a different photo.
    pub async fn load_or_start(session: &Session, photo_id: i64) -> AppResult<Self> {
        let existing: Option<PlayState> = session.get(PLAY_STATE_KEY).await?;
        match existing {
            Some(state) if state.photo_id == photo_id => Ok(state),
            _ => Ok(Self::start(photo_id)),
        }
    }

    /// Load the session's run, if any
    pub async fn load(session: &Session) -> AppResult<Option<Self>> {
        Ok(session.get(PLAY_STATE_KEY).await?)
    }

    pub async fn save(&self, session: &Session) -> AppResult<()> {
        session.insert(PLAY_STATE_KEY, self).await?;
        Ok(())
    }

    pub async fn clear(session: &Session) -> AppResult<()> {
        session.remove::<PlayState>(PLAY_STATE_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn duplicate_finds_are_ignored() {
        let mut state = PlayState::start(1);
        assert!(state.record_found(10));
        assert!(!state.record_found(10));
        assert_eq!(state.found_tag_ids, vec![10]);
    }

    #[test]
    fn finish_freezes_once() {
        let mut state = PlayState::start(1);
        state.record_found(10);
        state.record_found(11);
        assert!(state.finish_if_done(2));
        let first = state.ms_to_finish.unwrap();
        assert!(state.finish_if_done(2));
        assert_eq!(state.ms_to_finish.unwrap(), first);
    }

    #[test]
    fn empty_photo_never_finishes() {
        let mut state = PlayState::start(1);
        assert!(!state.finish_if_done(0));
        assert!(state.ms_to_finish.is_none());
    }

    #[tokio::test]
    async fn switching_photos_restarts_the_run() {
        let session = session();
        let mut state = PlayState::load_or_start(&session, 1).await.unwrap();
        state.record_found(10);
        state.save(&session).await.unwrap();

        let resumed = PlayState::load_or_start(&session, 1).await.unwrap();
        assert_eq!(resumed.found_tag_ids, vec![10]);

        let fresh = PlayState::load_or_start(&session, 2).await.unwrap();
        assert!(fresh.found_tag_ids.is_empty());
    }
}
