//! Gameplay
//!
//! - [`matcher`] - click-to-tag proximity matching
//! - [`play`] - per-session run state (timer + found set)

pub mod matcher;
pub mod play;

pub use matcher::{ClickPos, TOLERANCE};
pub use play::PlayState;
