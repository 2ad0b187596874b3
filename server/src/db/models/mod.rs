//! Database Models
//!
//! Row types and create/update DTOs for the three tables:
//! photo, tag, score.

pub mod photo;
pub mod score;
pub mod tag;

pub use photo::{Photo, PhotoView, PhotoWithCount};
pub use score::Score;
pub use tag::{BulkTagUpdate, Tag, TagCreate, TagUpdate, TagUpdateItem};
