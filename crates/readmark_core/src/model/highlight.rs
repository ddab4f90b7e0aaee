//! Highlight model.
//!
//! # Invariants
//! - `id` is unique within the highlight collection.
//! - `color` is a free-form tag; the UI decides how to render it.

use crate::model::bookmark::ChapterIndex;
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};

/// Color applied when the caller does not pick one.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "yellow";

/// One highlighted text span inside a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: RecordId,
    pub chapter_index: ChapterIndex,
    /// Selected text as captured by the reader.
    pub text: String,
    pub color: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Highlight {
    pub fn new(
        id: RecordId,
        chapter_index: ChapterIndex,
        text: impl Into<String>,
        color: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            chapter_index,
            text: text.into(),
            color: color.into(),
            created_at,
        }
    }

    pub fn is_default_color(&self) -> bool {
        self.color == DEFAULT_HIGHLIGHT_COLOR
    }
}
