//! Note model.
//!
//! # Invariants
//! - `updated_at >= created_at` for every note.
//! - `updated_at` never moves backwards, even when the host clock does.

use crate::model::bookmark::ChapterIndex;
use crate::model::record_id::RecordId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Free-text annotation attached to a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub chapter_index: ChapterIndex,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every content edit.
    pub updated_at: i64,
}

impl Note {
    /// Creates a note whose both timestamps are `now_ms`.
    pub fn new(
        id: RecordId,
        chapter_index: ChapterIndex,
        content: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id,
            chapter_index,
            content: content.into(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Replaces the content and refreshes `updated_at`.
    pub fn edit(&mut self, content: impl Into<String>, now_ms: i64) {
        self.content = content.into();
        self.updated_at = now_ms.max(self.updated_at).max(self.created_at);
    }

    /// Single-line preview of the content, capped at `max_chars` characters.
    ///
    /// Returns `None` for blank notes.
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        let collapsed = WHITESPACE_RE.replace_all(self.content.as_str(), " ");
        let trimmed = collapsed.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut preview: String = trimmed.chars().take(max_chars).collect();
        if trimmed.chars().count() > max_chars {
            preview.push_str("...");
        }
        Some(preview)
    }
}
