//! Core annotation logic for the readmark reader.
//! Bookmarks, highlights and notes kept in memory and mirrored into
//! persisted slots.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AnnotationConfig, ConfigError, LogLevel, LoggingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::bookmark::{BookmarkSet, ChapterIndex};
pub use model::highlight::{Highlight, DEFAULT_HIGHLIGHT_COLOR};
pub use model::note::Note;
pub use model::record_id::RecordId;
pub use repo::slot_collection::PersistWarning;
pub use service::annotation_store::{AnnotationKind, AnnotationStore};
pub use service::bookmark_manager::BookmarkManager;
pub use service::highlight_manager::HighlightManager;
pub use service::note_manager::NoteManager;
pub use slot::{MemorySlotStore, SlotError, SlotResult, SlotStore, SqliteSlotStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
