//! Bookmark use-cases.
//!
//! # Invariants
//! - A chapter is either bookmarked or not; no duplicates.
//! - Every toggle persists the full resulting set.

use crate::model::bookmark::{BookmarkSet, ChapterIndex};
use crate::repo::slot_collection::{PersistWarning, SlotCollection};
use crate::slot::{SlotResult, SlotStore};
use log::info;

/// Tracks which chapters are bookmarked.
pub struct BookmarkManager<S: SlotStore> {
    collection: SlotCollection<S, BookmarkSet>,
}

impl<S: SlotStore> BookmarkManager<S> {
    /// Loads bookmarks from `slot_key`; corrupt or missing data starts empty.
    pub fn load(store: S, slot_key: impl Into<String>) -> Self {
        Self {
            collection: SlotCollection::load(store, slot_key),
        }
    }

    /// Flips the bookmark on `chapter` and returns the new state.
    pub fn toggle(&mut self, chapter: ChapterIndex) -> bool {
        let bookmarked = self.collection.mutate(|chapters| {
            if chapters.remove(&chapter) {
                false
            } else {
                chapters.insert(chapter)
            }
        });
        info!(
            "event=bookmark_toggle module=service status=ok chapter={chapter} bookmarked={bookmarked}"
        );
        bookmarked
    }

    pub fn is_bookmarked(&self, chapter: ChapterIndex) -> bool {
        self.collection.items().contains(&chapter)
    }

    /// Bookmarked chapters in ascending order.
    pub fn chapters(&self) -> Vec<ChapterIndex> {
        self.collection.items().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.collection.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.items().is_empty()
    }

    pub fn refresh(&mut self) -> bool {
        self.collection.refresh()
    }

    pub fn reload(&mut self) {
        self.collection.reload();
    }

    pub fn flush(&mut self) -> SlotResult<()> {
        self.collection.flush()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.collection.has_unsaved_changes()
    }

    pub fn take_persist_warning(&mut self) -> Option<PersistWarning> {
        self.collection.take_warning()
    }
}

#[cfg(test)]
mod tests {
    use super::BookmarkManager;
    use crate::slot::{MemorySlotStore, SlotStore};

    #[test]
    fn toggle_parity_matches_toggle_count() {
        let store = MemorySlotStore::new();
        let mut bookmarks = BookmarkManager::load(&store, "bookmarks");
        for count in 1..=7 {
            bookmarks.toggle(2);
            assert_eq!(bookmarks.is_bookmarked(2), count % 2 == 1);
        }
    }

    #[test]
    fn persisted_set_is_sorted_and_deduplicated() {
        let store = MemorySlotStore::new();
        store.seed("bookmarks", "[9,1,9,4]");
        let mut bookmarks = BookmarkManager::load(&store, "bookmarks");
        assert_eq!(bookmarks.chapters(), vec![1, 4, 9]);

        bookmarks.toggle(0);
        assert_eq!(store.read("bookmarks").unwrap().as_deref(), Some("[0,1,4,9]"));
    }

    #[test]
    fn negative_chapter_in_slot_counts_as_corrupt() {
        let store = MemorySlotStore::new();
        store.seed("bookmarks", "[1,-2]");
        let bookmarks = BookmarkManager::load(&store, "bookmarks");
        assert!(bookmarks.is_empty());
    }
}
