//! Highlight use-cases.
//!
//! # Invariants
//! - Highlight ids are unique within the collection.
//! - `for_chapter` keeps insertion order and returns an owned snapshot.
//! - `remove` of an unknown id is a no-op but still persists.

use crate::clock::Clock;
use crate::model::bookmark::ChapterIndex;
use crate::model::highlight::{Highlight, DEFAULT_HIGHLIGHT_COLOR};
use crate::model::record_id::RecordId;
use crate::repo::slot_collection::{PersistWarning, SlotCollection};
use crate::slot::{SlotResult, SlotStore};
use log::info;
use std::rc::Rc;

/// Manages highlighted text spans for all chapters.
pub struct HighlightManager<S: SlotStore> {
    collection: SlotCollection<S, Vec<Highlight>>,
    clock: Rc<dyn Clock>,
    default_color: String,
}

impl<S: SlotStore> HighlightManager<S> {
    /// Loads highlights from `slot_key` using the stock default color.
    pub fn load(store: S, slot_key: impl Into<String>, clock: Rc<dyn Clock>) -> Self {
        Self::load_with_default_color(store, slot_key, clock, DEFAULT_HIGHLIGHT_COLOR)
    }

    pub fn load_with_default_color(
        store: S,
        slot_key: impl Into<String>,
        clock: Rc<dyn Clock>,
        default_color: impl Into<String>,
    ) -> Self {
        Self {
            collection: SlotCollection::load(store, slot_key),
            clock,
            default_color: default_color.into(),
        }
    }

    /// Highlights `text` in `chapter` with the default color.
    pub fn add(&mut self, chapter: ChapterIndex, text: impl Into<String>) -> Highlight {
        let color = self.default_color.clone();
        self.add_with_color(chapter, text, color)
    }

    pub fn add_with_color(
        &mut self,
        chapter: ChapterIndex,
        text: impl Into<String>,
        color: impl Into<String>,
    ) -> Highlight {
        let now_ms = self.clock.now_ms();
        let text = text.into();
        let color = color.into();
        let highlight = self.collection.mutate(|highlights| {
            let id =
                RecordId::generate_unique(highlights.as_slice(), |record| &record.id, now_ms);
            let highlight = Highlight::new(id, chapter, text, color, now_ms);
            highlights.push(highlight.clone());
            highlight
        });
        info!(
            "event=highlight_add module=service status=ok chapter={chapter} id={} text_chars={}",
            highlight.id,
            highlight.text.chars().count()
        );
        highlight
    }

    /// Removes the highlight with `id`; returns whether one was found.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let removed = self.collection.mutate(|highlights| {
            let before = highlights.len();
            highlights.retain(|highlight| &highlight.id != id);
            highlights.len() != before
        });
        info!("event=highlight_remove module=service status=ok id={id} found={removed}");
        removed
    }

    pub fn for_chapter(&self, chapter: ChapterIndex) -> Vec<Highlight> {
        self.collection
            .items()
            .iter()
            .filter(|highlight| highlight.chapter_index == chapter)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<Highlight> {
        self.collection
            .items()
            .iter()
            .find(|highlight| &highlight.id == id)
            .cloned()
    }

    /// All highlights in insertion order.
    pub fn all(&self) -> Vec<Highlight> {
        self.collection.items().clone()
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
