//! Note use-cases.
//!
//! # Invariants
//! - `update` touches `content` and `updated_at` of the target note only.
//! - `updated_at >= created_at` after every mutation.
//! - Unknown ids are no-ops for `update` and `remove`.

use crate::clock::Clock;
use crate::model::bookmark::ChapterIndex;
use crate::model::note::Note;
use crate::model::record_id::RecordId;
use crate::repo::slot_collection::{PersistWarning, SlotCollection};
use crate::slot::{SlotResult, SlotStore};
use log::{debug, info};
use std::rc::Rc;

/// Manages free-text notes for all chapters.
pub struct NoteManager<S: SlotStore> {
    collection: SlotCollection<S, Vec<Note>>,
    clock: Rc<dyn Clock>,
}

impl<S: SlotStore> NoteManager<S> {
    pub fn load(store: S, slot_key: impl Into<String>, clock: Rc<dyn Clock>) -> Self {
        Self {
            collection: SlotCollection::load(store, slot_key),
            clock,
        }
    }

    /// Creates a note in `chapter` and returns it.
    pub fn add(&mut self, chapter: ChapterIndex, content: impl Into<String>) -> Note {
        let now_ms = self.clock.now_ms();
        let content = content.into();
        let note = self.collection.mutate(|notes| {
            let id = RecordId::generate_unique(notes.as_slice(), |record| &record.id, now_ms);
            let note = Note::new(id, chapter, content, now_ms);
            notes.push(note.clone());
            note
        });
        info!(
            "event=note_add module=service status=ok chapter={chapter} id={} content_chars={}",
            note.id,
            note.content.chars().count()
        );
        note
    }

    /// Replaces the content of note `id` and returns the updated note.
    ///
    /// Returns `None` without writing when no note has that id.
    pub fn update(&mut self, id: &RecordId, content: impl Into<String>) -> Option<Note> {
        self.collection.refresh();
        if !self.collection.items().iter().any(|note| &note.id == id) {
            debug!("event=note_update module=service status=skipped id={id} reason=not_found");
            return None;
        }

        let now_ms = self.clock.now_ms();
        let content = content.into();
        let updated = self.collection.mutate(|notes| {
            notes.iter_mut().find(|note| &note.id == id).map(|note| {
                note.edit(content, now_ms);
                note.clone()
            })
        });
        if let Some(note) = updated.as_ref() {
            info!(
                "event=note_update module=service status=ok id={id} content_chars={}",
                note.content.chars().count()
            );
        }
        updated
    }

    /// Removes note `id`; returns whether one was found.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let removed = self.collection.mutate(|notes| {
            let before = notes.len();
            notes.retain(|note| &note.id != id);
            notes.len() != before
        });
        info!("event=note_remove module=service status=ok id={id} found={removed}");
        removed
    }

    pub fn for_chapter(&self, chapter: ChapterIndex) -> Vec<Note> {
        self.collection
            .items()
            .iter()
            .filter(|note| note.chapter_index == chapter)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<Note> {
        self.collection
            .items()
            .iter()
            .find(|note| &note.id == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Note> {
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
