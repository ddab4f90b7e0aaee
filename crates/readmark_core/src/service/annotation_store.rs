//! Store facade: the single construction point for the annotation managers.
//!
//! # Responsibility
//! - Validate config and wire all three managers to one slot backend and
//!   one clock.
//! - Aggregate unsaved-state reporting for the UI.
//!
//! # Invariants
//! - Each annotation kind owns exactly one slot key.
//! - One facade per UI session; other instances over the same backend see
//!   its writes on `refresh_all`.

use crate::clock::{Clock, SystemClock};
use crate::config::{AnnotationConfig, ConfigError};
use crate::repo::slot_collection::PersistWarning;
use crate::service::bookmark_manager::BookmarkManager;
use crate::service::highlight_manager::HighlightManager;
use crate::service::note_manager::NoteManager;
use crate::slot::SlotStore;
use log::info;
use std::rc::Rc;

/// Annotation kind, one per persisted slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Bookmarks,
    Highlights,
    Notes,
}

/// Owner of the bookmark, highlight and note managers.
pub struct AnnotationStore<S: SlotStore> {
    bookmarks: BookmarkManager<Rc<S>>,
    highlights: HighlightManager<Rc<S>>,
    notes: NoteManager<Rc<S>>,
}

impl<S: SlotStore> AnnotationStore<S> {
    /// Builds the managers over `store` and loads every slot.
    ///
    /// # Errors
    /// - Returns `ConfigError` when `config` fails validation.
    pub fn new(
        store: S,
        config: AnnotationConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Self::from_shared(Rc::new(store), config, clock)
    }

    /// Builds the managers with default config and the system clock.
    pub fn with_defaults(store: S) -> Self {
        let store = Rc::new(store);
        let config = AnnotationConfig::default();
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        Self::build(store, &config, clock)
    }

    /// Builds the managers over a backend that other owners also hold.
    pub fn from_shared(
        store: Rc<S>,
        config: AnnotationConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(store, &config, clock))
    }

    fn build(store: Rc<S>, config: &AnnotationConfig, clock: Rc<dyn Clock>) -> Self {
        let annotations = Self {
            bookmarks: BookmarkManager::load(Rc::clone(&store), config.bookmarks_key.as_str()),
            highlights: HighlightManager::load_with_default_color(
                Rc::clone(&store),
                config.highlights_key.as_str(),
                Rc::clone(&clock),
                config.default_highlight_color.as_str(),
            ),
            notes: NoteManager::load(store, config.notes_key.as_str(), clock),
        };
        info!(
            "event=annotation_store_init module=service status=ok bookmarks_key={} highlights_key={} notes_key={} bookmarks={} highlights={} notes={}",
            config.bookmarks_key,
            config.highlights_key,
            config.notes_key,
            annotations.bookmarks.len(),
            annotations.highlights.len(),
            annotations.notes.len()
        );
        annotations
    }

    pub fn bookmarks(&self) -> &BookmarkManager<Rc<S>> {
        &self.bookmarks
    }

    pub fn bookmarks_mut(&mut self) -> &mut BookmarkManager<Rc<S>> {
        &mut self.bookmarks
    }

    pub fn highlights(&self) -> &HighlightManager<Rc<S>> {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut HighlightManager<Rc<S>> {
        &mut self.highlights
    }

    pub fn notes(&self) -> &NoteManager<Rc<S>> {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteManager<Rc<S>> {
        &mut self.notes
    }

    /// Picks up foreign writes for every kind; returns the kinds reloaded.
    pub fn refresh_all(&mut self) -> Vec<AnnotationKind> {
        let mut reloaded = Vec::new();
        if self.bookmarks.refresh() {
            reloaded.push(AnnotationKind::Bookmarks);
        }
        if self.highlights.refresh() {
            reloaded.push(AnnotationKind::Highlights);
        }
        if self.notes.refresh() {
            reloaded.push(AnnotationKind::Notes);
        }
        reloaded
    }

    /// Kinds whose latest in-memory state is not persisted.
    pub fn unsaved_kinds(&self) -> Vec<AnnotationKind> {
        let mut unsaved = Vec::new();
        if self.bookmarks.has_unsaved_changes() {
            unsaved.push(AnnotationKind::Bookmarks);
        }
        if self.highlights.has_unsaved_changes() {
            unsaved.push(AnnotationKind::Highlights);
        }
        if self.notes.has_unsaved_changes() {
            unsaved.push(AnnotationKind::Notes);
        }
        unsaved
    }

    /// Drains pending write warnings from all managers.
    pub fn take_persist_warnings(&mut self) -> Vec<(AnnotationKind, PersistWarning)> {
        [
            (AnnotationKind::Bookmarks, self.bookmarks.take_persist_warning()),
            (AnnotationKind::Highlights, self.highlights.take_persist_warning()),
            (AnnotationKind::Notes, self.notes.take_persist_warning()),
        ]
        .into_iter()
        .filter_map(|(kind, warning)| warning.map(|warning| (kind, warning)))
        .collect()
    }
}
