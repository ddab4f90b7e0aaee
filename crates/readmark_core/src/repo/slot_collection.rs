//! Generic slot-backed collection used by the annotation managers.

use crate::slot::{SlotResult, SlotStore};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Non-blocking notice that the latest in-memory state was not saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistWarning {
    /// Slot that could not be written.
    pub slot_key: String,
    /// Human-readable backend failure.
    pub message: String,
}

impl Display for PersistWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "changes to `{}` are not saved yet: {}",
            self.slot_key, self.message
        )
    }
}

/// In-memory collection `C` kept in sync with the slot at `key`.
pub struct SlotCollection<S: SlotStore, C> {
    store: S,
    key: String,
    items: C,
    /// Revision observed on the last successful read or write.
    seen_revision: u64,
    dirty: bool,
    warning: Option<PersistWarning>,
}

impl<S, C> SlotCollection<S, C>
where
    S: SlotStore,
    C: Serialize + DeserializeOwned + Default,
{
    /// Loads the collection stored at `key`.
    ///
    /// Missing, unreadable or unparsable slots start empty; failures are
    /// logged only.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let mut collection = Self {
            store,
            key: key.into(),
            items: C::default(),
            seen_revision: 0,
            dirty: false,
            warning: None,
        };
        collection.reload();
        collection
    }

    pub fn items(&self) -> &C {
        &self.items
    }

    /// Re-reads the slot unconditionally, dropping unsaved state.
    pub fn reload(&mut self) {
        let revision = match self.store.revision(self.key.as_str()) {
            Ok(revision) => revision,
            Err(err) => {
                error!(
                    "event=slot_load module=repo status=error key={} error_code=revision_failed error={err}",
                    self.key
                );
                0
            }
        };
        self.items = self.read_items();
        self.seen_revision = revision;
        self.dirty = false;
    }

    /// Reloads when another writer changed the slot since our last access.
    ///
    /// Dirty collections never reload: unsaved in-memory state wins for the
    /// rest of the session. Returns whether a reload happened.
    pub fn refresh(&mut self) -> bool {
        let revision = match self.store.revision(self.key.as_str()) {
            Ok(revision) => revision,
            Err(err) => {
                warn!(
                    "event=slot_refresh module=repo status=error key={} error_code=revision_failed error={err}",
                    self.key
                );
                return false;
            }
        };
        if revision == self.seen_revision {
            return false;
        }
        if self.dirty {
            warn!(
                "event=slot_refresh module=repo status=skipped key={} reason=unsaved_changes seen_revision={} store_revision={revision}",
                self.key, self.seen_revision
            );
            return false;
        }

        info!(
            "event=slot_refresh module=repo status=reload key={} seen_revision={} store_revision={revision}",
            self.key, self.seen_revision
        );
        self.items = self.read_items();
        self.seen_revision = revision;
        true
    }

    /// Applies `mutate` to the collection and persists the result.
    ///
    /// Picks up foreign writes first so the mutation applies to the newest
    /// persisted state.
    pub fn mutate<R>(&mut self, mutate: impl FnOnce(&mut C) -> R) -> R {
        self.refresh();
        let result = mutate(&mut self.items);
        if let Err(err) = self.persist() {
            warn!(
                "event=slot_write module=repo status=error key={} error_code=write_failed error={err}",
                self.key
            );
            self.dirty = true;
            self.warning = Some(PersistWarning {
                slot_key: self.key.clone(),
                message: err.to_string(),
            });
        }
        result
    }

    /// Retries the write of unsaved in-memory state.
    ///
    /// Writes unsaved state. A clean collection leaves the slot untouched.
    /// Unlike mutations, the failure is returned to the caller.
    pub fn flush(&mut self) -> SlotResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn take_warning(&mut self) -> Option<PersistWarning> {
        self.warning.take()
    }

    fn persist(&mut self) -> SlotResult<()> {
        let payload = serde_json::to_string(&self.items)?;
        let revision = self.store.write(self.key.as_str(), payload.as_str())?;
        debug!(
            "event=slot_write module=repo status=ok key={} bytes={} revision={revision}",
            self.key,
            payload.len()
        );
        self.seen_revision = revision;
        self.dirty = false;
        self.warning = None;
        Ok(())
    }

    fn read_items(&self) -> C {
        let raw = match self.store.read(self.key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(
                    "event=slot_load module=repo status=empty key={}",
                    self.key
                );
                return C::default();
            }
            Err(err) => {
                error!(
                    "event=slot_load module=repo status=error key={} error_code=read_failed error={err}",
                    self.key
                );
                return C::default();
            }
        };

        match serde_json::from_str::<C>(raw.as_str()) {
            Ok(items) => {
                debug!(
                    "event=slot_load module=repo status=ok key={} bytes={}",
                    self.key,
                    raw.len()
                );
                items
            }
            Err(err) => {
                // Error text may quote stored user text; log position only.
                warn!(
                    "event=slot_load module=repo status=error key={} bytes={} error_code=parse_failed category={:?} line={} column={}",
                    self.key,
                    raw.len(),
                    err.classify(),
                    err.line(),
                    err.column()
                );
                C::default()
            }
        }
    }
}
