//! Persisted key-value slots backing the annotation collections.
//!
//! # Responsibility
//! - Define the host persistence capability (`SlotStore`) that managers
//!   depend on.
//! - Provide the in-memory and SQLite backends.
//!
//! # Invariants
//! - A slot holds one opaque string value or nothing.
//! - Every write or remove bumps the slot revision; revisions never decrease.
//! - Writes replace the whole value; there are no partial writes.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

mod memory;
mod sqlite;

pub use memory::MemorySlotStore;
pub use sqlite::SqliteSlotStore;

pub type SlotResult<T> = Result<T, SlotError>;

/// Slot backend failure.
#[derive(Debug)]
pub enum SlotError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Writing would exceed the backend storage budget.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        available_bytes: usize,
    },
    InvalidKey(String),
    /// The collection could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::QuotaExceeded {
                key,
                required_bytes,
                available_bytes,
            } => write!(
                f,
                "slot `{key}` needs {required_bytes} bytes but only {available_bytes} are available"
            ),
            Self::InvalidKey(key) => write!(f, "invalid slot key: `{key}`"),
            Self::Encode(err) => write!(f, "failed to encode slot value: {err}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::QuotaExceeded { .. } => None,
            Self::InvalidKey(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for SlotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Synchronous string storage addressed by fixed keys.
///
/// Implementations are used from a single thread; methods take `&self` so
/// one backend can be shared by several managers.
pub trait SlotStore {
    /// Returns the stored value, or `None` when the slot is empty.
    fn read(&self, key: &str) -> SlotResult<Option<String>>;
    /// Replaces the slot value and returns the new revision.
    fn write(&self, key: &str, value: &str) -> SlotResult<u64>;
    /// Empties the slot and returns the new revision.
    fn remove(&self, key: &str) -> SlotResult<u64>;
    /// Current revision of the slot; `0` when it was never written.
    fn revision(&self, key: &str) -> SlotResult<u64>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<u64> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> SlotResult<u64> {
        (**self).remove(key)
    }

    fn revision(&self, key: &str) -> SlotResult<u64> {
        (**self).revision(key)
    }
}

impl<S: SlotStore + ?Sized> SlotStore for Rc<S> {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<u64> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> SlotResult<u64> {
        (**self).remove(key)
    }

    fn revision(&self, key: &str) -> SlotResult<u64> {
        (**self).revision(key)
    }
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<u64> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> SlotResult<u64> {
        (**self).remove(key)
    }

    fn revision(&self, key: &str) -> SlotResult<u64> {
        (**self).revision(key)
    }
}

pub(crate) fn ensure_valid_key(key: &str) -> SlotResult<()> {
    if key.trim().is_empty() {
        return Err(SlotError::InvalidKey(key.to_string()));
    }
    Ok(())
}
