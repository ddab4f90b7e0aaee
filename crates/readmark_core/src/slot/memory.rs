//! In-memory slot backend.
//!
//! Mirrors browser local storage: values live for the lifetime of the
//! process and an optional byte quota makes writes fail the way a full
//! origin storage does.

use super::{ensure_valid_key, SlotError, SlotResult, SlotStore};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct MemorySlot {
    value: Option<String>,
    revision: u64,
}

/// `RefCell`-backed slot store for single-threaded hosts and tests.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<HashMap<String, MemorySlot>>,
    quota_bytes: Option<usize>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once the total size of keys and
    /// values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Writes a raw value, bypassing the quota.
    ///
    /// Lets hosts seed a slot (e.g. data written by an older client) before
    /// any manager loads it.
    pub fn seed(&self, key: &str, value: &str) {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.entry(key.to_string()).or_default();
        slot.value = Some(value.to_string());
        slot.revision += 1;
    }

    /// Total bytes currently held, counting keys of non-empty slots.
    pub fn used_bytes(&self) -> usize {
        used_bytes_excluding(&self.slots.borrow(), None)
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        ensure_valid_key(key)?;
        Ok(self
            .slots
            .borrow()
            .get(key)
            .and_then(|slot| slot.value.clone()))
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<u64> {
        ensure_valid_key(key)?;
        let mut slots = self.slots.borrow_mut();

        if let Some(quota) = self.quota_bytes {
            let required_bytes = key.len() + value.len();
            let available_bytes = quota.saturating_sub(used_bytes_excluding(&slots, Some(key)));
            if required_bytes > available_bytes {
                return Err(SlotError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    available_bytes,
                });
            }
        }

        let slot = slots.entry(key.to_string()).or_default();
        slot.value = Some(value.to_string());
        slot.revision += 1;
        Ok(slot.revision)
    }

    fn remove(&self, key: &str) -> SlotResult<u64> {
        ensure_valid_key(key)?;
        let mut slots = self.slots.borrow_mut();
        let slot = slots.entry(key.to_string()).or_default();
        slot.value = None;
        slot.revision += 1;
        Ok(slot.revision)
    }

    fn revision(&self, key: &str) -> SlotResult<u64> {
        ensure_valid_key(key)?;
        Ok(self
            .slots
            .borrow()
            .get(key)
            .map_or(0, |slot| slot.revision))
    }
}

fn used_bytes_excluding(slots: &HashMap<String, MemorySlot>, skip: Option<&str>) -> usize {
    slots
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != skip)
        .filter_map(|(key, slot)| slot.value.as_ref().map(|value| key.len() + value.len()))
        .sum()
}
