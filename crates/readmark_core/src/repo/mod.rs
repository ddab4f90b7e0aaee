//! Typed collections mirrored into persisted slots.
//!
//! # Responsibility
//! - Load a collection from one slot and write it back after every mutation.
//! - Own the failure policy shared by every annotation manager.
//!
//! # Invariants
//! - The persisted value is always a full serialization of the in-memory
//!   collection.
//! - Load/parse failures degrade to an empty collection and never surface.
//! - A failed write leaves memory authoritative and records a warning.

pub mod slot_collection;
