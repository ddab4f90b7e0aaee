//! Annotation domain model for the reader.
//!
//! # Responsibility
//! - Define the records persisted per annotation kind.
//! - Keep the JSON wire shape (camelCase) next to the types that own it.
//!
//! # Invariants
//! - Highlight/note ids are unique within their collection.
//! - Chapter filtering is an in-memory projection; storage is not partitioned.

pub mod bookmark;
pub mod highlight;
pub mod note;
pub mod record_id;
