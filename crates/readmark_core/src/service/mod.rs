//! Annotation managers and the store facade.
//!
//! # Responsibility
//! - Expose chapter-scoped create/read/update/delete per annotation kind.
//! - Keep the reader UI decoupled from slot backends.

pub mod annotation_store;
pub mod bookmark_manager;
pub mod highlight_manager;
pub mod note_manager;
