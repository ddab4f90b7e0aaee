//! Bookmark model.
//!
//! A bookmark carries no data besides the chapter it marks, so the persisted
//! shape is a JSON array of chapter indices.

use std::collections::BTreeSet;

/// Zero-based index of one unit of reading content.
pub type ChapterIndex = u32;

/// Set of bookmarked chapters.
///
/// `BTreeSet` gives set semantics and a stable ascending wire order;
/// duplicates in a loaded slot collapse on deserialize.
pub type BookmarkSet = BTreeSet<ChapterIndex>;
