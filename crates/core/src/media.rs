//! Media reference bookkeeping.
//!
//! A version only stores references to media held by the media service.
//! Updates may drop references, and every dropped reference must be deleted
//! on the media side before the version record stops pointing at it.

use std::collections::HashSet;

/// Media ids present in `old` but absent from `new`.
///
/// Set semantics: duplicates collapse and the result keeps the first-seen
/// order of `old` so callers issue deletes deterministically.
pub fn dropped_media(old: &[String], new: &[String]) -> Vec<String> {
    let keep: HashSet<&str> = new.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    old.iter()
        .filter(|id| !keep.contains(id.as_str()))
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Remove duplicate and blank media ids, keeping the first occurrence.
pub fn normalize_media_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
