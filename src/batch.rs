//! Change detection: which remote set files need importing this run.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::model::{FolderEntry, SetInfo};

static SET_FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([A-Z0-9]+)\.json$").expect("valid set file regex"));

/// `WS_W35.json` -> `W35`.
pub fn set_id_from_file_name(file_name: &str) -> Option<&str> {
    SET_FILE_NAME
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Index catalog sets by id.
pub fn index_sets(sets: Vec<SetInfo>) -> HashMap<String, SetInfo> {
    sets.into_iter().map(|s| (s.id.clone(), s)).collect()
}

/// True if the catalog has no record of this set or holds a different hash.
///
/// Entries with a malformed name are never considered changed.
pub fn is_changed(entry: &FolderEntry, known: &HashMap<String, SetInfo>) -> bool {
    let Some(set_id) = set_id_from_file_name(&entry.name) else {
        return false;
    };
    match known.get(set_id) {
        Some(set) => set.sha.as_deref() != Some(entry.sha.as_str()),
        None => true,
    }
}

/// Entries with a set id, first file per set id in listing order.
///
/// The catalog keeps one hash per set, so a second file mapping to the same
/// id would never settle; only the first one is considered.
fn first_per_set(entries: &[FolderEntry]) -> impl Iterator<Item = &FolderEntry> {
    let mut seen = HashSet::new();
    entries.iter().filter(move |e| match set_id_from_file_name(&e.name) {
        Some(set_id) => seen.insert(set_id),
        None => false,
    })
}

/// Entries whose catalog hash already matches the remote one.
pub fn count_unchanged(entries: &[FolderEntry], known: &HashMap<String, SetInfo>) -> usize {
    first_per_set(entries).filter(|e| !is_changed(e, known)).count()
}

/// Changed entries in listing order, capped at `max_batch_size`.
///
/// The cap bounds the requests one run makes against the catalog and the
/// file host; whatever is cut off is picked up by a later run.
pub fn select_batch(
    entries: &[FolderEntry],
    known: &HashMap<String, SetInfo>,
    max_batch_size: usize,
) -> Vec<FolderEntry> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for e in entries {
        let Some(set_id) = set_id_from_file_name(&e.name) else {
            warn!(file = %e.name, "skipping file without a set id");
            continue;
        };
        match seen.get(set_id) {
            Some(first) => warn!(file = %e.name, set_id, first = %first, "skipping duplicate set file"),
            None => {
                seen.insert(set_id, e.name.as_str());
            }
        }
    }

    first_per_set(entries)
        .filter(|e| is_changed(e, known))
        .take(max_batch_size)
        .cloned()
        .collect()
}

/// Changed entries that did not fit into the batch.
pub fn count_deferred(
    entries: &[FolderEntry],
    known: &HashMap<String, SetInfo>,
    batch_len: usize,
) -> usize {
    first_per_set(entries)
        .filter(|e| is_changed(e, known))
        .count()
        .saturating_sub(batch_len)
}
