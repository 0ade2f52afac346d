//! Lightweight index projection.
//!
//! A compact per-entry summary used for cheap filter-only listings (browse by
//! first letter, etymology source or stem label) without loading or scanning
//! full entries. Normally produced by a corpus build step; [`build_index`]
//! offers that step for accessors that do not ship a prebuilt index.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::Entry;
use crate::storage::corpus::CorpusAccessor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub root: String,
    pub etymology_sources: Vec<String>,
    pub stem_labels: Vec<String>,
    pub forms: Vec<String>,
    pub example_count: usize,
}

impl IndexEntry {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            root: entry.root.clone(),
            etymology_sources: entry.etymology_sources(),
            stem_labels: entry.stem_labels(),
            forms: entry.forms(),
            example_count: entry.example_count(),
        }
    }
}

/// Projects every loadable entry, in corpus order. Unreadable entries are
/// logged and left out.
pub async fn build_index(corpus: &dyn CorpusAccessor) -> Result<Vec<IndexEntry>> {
    let keys = corpus.list_entry_keys().await?;
    let mut index = Vec::with_capacity(keys.len());

    for key in &keys {
        match corpus.load_entry(key).await {
            Ok(Some(entry)) => index.push(IndexEntry::from_entry(&entry)),
            Ok(None) => warn!(key = %key, "Listed entry is missing, not indexed"),
            Err(e) => warn!(key = %key, error = %e, "Entry could not be loaded, not indexed"),
        }
    }

    info!(listed = keys.len(), indexed = index.len(), "Index projection built");
    Ok(index)
}

/// Entries whose root starts with `letter` (case-insensitive).
pub fn filter_by_first_letter<'a>(index: &'a [IndexEntry], letter: char) -> Vec<&'a IndexEntry> {
    let wanted: String = letter.to_lowercase().collect();
    index
        .iter()
        .filter(|item| {
            item.root
                .chars()
                .next()
                .map(|first| first.to_lowercase().collect::<String>() == wanted)
                .unwrap_or(false)
        })
        .collect()
}

/// Entries with at least one etymon from `source` (case-insensitive).
pub fn filter_by_etymology_source<'a>(index: &'a [IndexEntry], source: &str) -> Vec<&'a IndexEntry> {
    let wanted = source.to_lowercase();
    index
        .iter()
        .filter(|item| item.etymology_sources.iter().any(|s| s.to_lowercase() == wanted))
        .collect()
}

/// Entries having a stem with `label` (case-insensitive).
pub fn filter_by_stem_label<'a>(index: &'a [IndexEntry], label: &str) -> Vec<&'a IndexEntry> {
    let wanted = label.to_lowercase();
    index
        .iter()
        .filter(|item| item.stem_labels.iter().any(|l| l.to_lowercase() == wanted))
        .collect()
}
