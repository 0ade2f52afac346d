//! Corpus Scanner
//!
//! Runs a query over the whole corpus:
//!
//! - **Identifier search** filters the known roots with the matcher, then loads
//!   the surviving entries to return a whole-entry preview for each.
//! - **All-fields search** loads every entry and walks its fields, returning
//!   excerpts for the entries that match.
//!
//! ## Concurrency
//!
//! Entries are loaded in fixed-size batches. Loads inside one batch are
//! polled together on the caller's task (`join_all`, no spawned threads), so
//! at most `batch_size` loads are in flight. Batches run strictly in corpus
//! order and a batch is merged into the response only after all its loads
//! settled, which keeps `matching_roots` in corpus order.
//!
//! An entry that fails to load or parse is logged and counted as skipped; it
//! never fails the batch or the search.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{
    Entry, RootMetadata, RootPreview, ScanStats, SearchMode, SearchQuery, SearchResponse,
};
use crate::search_engine::context::DEFAULT_CONTEXT_RADIUS;
use crate::search_engine::excerpt_generator::{ExcerptGenerator, DEFAULT_MAX_EXCERPTS};
use crate::search_engine::field_walker::EntryFieldWalker;
use crate::services::{QueryMatcher, QueryValidator};
use crate::storage::CorpusAccessor;

/// Default number of entries loaded concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Default maximum query length in characters.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 200;

/// Configuration for corpus scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Entries loaded concurrently per batch
    pub batch_size: usize,
    /// Excerpts kept per matching entry
    pub max_excerpts: usize,
    /// Characters of context on each side of a match
    pub context_radius: usize,
    /// Longer queries are rejected before scanning
    pub max_query_length: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_excerpts: DEFAULT_MAX_EXCERPTS,
            context_radius: DEFAULT_CONTEXT_RADIUS,
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

/// Outcome of evaluating one corpus key.
enum EntryOutcome {
    Matched(String, RootMetadata),
    NoMatch,
    Skipped,
}

/// Running totals for one search call.
#[derive(Default)]
struct Aggregate {
    roots: Vec<String>,
    per_root: HashMap<String, RootMetadata>,
    scanned: usize,
    skipped: usize,
}

impl Aggregate {
    fn merge(&mut self, outcomes: Vec<EntryOutcome>) {
        for outcome in outcomes {
            self.scanned += 1;
            match outcome {
                EntryOutcome::Matched(root, metadata) => {
                    // roots are unique, so no entry overwrites another
                    if self.per_root.insert(root.clone(), metadata).is_none() {
                        self.roots.push(root);
                    }
                }
                EntryOutcome::NoMatch => {}
                EntryOutcome::Skipped => self.skipped += 1,
            }
        }
    }

    fn finish(self, started: Instant) -> SearchResponse {
        let matched = self.roots.len();
        SearchResponse {
            total_matches: matched,
            matching_roots: self.roots,
            per_root: self.per_root,
            stats: ScanStats {
                scanned: self.scanned,
                skipped: self.skipped,
                matched,
                elapsed_ms: millis(started.elapsed()),
            },
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Search entry point over one corpus.
pub struct CorpusScanner {
    corpus: Arc<dyn CorpusAccessor>,
    config: ScannerConfig,
}

impl CorpusScanner {
    pub fn new(corpus: Arc<dyn CorpusAccessor>, config: ScannerConfig) -> Self {
        info!(
            batch_size = config.batch_size,
            max_excerpts = config.max_excerpts,
            context_radius = config.context_radius,
            "Corpus scanner initialized"
        );
        Self { corpus, config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Dispatches on `query.mode`.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        match query.mode {
            SearchMode::IdentifiersOnly => self.search_identifiers(query).await,
            SearchMode::AllFields => self.search_all_fields(query).await,
        }
    }

    /// Matches the query against root identifiers only. Each matching root
    /// comes with a whole-entry preview.
    pub async fn search_identifiers(&self, query: &SearchQuery) -> Result<SearchResponse> {
        QueryValidator::validate(query, self.config.max_query_length)?;
        let started = Instant::now();
        let matcher = QueryMatcher::new(query);
        self.log_fallback(&matcher, query);

        let keys = self.corpus.list_entry_keys().await?;
        let candidates: Vec<&String> = keys
            .iter()
            .filter(|key| matcher.matches(&self.corpus.root_for_key(key)))
            .collect();

        debug!(
            query = %query.text,
            roots = keys.len(),
            candidates = candidates.len(),
            "Root identifiers filtered"
        );

        let generator = &ExcerptGenerator::new(&matcher);
        let mut aggregate = Aggregate::default();

        for (batch_index, batch) in candidates.chunks(self.batch_size()).enumerate() {
            let outcomes = join_all(batch.iter().map(|key| async move {
                match self.load(key).await {
                    Some(entry) => {
                        let preview = generator.preview(&entry);
                        EntryOutcome::Matched(entry.root.clone(), RootMetadata::new(&entry, preview))
                    }
                    None => EntryOutcome::Skipped,
                }
            }))
            .await;

            debug!(batch = batch_index, size = batch.len(), "Identifier batch settled");
            aggregate.merge(outcomes);
        }

        let response = aggregate.finish(started);
        self.log_completion(query, &response);
        Ok(response)
    }

    /// Matches the query against every searchable field of every entry.
    /// Matching entries carry up to `max_excerpts` excerpts.
    pub async fn search_all_fields(&self, query: &SearchQuery) -> Result<SearchResponse> {
        QueryValidator::validate(query, self.config.max_query_length)?;
        let started = Instant::now();
        let matcher = QueryMatcher::new(query);
        self.log_fallback(&matcher, query);

        let keys = self.corpus.list_entry_keys().await?;
        let walker = &EntryFieldWalker::new(&matcher);
        let generator = &ExcerptGenerator::new(&matcher)
            .with_max_excerpts(self.config.max_excerpts)
            .with_radius(self.config.context_radius);
        let mut aggregate = Aggregate::default();

        for (batch_index, batch) in keys.chunks(self.batch_size()).enumerate() {
            let outcomes = join_all(batch.iter().map(|key| async move {
                let Some(entry) = self.load(key).await else {
                    return EntryOutcome::Skipped;
                };
                // cheap short-circuit before building excerpts
                if !walker.entry_matches(&entry) {
                    return EntryOutcome::NoMatch;
                }
                let excerpts = generator.generate(&entry);
                let metadata = RootMetadata::new(&entry, RootPreview::Excerpts(excerpts));
                EntryOutcome::Matched(entry.root, metadata)
            }))
            .await;

            debug!(batch = batch_index, size = batch.len(), "Entry batch settled");
            aggregate.merge(outcomes);
        }

        let response = aggregate.finish(started);
        self.log_completion(query, &response);
        Ok(response)
    }

    /// Loads one entry; failures are logged and reported as `None`.
    async fn load(&self, key: &str) -> Option<Entry> {
        match self.corpus.load_entry(key).await {
            Ok(Some(entry)) => Some(entry),
            Ok(None) => {
                warn!(key = %key, "Listed entry is missing, skipped");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Entry failed to load, skipped");
                None
            }
        }
    }

    fn batch_size(&self) -> usize {
        self.config.batch_size.max(1)
    }

    fn log_fallback(&self, matcher: &QueryMatcher, query: &SearchQuery) {
        if matcher.is_fallback() {
            info!(
                query = %query.text,
                "Pattern did not compile, using substring matching"
            );
        }
    }

    fn log_completion(&self, query: &SearchQuery, response: &SearchResponse) {
        info!(
            query = %query.text,
            mode = ?query.mode,
            total_matches = response.total_matches,
            scanned = response.stats.scanned,
            skipped = response.stats.skipped,
            elapsed_ms = response.stats.elapsed_ms,
            "Search completed"
        );
    }
}
