//! Lexical Search Engine Module
//!
//! Scans structured dictionary entries field by field:
//! - Context extraction around matches (char-based windows)
//! - Fixed-precedence field walking with first-match and collect-all modes
//! - Deduplicated, labelled excerpt generation
//! - Batched, bounded-concurrency corpus scanning

pub mod context;
pub mod corpus_scanner;
pub mod excerpt_generator;
pub mod field_walker;

pub use context::{extract_context, ContextWindow, DEFAULT_CONTEXT_RADIUS};
pub use corpus_scanner::{CorpusScanner, ScannerConfig, DEFAULT_BATCH_SIZE};
pub use excerpt_generator::{generate_excerpts, ExcerptGenerator, DEFAULT_MAX_EXCERPTS};
pub use field_walker::{EntryFieldWalker, FieldMatch, FieldSource, WalkMode};
