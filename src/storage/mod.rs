//! Corpus Storage Module
//!
//! Read-only access to dictionary entries:
//!
//! - `corpus`: the [`CorpusAccessor`] trait plus file and in-memory accessors
//! - `index`: the lightweight per-entry projection and filter-only listings

pub mod corpus;
pub mod index;

pub use corpus::{CorpusAccessor, FileCorpus, MemoryCorpus};
pub use index::{
    build_index, filter_by_etymology_source, filter_by_first_letter, filter_by_stem_label,
    IndexEntry,
};
