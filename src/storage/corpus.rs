//! Corpus access.
//!
//! The engine only reads entries. Where they live is up to the host
//! application; two accessors ship with the crate:
//!
//! - [`FileCorpus`]: one JSON document per entry in a directory
//! - [`MemoryCorpus`]: an ordered in-memory corpus

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LexiconError, Result};
use crate::models::Entry;

/**
 * 语料库访问接口
 *
 * 键到词根的映射必须是确定的。
 */
#[async_trait]
pub trait CorpusAccessor: Send + Sync {
    /**
     * 列出全部条目键（语料库顺序）
     */
    async fn list_entry_keys(&self) -> Result<Vec<String>>;

    /**
     * 加载单个条目
     *
     * # 返回
     * * `Ok(Some(Entry))` - 加载成功
     * * `Ok(None)` - 条目不存在
     * * `Err(LexiconError)` - 读取或解析失败
     */
    async fn load_entry(&self, key: &str) -> Result<Option<Entry>>;

    /**
     * 条目键对应的词根（默认键即词根）
     */
    fn root_for_key(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Directory of `<root>.<extension>` JSON documents.
#[derive(Debug, Clone)]
pub struct FileCorpus {
    dir: PathBuf,
    extension: String,
}

impl FileCorpus {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, self.extension))
    }

    fn listing_error(&self, error: std::io::Error, context: &str) -> LexiconError {
        LexiconError::corpus(error.to_string(), Some(self.dir.clone())).with_context(context)
    }
}

#[async_trait]
impl CorpusAccessor for FileCorpus {
    async fn list_entry_keys(&self) -> Result<Vec<String>> {
        let mut read_dir = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| self.listing_error(e, "Failed to read corpus directory"))?;

        let mut keys = Vec::new();
        while let Some(dir_entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| self.listing_error(e, "Failed to list corpus directory"))?
        {
            let path = dir_entry.path();
            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == self.extension);
            if !matches_extension {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        // read_dir order is platform dependent
        keys.sort();

        info!(
            dir = %self.dir.display(),
            entries = keys.len(),
            "Corpus directory listed"
        );
        Ok(keys)
    }

    async fn load_entry(&self, key: &str) -> Result<Option<Entry>> {
        let path = self.entry_path(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, path = %path.display(), "Entry file not found");
                return Ok(None);
            }
            Err(e) => return Err(LexiconError::Io(e)),
        };

        let entry: Entry = serde_json::from_str(&content)
            .map_err(|e| LexiconError::entry_parse(key, e.to_string()))?;
        Ok(Some(entry))
    }
}

/// Slot of the in-memory corpus; `Broken` simulates an unreadable entry.
#[derive(Debug, Clone)]
enum Slot {
    Entry(Box<Entry>),
    Broken(String),
}

/// Ordered in-memory corpus keyed by root.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    slots: Vec<(String, Slot)>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut corpus = Self::new();
        for entry in entries {
            corpus.insert(entry);
        }
        corpus
    }

    /// Appends an entry (or replaces the one with the same root in place).
    pub fn insert(&mut self, entry: Entry) {
        let key = entry.root.clone();
        let slot = Slot::Entry(Box::new(entry));
        match self.slots.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = slot,
            None => self.slots.push((key, slot)),
        }
    }

    /// Registers a key whose entry fails to parse when loaded.
    pub fn insert_broken(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.slots.push((key.into(), Slot::Broken(message.into())));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[async_trait]
impl CorpusAccessor for MemoryCorpus {
    async fn list_entry_keys(&self) -> Result<Vec<String>> {
        Ok(self.slots.iter().map(|(key, _)| key.clone()).collect())
    }

    async fn load_entry(&self, key: &str) -> Result<Option<Entry>> {
        match self.slots.iter().find(|(k, _)| k == key) {
            Some((_, Slot::Entry(entry))) => Ok(Some(entry.as_ref().clone())),
            Some((_, Slot::Broken(message))) => Err(LexiconError::entry_parse(key, message.clone())),
            None => Ok(None),
        }
    }
}
