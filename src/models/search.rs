use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::entry::Entry;
use super::excerpt::Excerpt;

/**
 * 搜索范围
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    /// 仅匹配词根标识
    IdentifiersOnly,
    /// 匹配条目的全部可搜索字段
    #[default]
    AllFields,
}

/**
 * 搜索查询（每次调用构造一次，不可变）
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub text: String,
    #[serde(default)]
    pub use_pattern: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub mode: SearchMode,
}

impl SearchQuery {
    /**
     * 创建普通子串查询（大小写不敏感，全字段）
     */
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            use_pattern: false,
            case_sensitive: false,
            mode: SearchMode::AllFields,
        }
    }

    pub fn with_pattern(mut self, use_pattern: bool) -> Self {
        self.use_pattern = use_pattern;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/**
 * 单个词根的预览内容
 *
 * 词根搜索返回完整条目；全字段搜索返回摘录列表。
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RootPreview {
    Entry(Box<Entry>),
    Excerpts(Vec<Excerpt>),
}

impl RootPreview {
    pub fn excerpts(&self) -> Option<&[Excerpt]> {
        match self {
            RootPreview::Excerpts(excerpts) => Some(excerpts),
            RootPreview::Entry(_) => None,
        }
    }

    pub fn entry(&self) -> Option<&Entry> {
        match self {
            RootPreview::Entry(entry) => Some(entry),
            RootPreview::Excerpts(_) => None,
        }
    }
}

/**
 * 每个匹配词根附带的元数据
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMetadata {
    pub etymology_sources: Vec<String>,
    pub stem_labels: Vec<String>,
    pub preview: RootPreview,
}

impl RootMetadata {
    pub fn new(entry: &Entry, preview: RootPreview) -> Self {
        Self {
            etymology_sources: entry.etymology_sources(),
            stem_labels: entry.stem_labels(),
            preview,
        }
    }
}

/**
 * 扫描统计：skipped 记录因加载/解析失败而被省略的条目数
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub scanned: usize,
    pub skipped: usize,
    pub matched: usize,
    pub elapsed_ms: u64,
}

/**
 * 搜索结果
 */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub total_matches: usize,
    /// 按语料库顺序排列
    pub matching_roots: Vec<String>,
    pub per_root: HashMap<String, RootMetadata>,
    pub stats: ScanStats,
}

impl SearchResponse {
    pub fn metadata(&self, root: &str) -> Option<&RootMetadata> {
        self.per_root.get(root)
    }
}
