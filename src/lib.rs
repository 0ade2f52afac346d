//! 词典条目词法搜索引擎
//!
//! 在动词词条语料库上执行子串或模式搜索，并为匹配的词条生成带标签的摘要：
//! - `services`: 模式编译（元音/辅音简写）与字段匹配
//! - `search_engine`: 字段遍历、上下文截取、摘要生成、批量语料扫描
//! - `storage`: 语料库访问与轻量索引投影
//! - `infrastructure`: 配置与日志

pub mod error;
pub mod infrastructure;
pub mod models;
pub mod search_engine;
pub mod services;
pub mod storage;

pub use error::{LexiconError, Result};
pub use infrastructure::config::AppConfig;
pub use models::{
    Entry, Excerpt, ExcerptKind, RootMetadata, RootPreview, ScanStats, SearchMode, SearchQuery,
    SearchResponse,
};
pub use search_engine::{extract_context, generate_excerpts, CorpusScanner, ScannerConfig};
pub use services::{compile_pattern, expand_shortcuts, matches, CompiledPattern};
pub use storage::{CorpusAccessor, FileCorpus, MemoryCorpus};
