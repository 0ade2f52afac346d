pub mod entry;
pub mod excerpt;
pub mod search;

// 重新导出核心类型
pub use entry::{join_tokens, Entry, Etymology, Etymon, EtymonRelationship, Example, Stem, TextToken};
pub use excerpt::{Excerpt, ExcerptKind};
pub use search::{RootMetadata, RootPreview, ScanStats, SearchMode, SearchQuery, SearchResponse};
