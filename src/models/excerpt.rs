use serde::{Deserialize, Serialize};

/**
 * 摘录所在字段的类别
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcerptKind {
    Form,
    Example,
    Translation,
    Etymology,
    Gloss,
    Idiom,
    Citation,
}

impl ExcerptKind {
    /**
     * 该类字段是否已足够短，直接展示原文而不截取上下文
     */
    pub fn is_verbatim(self) -> bool {
        matches!(self, ExcerptKind::Form | ExcerptKind::Idiom)
    }
}

/**
 * 单条匹配摘录（仅随响应返回，不持久化）
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Excerpt {
    pub field_kind: ExcerptKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conjugation_type: Option<String>,
    pub snippet: String,
    pub label: String,
}
