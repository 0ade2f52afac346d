use crate::models::SearchQuery;
use crate::services::pattern_compiler::{compile_pattern, CompiledPattern, MatchSpan};

/**
 * 查询匹配器
 *
 * 每次搜索调用创建一次，持有编译后的模式（或 `None`）。
 * 匹配永不失败：
 * - 普通查询：子串匹配（`case_sensitive` 为 false 时两侧先转小写）
 * - 模式查询：使用编译后的正则
 * - 模式编译失败：降级为普通子串匹配
 */
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    text: String,
    needle: String,
    use_pattern: bool,
    case_sensitive: bool,
    compiled: Option<CompiledPattern>,
}

impl QueryMatcher {
    /**
     * 根据查询创建匹配器
     *
     * # 参数
     * * `query` - 搜索查询
     */
    pub fn new(query: &SearchQuery) -> Self {
        let compiled = compile_pattern(&query.text, query.use_pattern, query.case_sensitive);
        Self::with_compiled(query, compiled)
    }

    /**
     * 使用已编译的模式创建匹配器
     */
    pub fn with_compiled(query: &SearchQuery, compiled: Option<CompiledPattern>) -> Self {
        let needle = if query.case_sensitive {
            query.text.clone()
        } else {
            fold_case(&query.text)
        };

        Self {
            text: query.text.clone(),
            needle,
            use_pattern: query.use_pattern,
            case_sensitive: query.case_sensitive,
            compiled,
        }
    }

    pub fn compiled(&self) -> Option<&CompiledPattern> {
        self.compiled.as_ref()
    }

    /// True when a pattern was requested but did not compile.
    pub fn is_fallback(&self) -> bool {
        self.use_pattern && self.compiled.is_none()
    }

    /**
     * 测试字段文本是否匹配
     */
    pub fn matches(&self, text: &str) -> bool {
        if self.text.is_empty() {
            return false;
        }

        match (&self.compiled, self.use_pattern) {
            (Some(compiled), true) => compiled.is_match(text),
            _ if self.case_sensitive => text.contains(self.needle.as_str()),
            _ => fold_case(text).contains(self.needle.as_str()),
        }
    }

    /**
     * 查找首个匹配位置（原文中的字节区间）
     */
    pub fn find(&self, text: &str) -> Option<MatchSpan> {
        if self.text.is_empty() {
            return None;
        }

        match (&self.compiled, self.use_pattern) {
            (Some(compiled), true) => compiled.find(text),
            _ if self.case_sensitive => text
                .find(self.needle.as_str())
                .map(|start| MatchSpan::new(start, start + self.needle.len())),
            _ => find_folded(text, &self.needle),
        }
    }
}

/// 判断文本是否满足查询（无状态入口）
pub fn matches(text: &str, query: &SearchQuery, compiled: Option<&CompiledPattern>) -> bool {
    QueryMatcher::with_compiled(query, compiled.cloned()).matches(text)
}

/// Lower-cases per character so byte offsets can be mapped back.
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive search returning the span in the *original* text.
fn find_folded(text: &str, needle_folded: &str) -> Option<MatchSpan> {
    if needle_folded.is_empty() {
        return None;
    }

    let mut folded = String::with_capacity(text.len());
    // origin[i] = byte offset in `text` of the char that produced folded byte i
    let mut origin: Vec<usize> = Vec::with_capacity(text.len());

    for (idx, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            origin.extend(std::iter::repeat(idx).take(folded.len() - before));
        }
    }

    let pos = folded.find(needle_folded)?;
    let start = origin[pos];
    let last = origin[pos + needle_folded.len() - 1];
    let end = last + text[last..].chars().next().map_or(0, char::len_utf8);

    Some(MatchSpan::new(start, end))
}
