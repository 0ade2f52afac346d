//! # 模式编译器
//!
//! 将用户输入的高级查询编译为正则匹配器：
//! - `\v` 展开为语料源语言的完整元音集合
//! - `\c` 展开为完整辅音集合（包括特殊音标字母）
//! - 始终启用 Unicode 语义，多字节字母按单个字符匹配
//!
//! 编译失败不会返回错误，而是返回 `None`，由匹配器降级为子串匹配。

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::debug;

/// Vowel letters of the corpus language, with and without length/shortness marks.
pub const VOWELS: &[&str] = &[
    "a", "ā", "ă", "e", "ē", "ĕ", "ə", "i", "ī", "ĭ", "o", "ō", "ŏ", "u", "ū", "ŭ",
];

/// Consonant letters of the corpus language, including the emphatic and
/// spirantised letters. `č̣` is two code points (č + combining dot below).
pub const CONSONANTS: &[&str] = &[
    "b", "c", "č", "\u{10D}\u{323}", "d", "ḏ", "ḍ", "f", "g", "ǧ", "ġ", "h", "ḥ", "k", "l", "m",
    "n", "p", "ṗ", "q", "r", "s", "ṣ", "š", "t", "ṭ", "ṯ", "v", "w", "x", "y", "z", "ẓ", "ž",
    "ʔ", "ʕ",
];

static VOWEL_GROUP: Lazy<String> = Lazy::new(|| alternation(VOWELS));
static CONSONANT_GROUP: Lazy<String> = Lazy::new(|| alternation(CONSONANTS));

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Pattern compilation failed: {0}")]
    CompilationError(String),
    #[error("Empty pattern")]
    EmptyPattern,
}

/// Builds a non-capturing alternation, longest letters first so that a
/// multi-code-point letter wins over its base letter.
fn alternation(letters: &[&str]) -> String {
    let mut sorted: Vec<&str> = letters.to_vec();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    let body: Vec<String> = sorted.iter().map(|l| regex::escape(l)).collect();
    format!("(?:{})", body.join("|"))
}

pub fn vowel_group() -> &'static str {
    VOWEL_GROUP.as_str()
}

pub fn consonant_group() -> &'static str {
    CONSONANT_GROUP.as_str()
}

/// 展开 `\v` / `\c` 宏（大小写不敏感，全局替换）
///
/// 已转义的反斜杠（`\\v`）保持原样，其余转义序列原样透传给正则引擎。
pub fn expand_shortcuts(pattern: &str) -> String {
    let mut expanded = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            expanded.push(c);
            continue;
        }
        match chars.next() {
            Some('v') | Some('V') => expanded.push_str(vowel_group()),
            Some('c') | Some('C') => expanded.push_str(consonant_group()),
            Some(other) => {
                expanded.push('\\');
                expanded.push(other);
            }
            None => expanded.push('\\'),
        }
    }

    expanded
}

/// Byte range of one match inside a field text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/**
 * 编译后的查询模式
 *
 * 生命周期仅限一次搜索调用，不缓存、不跨请求共享。
 */
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    source: String,
}

impl CompiledPattern {
    /**
     * 展开宏并编译
     *
     * # 参数
     * * `pattern` - 原始查询文本
     * * `case_sensitive` - 是否大小写敏感
     */
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        let expanded = expand_shortcuts(pattern);
        let regex = RegexBuilder::new(&expanded)
            .case_insensitive(!case_sensitive)
            .unicode(true)
            .build()
            .map_err(|e| PatternError::CompilationError(e.to_string()))?;

        Ok(Self {
            regex,
            source: pattern.to_string(),
        })
    }

    /// The query text before shortcut expansion.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expanded(&self) -> &str {
        self.regex.as_str()
    }

    /// Same rule as [`find`](Self::find): empty matches do not count.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// First non-empty match; patterns like `a*` would otherwise match
    /// every field at offset zero.
    pub fn find(&self, text: &str) -> Option<MatchSpan> {
        self.regex
            .find_iter(text)
            .find(|m| !m.as_str().is_empty())
            .map(|m| MatchSpan::new(m.start(), m.end()))
    }
}

/// 编译查询；`use_pattern` 为 false 时不编译，编译失败返回 `None`
pub fn compile_pattern(
    text: &str,
    use_pattern: bool,
    case_sensitive: bool,
) -> Option<CompiledPattern> {
    if !use_pattern {
        return None;
    }

    match CompiledPattern::new(text, case_sensitive) {
        Ok(compiled) => {
            debug!(pattern = %text, expanded = %compiled.expanded(), "Pattern compiled");
            Some(compiled)
        }
        Err(e) => {
            debug!(pattern = %text, error = %e, "Pattern rejected, falling back to substring matching");
            None
        }
    }
}
