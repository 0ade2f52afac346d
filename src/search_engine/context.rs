//! Context extraction around a match.
//!
//! Offsets and the radius are counted in Unicode scalar values, so a
//! snippet never cuts a multi-byte letter in half.

/// Radius used for excerpt snippets unless configured otherwise.
pub const DEFAULT_CONTEXT_RADIUS: usize = 60;

/// Marker placed where a snippet was truncated.
pub const ELLIPSIS: &str = "...";

/// Char-based window `[start, end)` plus whether each side was cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    pub start: usize,
    pub end: usize,
    pub truncated_left: bool,
    pub truncated_right: bool,
}

impl ContextWindow {
    pub fn compute(text_len: usize, match_start: usize, match_length: usize, radius: usize) -> Self {
        let end = match_start
            .saturating_add(match_length)
            .saturating_add(radius)
            .min(text_len);
        let start = match_start.saturating_sub(radius).min(end);

        Self {
            start,
            end,
            truncated_left: start > 0,
            truncated_right: end < text_len,
        }
    }
}

/// Returns `text[start-radius .. start+len+radius]` (clamped), with `...`
/// prepended when the left bound moved past the text start and appended when
/// the right bound stopped before the text end.
pub fn extract_context(text: &str, match_start: usize, match_length: usize, radius: usize) -> String {
    let text_len = text.chars().count();
    let window = ContextWindow::compute(text_len, match_start, match_length, radius);

    let mut snippet = String::with_capacity(window.end - window.start + 2 * ELLIPSIS.len());
    if window.truncated_left {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(text.chars().skip(window.start).take(window.end - window.start));
    if window.truncated_right {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Converts a byte offset (as produced by the matcher) to a char offset.
pub fn char_offset(text: &str, byte_offset: usize) -> usize {
    let byte_offset = byte_offset.min(text.len());
    text.char_indices()
        .take_while(|(i, _)| *i < byte_offset)
        .count()
}
