//! Excerpt generation for one entry.
//!
//! Drives the [`EntryFieldWalker`] in collect-all mode and turns each match
//! into a labelled snippet. Snippets are deduplicated by exact text; a
//! duplicate does not consume the excerpt budget.

use std::collections::HashSet;
use std::ops::ControlFlow;

use tracing::trace;

use crate::models::{Entry, Excerpt, ExcerptKind, RootPreview, SearchQuery};
use crate::search_engine::context::{extract_context, DEFAULT_CONTEXT_RADIUS};
use crate::search_engine::field_walker::{EntryFieldWalker, FieldMatch, FieldSource, WalkMode};
use crate::services::{CompiledPattern, QueryMatcher};

/// Excerpts returned per entry unless configured otherwise.
pub const DEFAULT_MAX_EXCERPTS: usize = 5;

pub struct ExcerptGenerator<'m> {
    walker: EntryFieldWalker<'m>,
    max_excerpts: usize,
    radius: usize,
}

impl<'m> ExcerptGenerator<'m> {
    pub fn new(matcher: &'m QueryMatcher) -> Self {
        Self {
            walker: EntryFieldWalker::new(matcher),
            max_excerpts: DEFAULT_MAX_EXCERPTS,
            radius: DEFAULT_CONTEXT_RADIUS,
        }
    }

    pub fn with_max_excerpts(mut self, max_excerpts: usize) -> Self {
        self.max_excerpts = max_excerpts;
        self
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    /// Up to `max_excerpts` distinct excerpts, in field precedence order.
    pub fn generate(&self, entry: &Entry) -> Vec<Excerpt> {
        let mut excerpts = Vec::new();
        if self.max_excerpts == 0 {
            return excerpts;
        }
        let mut seen: HashSet<String> = HashSet::new();

        let _ = self.walker.walk(entry, WalkMode::CollectAll, |hit| {
            let Some(excerpt) = self.to_excerpt(&hit) else {
                return ControlFlow::Continue(());
            };
            if !seen.insert(excerpt.snippet.clone()) {
                trace!(root = %entry.root, snippet = %excerpt.snippet, "Duplicate snippet skipped");
                return ControlFlow::Continue(());
            }
            excerpts.push(excerpt);
            if excerpts.len() >= self.max_excerpts {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        excerpts
    }

    /// Whole-entry preview used by identifier search.
    pub fn preview(&self, entry: &Entry) -> RootPreview {
        RootPreview::Entry(Box::new(entry.clone()))
    }

    /// Root matches carry no excerpt: the root is displayed with every result.
    fn to_excerpt(&self, hit: &FieldMatch<'_>) -> Option<Excerpt> {
        let stem = hit.stem_label.unwrap_or_default();
        let conjugation = hit.conjugation_type.unwrap_or_default();

        let (kind, label) = match hit.source {
            FieldSource::Root => return None,
            FieldSource::Citation => (ExcerptKind::Citation, "Citation:".to_string()),
            FieldSource::Form => (ExcerptKind::Form, format!("Form ({}):", stem)),
            FieldSource::Gloss => (ExcerptKind::Gloss, format!("Gloss ({}):", stem)),
            FieldSource::Example => (ExcerptKind::Example, format!("{}:", conjugation)),
            FieldSource::Translation => (ExcerptKind::Translation, format!("{}:", conjugation)),
            FieldSource::Reference => (ExcerptKind::Example, format!("{} reference:", conjugation)),
            FieldSource::Etymology => (ExcerptKind::Etymology, "Etymology:".to_string()),
            FieldSource::Idiom => (ExcerptKind::Idiom, "Idiom:".to_string()),
        };

        let snippet = if kind.is_verbatim() {
            hit.text.to_string()
        } else if hit.source == FieldSource::Gloss {
            self.gloss_snippet(hit, stem)
        } else {
            extract_context(&hit.text, hit.match_start(), hit.match_length(), self.radius)
        };

        Some(Excerpt {
            field_kind: kind,
            stem_label: hit.stem_label.map(str::to_string),
            conjugation_type: hit.conjugation_type.map(str::to_string),
            snippet,
            label,
        })
    }

    /// Glosses often start with "<stem label>:"; the label is already shown,
    /// so it is dropped from the snippet unless the match lies inside it.
    fn gloss_snippet(&self, hit: &FieldMatch<'_>, stem_label: &str) -> String {
        let start = hit.match_start();
        let length = hit.match_length();

        match strip_label_prefix(&hit.text, stem_label) {
            Some(prefix_chars) if start >= prefix_chars => {
                let display: String = hit.text.chars().skip(prefix_chars).collect();
                extract_context(&display, start - prefix_chars, length, self.radius)
            }
            _ => extract_context(&hit.text, start, length, self.radius),
        }
    }
}

/// Length in chars of a leading `"<label>:"` (plus following spaces), if present.
fn strip_label_prefix(text: &str, label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let trimmed = text.trim_start();
    let rest = trimmed.strip_prefix(label)?.strip_prefix(':')?;
    let after = rest.trim_start();
    Some(text.chars().count() - after.chars().count())
}

/// Stateless entry point: excerpts for `entry` under `query`.
pub fn generate_excerpts(
    entry: &Entry,
    query: &SearchQuery,
    compiled: Option<&CompiledPattern>,
    max_excerpts: usize,
) -> Vec<Excerpt> {
    let matcher = QueryMatcher::with_compiled(query, compiled.cloned());
    ExcerptGenerator::new(&matcher)
        .with_max_excerpts(max_excerpts)
        .generate(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Example, Stem, TextToken};
    use indexmap::IndexMap;

    fn entry_with_examples(examples: Vec<(&str, Example)>) -> Entry {
        let mut conjugations: IndexMap<String, Vec<Example>> = IndexMap::new();
        for (name, example) in examples {
            conjugations.entry(name.to_string()).or_default().push(example);
        }
        Entry {
            root: "ʕbr".to_string(),
            stems: vec![Stem {
                label: "I".to_string(),
                forms: vec!["ʕabər".to_string()],
                gloss_tokens: vec![TextToken {
                    emphasis: false,
                    text: "I: to cross over".to_string(),
                }],
                conjugations,
            }],
            ..Default::default()
        }
    }

    fn example(source: &str, translation: &str) -> Example {
        Example {
            source_text: source.to_string(),
            translations: vec![translation.to_string()],
            references: vec![],
        }
    }

    #[test]
    fn test_translation_only_match() {
        let entry = entry_with_examples(vec![("Preterite", example("ʕbəre", "they crossed"))]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("crossed"), None, 1);

        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].field_kind, ExcerptKind::Translation);
        assert_eq!(excerpts[0].conjugation_type.as_deref(), Some("Preterite"));
        assert_eq!(excerpts[0].label, "Preterite:");
        assert_eq!(excerpts[0].snippet, "they crossed");
    }

    #[test]
    fn test_forms_are_verbatim() {
        let entry = entry_with_examples(vec![]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("bə"), None, 5);

        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].field_kind, ExcerptKind::Form);
        assert_eq!(excerpts[0].snippet, "ʕabər");
        assert_eq!(excerpts[0].label, "Form (I):");
    }

    #[test]
    fn test_distinct_snippets_across_conjugation_types() {
        let entry = entry_with_examples(vec![
            ("Preterite", example("ʕabər u-azze", "-")),
            ("Imperative", example("ʕabər!", "-")),
        ]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("ʕabər"), None, 5);

        let examples: Vec<&Excerpt> = excerpts
            .iter()
            .filter(|e| e.field_kind == ExcerptKind::Example)
            .collect();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label, "Preterite:");
        assert_eq!(examples[1].label, "Imperative:");
    }

    #[test]
    fn test_identical_snippets_are_kept_once() {
        let entry = entry_with_examples(vec![
            ("Preterite", example("ʕabər", "-")),
            ("Imperative", example("ʕabər", "-")),
        ]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("ʕabər"), None, 5);

        // The form "ʕabər" already produced the snippet, so both examples are duplicates.
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].field_kind, ExcerptKind::Form);
    }

    #[test]
    fn test_duplicates_do_not_consume_budget() {
        let entry = entry_with_examples(vec![
            ("Preterite", example("x", "went home")),
            ("Imperative", example("y", "went home")),
            ("Infinitive", example("z", "going home")),
        ]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("home"), None, 2);

        assert_eq!(excerpts.len(), 2);
        assert_eq!(excerpts[0].snippet, "went home");
        assert_eq!(excerpts[1].snippet, "going home");
        assert_eq!(excerpts[1].label, "Infinitive:");
    }

    #[test]
    fn test_gloss_label_prefix_is_hidden() {
        let entry = entry_with_examples(vec![]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("cross"), None, 5);

        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].field_kind, ExcerptKind::Gloss);
        assert_eq!(excerpts[0].snippet, "to cross over");
        assert_eq!(excerpts[0].label, "Gloss (I):");
    }

    #[test]
    fn test_context_window_applied_to_long_text() {
        let long = format!("{} ʕabər {}", "a".repeat(100), "b".repeat(100));
        let entry = entry_with_examples(vec![("Preterite", example(&long, "-"))]);
        let excerpts = ExcerptGenerator::new(&QueryMatcher::new(&SearchQuery::new("ʕabər u")))
            .generate(&entry);
        assert!(excerpts.is_empty());

        let matcher = QueryMatcher::new(&SearchQuery::new(" ʕabər "));
        let excerpts = ExcerptGenerator::new(&matcher).with_radius(3).generate(&entry);
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].snippet, "...aaa ʕabər bbb...");
    }

    #[test]
    fn test_idioms_are_verbatim() {
        let idiom = format!("{} ʕabər ʕal {}", "a".repeat(100), "b".repeat(100));
        let mut entry = entry_with_examples(vec![]);
        entry.idioms = Some(vec![idiom.clone()]);

        let excerpts = generate_excerpts(&entry, &SearchQuery::new("ʕal"), None, 5);
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].field_kind, ExcerptKind::Idiom);
        assert_eq!(excerpts[0].label, "Idiom:");
        assert_eq!(excerpts[0].snippet, idiom);
        assert!(excerpts[0].stem_label.is_none());
    }

    #[test]
    fn test_citation_is_windowed() {
        let mut entry = entry_with_examples(vec![]);
        entry.header_citation = vec![
            TextToken {
                emphasis: false,
                text: format!("{} ", "x".repeat(100)),
            },
            TextToken {
                emphasis: true,
                text: format!("Ritter {}", "y".repeat(100)),
            },
        ];

        let matcher = QueryMatcher::new(&SearchQuery::new("ritter"));
        let excerpts = ExcerptGenerator::new(&matcher).with_radius(5).generate(&entry);
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].field_kind, ExcerptKind::Citation);
        assert_eq!(excerpts[0].label, "Citation:");
        assert_eq!(excerpts[0].snippet, "...xxxx Ritter yyyy...");

        let excerpts = generate_excerpts(&entry, &SearchQuery::new("Ritter"), None, 5);
        let snippet = &excerpts[0].snippet;
        assert!(snippet.starts_with("...") && snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 3 + 60 + 6 + 60 + 3);
    }

    #[test]
    fn test_root_match_yields_no_excerpt() {
        let entry = entry_with_examples(vec![]);
        let excerpts = generate_excerpts(&entry, &SearchQuery::new("ʕbr"), None, 5);
        assert!(excerpts.is_empty());
    }

    #[test]
    fn test_strip_label_prefix() {
        assert_eq!(strip_label_prefix("I: to go", "I"), Some(3));
        assert_eq!(strip_label_prefix("to go", "I"), None);
        assert_eq!(strip_label_prefix("II: x", "I"), None);
        assert_eq!(strip_label_prefix("I: x", ""), None);
    }
}
