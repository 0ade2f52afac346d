//! Entry field walker.
//!
//! Visits the searchable text of one entry in a fixed precedence:
//!
//! 1. root identifier
//! 2. header citation (tokens concatenated)
//! 3. per stem, in order: each form, the gloss (tokens concatenated), then per
//!    conjugation type and example: source text, each translation, each reference
//! 4. etymology: per etymon `meaning`, `notes`, `raw`, `sourceRoot`
//! 5. idioms
//!
//! Every field is tested with the [`QueryMatcher`]; each hit is reported to
//! a visitor which decides whether walking continues.

use std::borrow::Cow;
use std::ops::ControlFlow;

use crate::models::{join_tokens, Entry, Stem};
use crate::search_engine::context::char_offset;
use crate::services::{MatchSpan, QueryMatcher};

/// Where in the entry a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    Root,
    Citation,
    Form,
    Gloss,
    Example,
    Translation,
    Reference,
    Etymology,
    Idiom,
}

/// One matching field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch<'e> {
    pub source: FieldSource,
    pub text: Cow<'e, str>,
    pub stem_label: Option<&'e str>,
    pub conjugation_type: Option<&'e str>,
    /// Byte span of the match inside `text`.
    pub span: MatchSpan,
}

impl FieldMatch<'_> {
    /// Match start in chars, for context extraction.
    pub fn match_start(&self) -> usize {
        char_offset(&self.text, self.span.start)
    }

    /// Match length in chars.
    pub fn match_length(&self) -> usize {
        self.span.text(&self.text).chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Stop at the first matching field.
    FirstMatch,
    /// Report every matching field until the visitor breaks.
    CollectAll,
}

/// Labels and owner info carried along while a stem is being walked.
#[derive(Clone, Copy, Default)]
struct Scope<'e> {
    stem_label: Option<&'e str>,
    conjugation_type: Option<&'e str>,
}

pub struct EntryFieldWalker<'m> {
    matcher: &'m QueryMatcher,
}

impl<'m> EntryFieldWalker<'m> {
    pub fn new(matcher: &'m QueryMatcher) -> Self {
        Self { matcher }
    }

    /// Walks `entry`, handing every match to `visit`. Returns `Break` if the
    /// visitor stopped the walk early.
    pub fn walk<'e, F>(&self, entry: &'e Entry, mode: WalkMode, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(FieldMatch<'e>) -> ControlFlow<()>,
    {
        let mut sink = |hit: FieldMatch<'e>| match (visit(hit), mode) {
            (ControlFlow::Break(()), _) | (_, WalkMode::FirstMatch) => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        };
        self.walk_fields(entry, &mut sink)
    }

    /// The first matching field in precedence order, if any.
    pub fn first_match<'e>(&self, entry: &'e Entry) -> Option<FieldMatch<'e>> {
        let mut found = None;
        let _ = self.walk(entry, WalkMode::FirstMatch, |hit| {
            found = Some(hit);
            ControlFlow::Break(())
        });
        found
    }

    /// Does any searchable field of the entry match?
    pub fn entry_matches(&self, entry: &Entry) -> bool {
        self.first_match(entry).is_some()
    }

    /// Every matching field, at most `limit` of them.
    pub fn collect_all<'e>(&self, entry: &'e Entry, limit: usize) -> Vec<FieldMatch<'e>> {
        let mut hits = Vec::new();
        if limit == 0 {
            return hits;
        }
        let _ = self.walk(entry, WalkMode::CollectAll, |hit| {
            hits.push(hit);
            if hits.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        hits
    }

    fn walk_fields<'e>(
        &self,
        entry: &'e Entry,
        sink: &mut dyn FnMut(FieldMatch<'e>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let top = Scope::default();

        self.test(FieldSource::Root, Cow::Borrowed(&entry.root), top, sink)?;

        if !entry.header_citation.is_empty() {
            let citation = join_tokens(&entry.header_citation);
            self.test(FieldSource::Citation, Cow::Owned(citation), top, sink)?;
        }

        for stem in &entry.stems {
            self.walk_stem(stem, sink)?;
        }

        if let Some(etymology) = &entry.etymology {
            for etymon in &etymology.etymons {
                let fields = [&etymon.meaning, &etymon.notes, &etymon.raw, &etymon.source_root];
                for text in fields.into_iter().flatten() {
                    self.test(FieldSource::Etymology, Cow::Borrowed(text), top, sink)?;
                }
            }
        }

        for idiom in entry.idioms.iter().flatten() {
            self.test(FieldSource::Idiom, Cow::Borrowed(idiom), top, sink)?;
        }

        ControlFlow::Continue(())
    }

    fn walk_stem<'e>(
        &self,
        stem: &'e Stem,
        sink: &mut dyn FnMut(FieldMatch<'e>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let mut scope = Scope {
            stem_label: Some(stem.label.as_str()),
            conjugation_type: None,
        };

        for form in &stem.forms {
            self.test(FieldSource::Form, Cow::Borrowed(form), scope, sink)?;
        }

        if !stem.gloss_tokens.is_empty() {
            let gloss = join_tokens(&stem.gloss_tokens);
            self.test(FieldSource::Gloss, Cow::Owned(gloss), scope, sink)?;
        }

        for (conjugation, examples) in &stem.conjugations {
            scope.conjugation_type = Some(conjugation.as_str());
            for example in examples {
                self.test(FieldSource::Example, Cow::Borrowed(&example.source_text), scope, sink)?;
                for translation in &example.translations {
                    self.test(FieldSource::Translation, Cow::Borrowed(translation), scope, sink)?;
                }
                for reference in &example.references {
                    self.test(FieldSource::Reference, Cow::Borrowed(reference), scope, sink)?;
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn test<'e>(
        &self,
        source: FieldSource,
        text: Cow<'e, str>,
        scope: Scope<'e>,
        sink: &mut dyn FnMut(FieldMatch<'e>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if text.is_empty() {
            return ControlFlow::Continue(());
        }
        match self.matcher.find(&text) {
            Some(span) => sink(FieldMatch {
                source,
                text,
                stem_label: scope.stem_label,
                conjugation_type: scope.conjugation_type,
                span,
            }),
            None => ControlFlow::Continue(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Etymology, Etymon, Example, SearchQuery, TextToken};
    use indexmap::IndexMap;

    fn sample_entry() -> Entry {
        let mut conjugations = IndexMap::new();
        conjugations.insert(
            "Preterite".to_string(),
            vec![Example {
                source_text: "ʕbər l-bayto".to_string(),
                translations: vec!["he entered the house".to_string()],
                references: vec!["JL 5.3".to_string()],
            }],
        );
        conjugations.insert(
            "Infinitive".to_string(),
            vec![Example {
                source_text: "maʕbar".to_string(),
                translations: vec!["entering the house".to_string()],
                references: vec![],
            }],
        );

        Entry {
            root: "ʕbr".to_string(),
            header_citation: vec![TextToken {
                emphasis: true,
                text: "Ritter house".to_string(),
            }],
            etymology: Some(Etymology {
                etymons: vec![Etymon {
                    source: "Arab.".to_string(),
                    source_root: Some("ʕbr".to_string()),
                    meaning: Some("to cross a house".to_string()),
                    notes: None,
                    raw: None,
                }],
                relationship: None,
            }),
            stems: vec![Stem {
                label: "I".to_string(),
                forms: vec!["ʕbər".to_string(), "ʕobər".to_string()],
                gloss_tokens: vec![TextToken {
                    emphasis: false,
                    text: "I: to enter a house".to_string(),
                }],
                conjugations,
            }],
            idioms: Some(vec!["ʕbər b-house".to_string()]),
            cross_reference: None,
        }
    }

    fn sources(hits: &[FieldMatch<'_>]) -> Vec<FieldSource> {
        hits.iter().map(|h| h.source).collect()
    }

    #[test]
    fn test_collect_all_follows_field_precedence() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("house"));
        let walker = EntryFieldWalker::new(&matcher);

        let hits = walker.collect_all(&entry, usize::MAX);
        assert_eq!(
            sources(&hits),
            vec![
                FieldSource::Citation,
                FieldSource::Gloss,
                FieldSource::Translation,
                FieldSource::Translation,
                FieldSource::Etymology,
                FieldSource::Idiom,
            ]
        );
        assert_eq!(hits[2].conjugation_type, Some("Preterite"));
        assert_eq!(hits[3].conjugation_type, Some("Infinitive"));
        assert_eq!(hits[1].stem_label, Some("I"));
        assert_eq!(hits[0].stem_label, None);
    }

    #[test]
    fn test_collect_all_stops_at_limit() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("house"));
        let walker = EntryFieldWalker::new(&matcher);

        let hits = walker.collect_all(&entry, 2);
        assert_eq!(sources(&hits), vec![FieldSource::Citation, FieldSource::Gloss]);
        assert!(walker.collect_all(&entry, 0).is_empty());
    }

    #[test]
    fn test_first_match_prefers_root() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("ʕb"));
        let walker = EntryFieldWalker::new(&matcher);

        let hit = walker.first_match(&entry).unwrap();
        assert_eq!(hit.source, FieldSource::Root);
        assert_eq!(hit.text, "ʕbr");
    }

    #[test]
    fn test_references_and_etymology_fields() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("JL 5"));
        let walker = EntryFieldWalker::new(&matcher);
        let hit = walker.first_match(&entry).unwrap();
        assert_eq!(hit.source, FieldSource::Reference);
        assert_eq!(hit.conjugation_type, Some("Preterite"));

        let matcher = QueryMatcher::new(&SearchQuery::new("to cross"));
        let walker = EntryFieldWalker::new(&matcher);
        assert_eq!(walker.first_match(&entry).unwrap().source, FieldSource::Etymology);
    }

    #[test]
    fn test_gloss_is_matched_with_label_prefix() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("I: to"));
        let walker = EntryFieldWalker::new(&matcher);
        let hit = walker.first_match(&entry).unwrap();
        assert_eq!(hit.source, FieldSource::Gloss);
        assert_eq!(hit.span.start, 0);
    }

    #[test]
    fn test_no_match() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("zzz"));
        let walker = EntryFieldWalker::new(&matcher);
        assert!(!walker.entry_matches(&entry));
        assert!(walker.collect_all(&entry, 10).is_empty());
    }

    #[test]
    fn test_match_offsets_in_chars() {
        let entry = sample_entry();
        let matcher = QueryMatcher::new(&SearchQuery::new("bayto"));
        let walker = EntryFieldWalker::new(&matcher);
        let hit = walker.first_match(&entry).unwrap();
        assert_eq!(hit.source, FieldSource::Example);
        assert_eq!(hit.match_start(), 7);
        assert_eq!(hit.match_length(), 5);
    }
}
