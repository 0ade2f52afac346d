//! Dictionary entry model.
//!
//! Entries are immutable once loaded. Older corpus documents use a few
//! divergent shapes (a bare translation string, a single `etymon` object);
//! those are normalised here during deserialisation so the search engine
//! only ever sees one closed shape.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// One dictionary entry, keyed by its root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub root: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_citation: Vec<TextToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<Etymology>,
    #[serde(default)]
    pub stems: Vec<Stem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idioms: Option<Vec<String>>,
    /// Root this entry redirects to when it is an alias stub. Never resolved
    /// by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_reference: Option<String>,
}

/// A run of text with an emphasis flag (italic in the printed dictionary).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextToken {
    #[serde(default)]
    pub emphasis: bool,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EtymonRelationship {
    Also,
    Or,
    And,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Etymon {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEtymology")]
pub struct Etymology {
    pub etymons: Vec<Etymon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<EtymonRelationship>,
}

/// Accepts both the current `etymons` list and the legacy single `etymon`.
#[derive(Deserialize)]
struct RawEtymology {
    #[serde(default)]
    etymons: Vec<Etymon>,
    #[serde(default)]
    etymon: Option<Etymon>,
    #[serde(default)]
    relationship: Option<EtymonRelationship>,
}

impl From<RawEtymology> for Etymology {
    fn from(raw: RawEtymology) -> Self {
        let mut etymons = raw.etymons;
        if let Some(single) = raw.etymon {
            etymons.insert(0, single);
        }
        Self {
            etymons,
            relationship: raw.relationship,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stem {
    pub label: String,
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default, alias = "gloss")]
    pub gloss_tokens: Vec<TextToken>,
    /// Conjugation type name -> examples, in document order.
    #[serde(default)]
    pub conjugations: IndexMap<String, Vec<Example>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    #[serde(default)]
    pub source_text: String,
    #[serde(default, alias = "translation", deserialize_with = "one_or_many")]
    pub translations: Vec<String>,
    #[serde(default, alias = "reference", deserialize_with = "one_or_many")]
    pub references: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// Concatenates token texts the way they are displayed.
pub fn join_tokens(tokens: &[TextToken]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

impl Entry {
    /// Source languages of the etymons, in order, without duplicates.
    pub fn etymology_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        if let Some(etymology) = &self.etymology {
            for etymon in &etymology.etymons {
                if !etymon.source.is_empty() && !sources.contains(&etymon.source) {
                    sources.push(etymon.source.clone());
                }
            }
        }
        sources
    }

    pub fn stem_labels(&self) -> Vec<String> {
        self.stems.iter().map(|s| s.label.clone()).collect()
    }

    pub fn forms(&self) -> Vec<String> {
        self.stems
            .iter()
            .flat_map(|s| s.forms.iter().cloned())
            .collect()
    }

    pub fn example_count(&self) -> usize {
        self.stems
            .iter()
            .flat_map(|s| s.conjugations.values())
            .map(Vec::len)
            .sum()
    }

    pub fn header_citation_text(&self) -> String {
        join_tokens(&self.header_citation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_SHAPE: &str = r#"{
        "root": "ʕbr",
        "headerCitation": [{"emphasis": true, "text": "Ritter"}, {"emphasis": false, "text": " 1990: 12"}],
        "etymology": {
            "etymons": [{"source": "Arab.", "sourceRoot": "ʕbr", "meaning": "to cross"}],
            "relationship": "also"
        },
        "stems": [{
            "label": "I",
            "forms": ["ʕbər", "ʕobər"],
            "glossTokens": [{"emphasis": false, "text": "I: to enter"}],
            "conjugations": {
                "Preterite": [{"sourceText": "ʕbər l-bayto", "translations": ["he entered the house"], "references": ["JL 5.3"]}],
                "Infinitive": [{"sourceText": "maʕbar", "translations": ["entering"], "references": []}]
            }
        }],
        "idioms": ["ʕbər b-lebe"]
    }"#;

    #[test]
    fn test_deserialize_current_shape() {
        let entry: Entry = serde_json::from_str(CURRENT_SHAPE).unwrap();

        assert_eq!(entry.root, "ʕbr");
        assert_eq!(entry.header_citation_text(), "Ritter 1990: 12");
        assert_eq!(entry.etymology_sources(), vec!["Arab.".to_string()]);
        assert_eq!(entry.stem_labels(), vec!["I".to_string()]);
        assert_eq!(entry.example_count(), 2);
        assert_eq!(
            entry.etymology.as_ref().unwrap().relationship,
            Some(EtymonRelationship::Also)
        );
    }

    #[test]
    fn test_conjugation_order_is_preserved() {
        let entry: Entry = serde_json::from_str(CURRENT_SHAPE).unwrap();
        let names: Vec<&str> = entry.stems[0]
            .conjugations
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["Preterite", "Infinitive"]);
    }

    #[test]
    fn test_deserialize_legacy_shapes() {
        let legacy = r#"{
            "root": "brk",
            "etymology": {"etymon": {"source": "Syr.", "raw": "brk"}},
            "stems": [{
                "label": "II",
                "gloss": [{"text": "to bless"}],
                "conjugations": {
                    "Preterite": [{"sourceText": "mbarəx", "translation": "he blessed"}]
                }
            }]
        }"#;
        let entry: Entry = serde_json::from_str(legacy).unwrap();

        assert_eq!(entry.etymology_sources(), vec!["Syr.".to_string()]);
        let example = &entry.stems[0].conjugations["Preterite"][0];
        assert_eq!(example.translations, vec!["he blessed".to_string()]);
        assert!(example.references.is_empty());
        assert_eq!(join_tokens(&entry.stems[0].gloss_tokens), "to bless");
        assert!(entry.idioms.is_none());
    }

    #[test]
    fn test_minimal_entry() {
        let entry: Entry = serde_json::from_str(r#"{"root": "xyz", "crossReference": "xzz"}"#).unwrap();
        assert!(entry.stems.is_empty());
        assert_eq!(entry.cross_reference.as_deref(), Some("xzz"));
        assert!(entry.etymology_sources().is_empty());
    }

    #[test]
    fn test_etymology_sources_are_deduplicated() {
        let entry = Entry {
            root: "qrb".to_string(),
            etymology: Some(Etymology {
                etymons: vec![
                    Etymon {
                        source: "Arab.".to_string(),
                        ..Default::default()
                    },
                    Etymon {
                        source: "Arab.".to_string(),
                        ..Default::default()
                    },
                    Etymon {
                        source: "Kurd.".to_string(),
                        ..Default::default()
                    },
                ],
                relationship: Some(EtymonRelationship::Or),
            }),
            ..Default::default()
        };
        assert_eq!(
            entry.etymology_sources(),
            vec!["Arab.".to_string(), "Kurd.".to_string()]
        );
    }
}
