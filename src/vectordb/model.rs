use std::collections::HashMap;

use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::value::Kind;

/// A projected taxonomy field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Code,
    DisplayName,
    Classification,
    Specialization,
    Section,
}

/// Source names for each field, highest precedence first.
///
/// The corpus mixes canonical lower-camel keys with legacy Title Case keys left
/// over from earlier imports. The first name holding a non-blank string wins.
pub const FIELD_ALIASES: [(RecordField, &[&str]); 5] = [
    (RecordField::Code, &["code", "Code"]),
    (RecordField::DisplayName, &["displayName", "Display Name"]),
    (RecordField::Classification, &["classification", "Classification"]),
    (RecordField::Specialization, &["specialization", "Specialization"]),
    (RecordField::Section, &["section", "Section"]),
];

impl RecordField {
    /// Source names for this field in precedence order.
    pub fn aliases(self) -> &'static [&'static str] {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    /// The canonical (lower-camel) name.
    pub fn canonical(self) -> &'static str {
        self.aliases().first().copied().unwrap_or_default()
    }
}

/// Read-only view over a raw document payload.
pub trait FieldSource {
    /// Returns the string stored under `key`, if any.
    fn text_value(&self, key: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, qdrant_client::qdrant::Value> {
    fn text_value(&self, key: &str) -> Option<&str> {
        match self.get(key)?.kind.as_ref()? {
            Kind::StringValue(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl FieldSource for HashMap<String, String> {
    fn text_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl FieldSource for serde_json::Map<String, serde_json::Value> {
    fn text_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }
}

/// Resolves `field` from `source` using [`FIELD_ALIASES`].
///
/// Blank strings count as absent, so an empty canonical key falls through to
/// the legacy one.
pub fn resolve_field<S: FieldSource + ?Sized>(source: &S, field: RecordField) -> Option<String> {
    field
        .aliases()
        .iter()
        .filter_map(|key| source.text_value(key))
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
}

/// A corpus entry surfaced by retrieval, with field names already coalesced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub code: Option<String>,
    pub display_name: Option<String>,
    pub classification: Option<String>,
    pub specialization: Option<String>,
    pub section: Option<String>,
}

impl CandidateRecord {
    /// Builds a record by resolving every field from `source`.
    pub fn from_source<S: FieldSource + ?Sized>(source: &S) -> Self {
        Self {
            code: resolve_field(source, RecordField::Code),
            display_name: resolve_field(source, RecordField::DisplayName),
            classification: resolve_field(source, RecordField::Classification),
            specialization: resolve_field(source, RecordField::Specialization),
            section: resolve_field(source, RecordField::Section),
        }
    }

    /// Returns the resolved value of `field`.
    pub fn get(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Code => self.code.as_deref(),
            RecordField::DisplayName => self.display_name.as_deref(),
            RecordField::Classification => self.classification.as_deref(),
            RecordField::Specialization => self.specialization.as_deref(),
            RecordField::Section => self.section.as_deref(),
        }
    }

    /// `displayName | classification | specialization | code`, blanks kept.
    ///
    /// This is the text relevance judgments match expected tokens against.
    pub fn relevance_text(&self) -> String {
        [
            RecordField::DisplayName,
            RecordField::Classification,
            RecordField::Specialization,
            RecordField::Code,
        ]
        .iter()
        .map(|f| self.get(*f).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" | ")
    }
}

/// A [`CandidateRecord`] with its ANN similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub record: CandidateRecord,
    /// Vector similarity. `None` only for malformed index rows.
    pub score: Option<f32>,
}

impl ScoredCandidate {
    pub fn new(record: CandidateRecord, score: f32) -> Self {
        Self {
            record,
            score: Some(score),
        }
    }

    /// The score used for comparisons; missing scores compare as `0.0`.
    #[inline]
    pub fn score_or_zero(&self) -> f32 {
        self.score.unwrap_or(0.0)
    }

    pub fn from_scored_point(point: ScoredPoint) -> Self {
        let score = point.score;
        Self {
            record: CandidateRecord::from_source(&point.payload),
            score: score.is_finite().then_some(score),
        }
    }
}

/// What the index should search with.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorQuery {
    /// A client-side query embedding.
    Vector(Vec<f32>),
    /// Raw text embedded by the index's own inference with `model`.
    Text { text: String, model: String },
}

/// One ANN request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: VectorQuery,
    /// Exploration breadth (HNSW `ef`).
    pub num_candidates: u64,
    /// Max results returned.
    pub limit: u64,
}
