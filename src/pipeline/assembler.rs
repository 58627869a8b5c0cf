use crate::scoring::RerankedCandidate;

/// One output record, shared by console and CSV output.
///
/// Every column is present; absent values are `None` and render blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    pub query: String,
    /// 1-based position; `None` on the placeholder row.
    pub rank: Option<usize>,
    pub code: Option<String>,
    pub display_name: Option<String>,
    pub classification: Option<String>,
    pub specialization: Option<String>,
    pub section: Option<String>,
    pub score: Option<f32>,
    pub rerank_score: Option<f32>,
}

impl ResultRow {
    /// Row emitted for a query with no results.
    pub fn placeholder(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Default::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.rank.is_none()
    }
}

/// Normalizes final results into rows, ranked from 1.
///
/// An empty result list yields exactly one placeholder row.
pub fn assemble(query: &str, results: &[RerankedCandidate]) -> Vec<ResultRow> {
    if results.is_empty() {
        return vec![ResultRow::placeholder(query)];
    }

    results
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let record = c.record();
            ResultRow {
                query: query.to_string(),
                rank: Some(i + 1),
                code: record.code.clone(),
                display_name: record.display_name.clone(),
                classification: record.classification.clone(),
                specialization: record.specialization.clone(),
                section: record.section.clone(),
                score: c.score().filter(|s| s.is_finite()),
                rerank_score: c.rerank_score.filter(|s| s.is_finite()),
            }
        })
        .collect()
}
