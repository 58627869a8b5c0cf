use crate::constants::{
    DEFAULT_NUM_CANDIDATES_CAP, DEFAULT_NUM_CANDIDATES_FLOOR, DEFAULT_NUM_CANDIDATES_MULTIPLIER,
    FILTER_OVERFETCH_FACTOR, FILTER_OVERFETCH_MIN,
};
use crate::vectordb::CandidateRecord;

/// How wide the ANN search looks relative to the number of results wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePolicy {
    pub multiplier: usize,
    pub floor: usize,
    pub cap: usize,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_NUM_CANDIDATES_MULTIPLIER,
            floor: DEFAULT_NUM_CANDIDATES_FLOOR,
            cap: DEFAULT_NUM_CANDIDATES_CAP,
        }
    }
}

impl CandidatePolicy {
    /// `clamp(multiplier * retrieval_k, floor, cap)`.
    ///
    /// ```
    /// use taxon::retrieval::CandidatePolicy;
    ///
    /// assert_eq!(CandidatePolicy::default().num_candidates(100), 300);
    /// ```
    pub fn num_candidates(&self, retrieval_k: usize) -> usize {
        let floor = self.floor.min(self.cap);
        self.multiplier
            .saturating_mul(retrieval_k)
            .clamp(floor, self.cap)
    }
}

/// Optional narrowing applied to retrieved records before truncation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalFilter {
    /// Exact match on the resolved `section` field.
    pub section: Option<String>,
    /// Prefix match on the resolved `code` field.
    pub code_prefix: Option<String>,
}

impl RetrievalFilter {
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            code_prefix: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.section.is_some() || self.code_prefix.is_some()
    }

    pub fn matches(&self, record: &CandidateRecord) -> bool {
        if let Some(section) = &self.section
            && record.section.as_deref() != Some(section.as_str())
        {
            return false;
        }
        if let Some(prefix) = &self.code_prefix
            && !record
                .code
                .as_deref()
                .is_some_and(|code| code.starts_with(prefix.as_str()))
        {
            return false;
        }
        true
    }

    /// Number of records to request so that `retrieval_k` survive filtering.
    pub fn fetch_limit(&self, retrieval_k: usize) -> usize {
        if self.is_active() {
            retrieval_k
                .saturating_mul(FILTER_OVERFETCH_FACTOR)
                .max(FILTER_OVERFETCH_MIN)
        } else {
            retrieval_k
        }
    }
}
