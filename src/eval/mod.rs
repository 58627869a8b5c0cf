//! Offline relevance evaluation (Hit@1 / Hit@3) over a labeled query set.

pub mod terms;


pub use terms::{BATCH_TERMS, batch_terms, unique_trimmed};

use tracing::{info, warn};

use crate::embedding::{EmbeddingClient, RerankClient};
use crate::pipeline::{PipelineError, QueryOutcome, SearchPipeline};
use crate::scoring::RerankedCandidate;
use crate::vectordb::{CandidateRecord, VectorIndex};

/// Query text plus the tokens that make a result relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalQuery {
    pub query: String,
    /// Lower-cased substrings; any one present counts as a hit.
    pub expected: Vec<String>,
}

impl EvalQuery {
    pub fn new(query: &str, expected: &[&str]) -> Self {
        Self {
            query: query.to_string(),
            expected: expected.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

/// The labeled queries shipped with the tool.
pub fn default_eval_queries() -> Vec<EvalQuery> {
    vec![
        EvalQuery::new("heart doctor", &["cardiology", "cardiologist", "cardio"]),
        EvalQuery::new(
            "women's health doctor",
            &["obstetrics & gynecology", "obgyn", "ob/gyn"],
        ),
        EvalQuery::new("kidney doctor", &["nephrology", "nephrologist"]),
        EvalQuery::new("skin doctor", &["dermatology", "dermatologist"]),
        EvalQuery::new("allergy shots", &["allergy", "immunology"]),
        EvalQuery::new(
            "pediatric heart doctor",
            &["pediatric", "pediatrics", "cardiology"],
        ),
    ]
}

/// True when the record's relevance text contains any expected token,
/// ignoring case.
pub fn is_relevant(record: &CandidateRecord, expected: &[String]) -> bool {
    let haystack = record.relevance_text().to_lowercase();
    expected
        .iter()
        .any(|token| haystack.contains(&token.to_lowercase()))
}

/// Aggregate Hit@1 / Hit@3 counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalResult {
    pub hit_at_1: usize,
    pub hit_at_3: usize,
    pub total: usize,
    /// Queries whose pipeline run failed; counted in `total` as misses.
    pub failed: usize,
}

impl EvalResult {
    pub fn hit_at_1_ratio(&self) -> f64 {
        ratio(self.hit_at_1, self.total)
    }

    pub fn hit_at_3_ratio(&self) -> f64 {
        ratio(self.hit_at_3, self.total)
    }

    /// Scores one query's final results.
    pub fn record(&mut self, results: &[RerankedCandidate], expected: &[String]) -> (bool, bool) {
        self.total += 1;
        let hit1 = results
            .first()
            .is_some_and(|c| is_relevant(c.record(), expected));
        let hit3 = results
            .iter()
            .take(3)
            .any(|c| is_relevant(c.record(), expected));
        if hit1 {
            self.hit_at_1 += 1;
        }
        if hit3 {
            self.hit_at_3 += 1;
        }
        (hit1, hit3)
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Formats `hits/total  (pct%)` with a whole-number percentage.
pub fn format_metric(hits: usize, total: usize) -> String {
    format!("{}/{}  ({:.0}%)", hits, total, ratio(hits, total) * 100.0)
}

impl std::fmt::Display for EvalResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Hit@1: {}", format_metric(self.hit_at_1, self.total))?;
        write!(f, "  Hit@3: {}", format_metric(self.hit_at_3, self.total))?;
        if self.failed > 0 {
            write!(f, "\n  Failed: {}/{}", self.failed, self.total)?;
        }
        Ok(())
    }
}

/// One evaluated query.
#[derive(Debug)]
pub struct QueryEvaluation {
    pub query: EvalQuery,
    pub outcome: Result<QueryOutcome, PipelineError>,
    pub hit_at_1: bool,
    pub hit_at_3: bool,
}

/// Full evaluation output, per-query details in input order.
#[derive(Debug)]
pub struct EvalRun {
    pub result: EvalResult,
    pub queries: Vec<QueryEvaluation>,
}

/// Drives a labeled query set through a [`SearchPipeline`].
pub struct Evaluator<'a, E, I, R> {
    pipeline: &'a SearchPipeline<E, I, R>,
}

impl<'a, E, I, R> Evaluator<'a, E, I, R>
where
    E: EmbeddingClient,
    I: VectorIndex,
    R: RerankClient,
{
    pub fn new(pipeline: &'a SearchPipeline<E, I, R>) -> Self {
        Self { pipeline }
    }

    /// Runs every query in order. A failing query is logged, counted as a
    /// miss, and the run continues.
    pub async fn evaluate(&self, queries: &[EvalQuery]) -> EvalRun {
        let config = self.pipeline.config();
        info!(
            retrieval_k = config.retrieval_k,
            final_k = config.final_k,
            threshold = ?config.threshold,
            num_candidates = self.pipeline.num_candidates(),
            rerank = config.rerank_enabled,
            queries = queries.len(),
            "Starting evaluation"
        );

        let mut result = EvalResult::default();
        let mut evaluations = Vec::with_capacity(queries.len());

        for eval_query in queries {
            let outcome = self.pipeline.run(&eval_query.query).await;
            let (hit_at_1, hit_at_3) = match &outcome {
                Ok(outcome) => result.record(outcome.results(), &eval_query.expected),
                Err(err) => {
                    warn!(
                        query = %eval_query.query,
                        stage = %err.stage(),
                        error = %err,
                        "Query failed during evaluation"
                    );
                    result.record_failure();
                    (false, false)
                }
            };

            evaluations.push(QueryEvaluation {
                query: eval_query.clone(),
                outcome,
                hit_at_1,
                hit_at_3,
            });
        }

        info!(
            hit_at_1 = result.hit_at_1,
            hit_at_3 = result.hit_at_3,
            total = result.total,
            failed = result.failed,
            "Evaluation complete"
        );

        EvalRun {
            result,
            queries: evaluations,
        }
    }
}
