//! Batch report over a term list, CSV output and console listings.

pub mod console;
pub mod csv;
pub mod error;


pub use console::{format_eval_header, format_hits, format_preview};
pub use csv::{CsvWriter, REPORT_COLUMNS, write_csv_file};
pub use error::ReportError;

use tracing::{info, warn};

use crate::embedding::{EmbeddingClient, RerankClient};
use crate::pipeline::{ResultRow, SearchPipeline};
use crate::vectordb::VectorIndex;

/// Rows produced for one term.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRows {
    pub query: String,
    pub rows: Vec<ResultRow>,
    /// The pipeline failed; `rows` holds only the placeholder.
    pub failed: bool,
}

/// Batch run output, one entry per term in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRun {
    pub queries: Vec<QueryRows>,
}

impl ReportRun {
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.queries.iter().flat_map(|q| q.rows.iter())
    }

    pub fn row_count(&self) -> usize {
        self.queries.iter().map(|q| q.rows.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.queries.iter().filter(|q| q.failed).count()
    }

    /// Terms that ran but produced no results.
    pub fn empty(&self) -> usize {
        self.queries
            .iter()
            .filter(|q| !q.failed && q.rows.iter().all(ResultRow::is_placeholder))
            .count()
    }
}

/// Runs every term through `pipeline`, pre-embedding in `batch_size` chunks.
///
/// Failed terms contribute a placeholder row and do not stop the run.
pub async fn build_report<E, I, R>(
    pipeline: &SearchPipeline<E, I, R>,
    terms: &[String],
    batch_size: usize,
) -> ReportRun
where
    E: EmbeddingClient,
    I: VectorIndex,
    R: RerankClient,
{
    info!(terms = terms.len(), batch_size, "Starting batch report");

    if let Err(err) = pipeline.prefetch(terms, batch_size).await {
        warn!(error = %err, "Prefetch failed, embedding terms one at a time");
    }

    let mut run = ReportRun::default();
    for term in terms {
        let entry = match pipeline.run(term).await {
            Ok(outcome) => QueryRows {
                query: term.clone(),
                rows: outcome.rows(),
                failed: false,
            },
            Err(err) => {
                warn!(
                    query = %term,
                    stage = %err.stage(),
                    error = %err,
                    "Query failed during batch report"
                );
                QueryRows {
                    query: term.clone(),
                    rows: vec![ResultRow::placeholder(term)],
                    failed: true,
                }
            }
        };
        run.queries.push(entry);
    }

    info!(
        terms = run.queries.len(),
        rows = run.row_count(),
        failed = run.failed(),
        empty = run.empty(),
        "Batch report complete"
    );
    run
}
