//! Human-readable result listings for stdout.

use std::fmt::Write;

use crate::pipeline::{PipelineConfig, ResultRow};
use crate::scoring::RerankedCandidate;

const PREVIEW_NAME_WIDTH: usize = 40;
const PREVIEW_CODE_WIDTH: usize = 10;

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn fixed(value: Option<f32>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => String::new(),
    }
}

/// One block per query:
/// `NN | vs:score | rr:score | code | classification / specialization | displayName`.
///
/// The `rr:` column appears only on reranked rows.
pub fn format_hits(title: &str, query: &str, results: &[RerankedCandidate]) -> String {
    let mut out = format!("\n[{}]  '{}'\n", title, query);
    if results.is_empty() {
        out.push_str("  (no results)\n");
        return out;
    }

    for (i, c) in results.iter().enumerate() {
        let record = c.record();
        let rerank = c
            .rerank_score
            .map(|s| format!(" | rr:{:.3}", s))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:02} | vs:{}{} | {} | {} / {} | {}",
            i + 1,
            fixed(c.score(), 3),
            rerank,
            opt(record.code.as_deref()),
            opt(record.classification.as_deref()),
            opt(record.specialization.as_deref()),
            opt(record.display_name.as_deref()),
        );
    }
    out
}

/// Compact preview of the first `limit` rows of a query's report.
pub fn format_preview(query: &str, rows: &[ResultRow], limit: usize) -> String {
    let mut out = format!("\n====================  {}  ====================\n", query);
    if rows.iter().all(ResultRow::is_placeholder) {
        out.push_str("No ANN hits.\n");
        return out;
    }

    for row in rows.iter().filter(|r| !r.is_placeholder()).take(limit) {
        let name: String = opt(row.display_name.as_deref())
            .chars()
            .take(PREVIEW_NAME_WIDTH)
            .collect();
        let code: String = opt(row.code.as_deref())
            .chars()
            .take(PREVIEW_CODE_WIDTH)
            .collect();
        let _ = writeln!(
            out,
            "{:>2}  ann={:>6}  rr={:>6}  {:<10}  {}",
            row.rank.unwrap_or_default(),
            fixed(row.score, 4),
            fixed(row.rerank_score, 4),
            code,
            name,
        );
    }
    out
}

/// Run header line naming the effective retrieval knobs.
pub fn format_eval_header(config: &PipelineConfig, num_candidates: usize) -> String {
    let threshold = config
        .threshold
        .map(|t| t.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "Eval: retrieval_k={}, final_k={}, threshold={}, numCandidates≈{}",
        config.retrieval_k, config.final_k, threshold, num_candidates
    )
}
