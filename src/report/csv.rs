use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::error::ReportError;
use crate::pipeline::ResultRow;

/// Column order of the batch report.
pub const REPORT_COLUMNS: [&str; 9] = [
    "query",
    "rank",
    "code",
    "displayName",
    "classification",
    "specialization",
    "section",
    "score",
    "rerank_score",
];

/// Writes [`ResultRow`]s as RFC 4180 CSV with blank cells for absent values.
pub struct CsvWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> CsvWriter<W> {
    /// Wraps `inner` and writes the header line.
    pub fn new(mut inner: W) -> Result<Self, ReportError> {
        write_record(&mut inner, REPORT_COLUMNS.iter().map(|c| c.to_string()))?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write_row(&mut self, row: &ResultRow) -> Result<(), ReportError> {
        write_record(&mut self.inner, row_cells(row))?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far (header excluded).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W, ReportError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Writes `rows` to a new file at `path`, replacing any existing file.
pub fn write_csv_file<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = &'a ResultRow>,
) -> Result<usize, ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = CsvWriter::new(BufWriter::new(file))?;
    for row in rows {
        writer.write_row(row)?;
    }
    let written = writer.rows_written();
    writer.finish()?;

    info!(path = %path.display(), rows = written, "Wrote report");
    Ok(written)
}

fn row_cells(row: &ResultRow) -> [String; 9] {
    [
        row.query.clone(),
        row.rank.map(|r| r.to_string()).unwrap_or_default(),
        row.code.clone().unwrap_or_default(),
        row.display_name.clone().unwrap_or_default(),
        row.classification.clone().unwrap_or_default(),
        row.specialization.clone().unwrap_or_default(),
        row.section.clone().unwrap_or_default(),
        format_score(row.score),
        format_score(row.rerank_score),
    ]
}

fn format_score(score: Option<f32>) -> String {
    match score {
        Some(s) if s.is_finite() => s.to_string(),
        _ => String::new(),
    }
}

fn write_record<W: Write>(
    out: &mut W,
    cells: impl IntoIterator<Item = String>,
) -> std::io::Result<()> {
    let line = cells
        .into_iter()
        .map(|c| escape(&c))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{}", line)
}

/// Quotes a cell when it contains a delimiter, quote or line break.
pub fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
