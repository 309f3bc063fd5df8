//! CSV ingestion with per-column type inference.
//!
//! The parser deliberately implements the same limited dialect the
//! dashboard accepts: newline-delimited records, bare-comma field
//! splitting with no quoted-comma or escape support, fields trimmed
//! and stripped of double-quote characters. Malformed rows (wrong
//! field count) are dropped with a warning, never coerced; only two
//! conditions are fatal (see [`ParseError`]).
//!
//! Each field is typed independently: a non-empty field that parses as
//! a numeric literal becomes [`Value::Number`], everything else
//! [`Value::Text`]. Column classification then samples the first
//! `min(100, n)` rows and marks a column numeric when strictly more
//! than 70% of its sampled values are numbers.
//!
//! # Example
//!
//! ```
//! use datasight::logger::NullLogger;
//! use datasight::parser::CsvParser;
//!
//! let csv = "name,score\nAlice,91.5\nBob,84\n";
//! let parsed = CsvParser::new().parse_str(csv, &NullLogger).unwrap();
//!
//! assert_eq!(parsed.summary.total_rows, 2);
//! assert_eq!(parsed.summary.numeric_columns, vec!["score".to_string()]);
//! assert_eq!(parsed.summary.categorical_columns, vec!["name".to_string()]);
//! ```

use crate::config::Limits;
use crate::error::ParseError;
use crate::logger::Logger;
use crate::table::{ColumnSummary, Row, Table, Value};
use serde::Serialize;
use serde_json::json;

/// Rows examined for type inference.
pub const INFERENCE_SAMPLE_ROWS: usize = 100;

/// Fraction of sampled values that must be numeric (strictly greater)
/// for a column to be classified numeric.
pub const NUMERIC_THRESHOLD: f64 = 0.7;

// ── Parser ────────────────────────────────────────────────────────────

/// CSV parser configuration and entry point.
#[derive(Debug, Clone)]
pub struct CsvParser {
    inference_sample: usize,
    numeric_threshold: f64,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvParser {
    /// Creates a parser with the default inference settings.
    pub fn new() -> Self {
        Self {
            inference_sample: INFERENCE_SAMPLE_ROWS,
            numeric_threshold: NUMERIC_THRESHOLD,
        }
    }

    /// Sets the number of leading rows sampled for type inference.
    pub fn inference_sample(mut self, rows: usize) -> Self {
        self.inference_sample = rows;
        self
    }

    /// Sets the strict numeric-fraction threshold for classification.
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.numeric_threshold = threshold;
        self
    }

    /// Parses raw CSV text into a typed table plus column summary.
    ///
    /// Fails only with [`ParseError::EmptyInput`] (fewer than a header
    /// plus one data line) or [`ParseError::NoValidRows`] (every data
    /// line discarded by column-count validation). All other anomalies
    /// are logged and absorbed.
    pub fn parse_str(
        &self,
        text: &str,
        logger: &dyn Logger,
    ) -> Result<ParsedData, ParseError> {
        let lines: Vec<&str> = text.trim().split('\n').collect();
        if lines.len() < 2 {
            logger.error(
                "CSV parsing error: CSV must have at least a header and one data row",
                Some(json!({ "linesCount": lines.len() })),
            );
            return Err(ParseError::EmptyInput { lines: lines.len() });
        }

        let headers: Vec<String> = lines[0].split(',').map(clean_field).collect();
        if headers.iter().any(|h| h.is_empty()) {
            logger.warn(
                "CSV parsing warning: empty header detected",
                Some(json!({ "headers": headers })),
            );
        }

        let mut rows: Vec<Row> = Vec::new();
        for (i, line) in lines.iter().enumerate().skip(1) {
            let fields: Vec<String> = line.split(',').map(clean_field).collect();
            if fields.len() != headers.len() {
                logger.warn(
                    &format!(
                        "CSV parsing warning: row {} has inconsistent column count, skipping",
                        i + 1
                    ),
                    Some(json!({
                        "row": i + 1,
                        "expectedColumns": headers.len(),
                        "actualColumns": fields.len(),
                        "rowData": line,
                    })),
                );
                continue;
            }
            rows.push(Row::new(fields.into_iter().map(type_field).collect()));
        }

        if rows.is_empty() {
            logger.error(
                "CSV parsing error: no valid data rows found after validation",
                None,
            );
            return Err(ParseError::NoValidRows);
        }

        let table = Table::new(headers, rows);
        let summary = self.classify_columns(&table);
        logger.info(
            "CSV parsing successful",
            Some(json!({
                "totalRows": summary.total_rows,
                "totalColumns": summary.total_columns,
                "numericColumns": summary.numeric_columns.len(),
                "categoricalColumns": summary.categorical_columns.len(),
            })),
        );

        Ok(ParsedData { table, summary })
    }

    // ── Type inference ───────────────────────────────────────────

    /// Classifies each column over the leading sample. Later rows are
    /// never re-examined, even if their types diverge.
    fn classify_columns(&self, table: &Table) -> ColumnSummary {
        let sample_len = table.row_count().min(self.inference_sample);
        let sample = &table.rows()[..sample_len];

        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        for (idx, name) in table.columns().iter().enumerate() {
            let numeric_count = sample
                .iter()
                .filter(|r| r.get(idx).is_some_and(Value::is_number))
                .count();
            if numeric_count as f64 / sample_len as f64 > self.numeric_threshold {
                numeric_columns.push(name.clone());
            } else {
                categorical_columns.push(name.clone());
            }
        }

        ColumnSummary {
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            numeric_columns,
            categorical_columns,
        }
    }
}

/// Trims whitespace and strips double-quote characters from a field.
fn clean_field(field: &str) -> String {
    field.trim().replace('"', "")
}

/// Types one cleaned field. Mirrors the dashboard's conversion rule:
/// non-empty and numeric-parsable (excluding NaN) becomes a number,
/// everything else stays text.
fn type_field(field: String) -> Value {
    if !field.is_empty() {
        if let Ok(n) = field.parse::<f64>() {
            if !n.is_nan() {
                return Value::Number(n);
            }
        }
    }
    Value::Text(field)
}

// ── Parsed data + row cap ─────────────────────────────────────────────

/// Ingestion output: the typed table and its column summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedData {
    pub table: Table,
    pub summary: ColumnSummary,
}

impl ParsedData {
    /// Truncates the table when it exceeds the configured row ceiling.
    ///
    /// Recomputes `total_rows` only; the numeric/categorical
    /// classification from ingestion is left untouched.
    pub fn apply_row_cap(&mut self, limits: &Limits, logger: &dyn Logger) {
        if self.summary.total_rows <= limits.max_rows {
            return;
        }
        self.table.truncate_rows(limits.sample_size);
        let kept = self.table.row_count();
        logger.warn(
            "row limit exceeded, sampling table",
            Some(json!({
                "maxRows": limits.max_rows,
                "originalRows": self.summary.total_rows,
                "sampledRows": kept,
            })),
        );
        self.summary.total_rows = kept;
    }
}
