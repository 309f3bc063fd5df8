//! Descriptive statistics for numeric columns.
//!
//! Statistics tolerate dirty data: text values, absent fields and
//! non-finite numbers all count as missing and are excluded from the
//! computation. An all-missing column yields a zeroed record rather
//! than an error; this module never fails.
//!
//! # Example
//!
//! ```
//! use datasight::logger::NullLogger;
//! use datasight::parser::CsvParser;
//! use datasight::statistics::compute_statistics;
//!
//! let csv = "v\n1\n2\n3\n4\n";
//! let parsed = CsvParser::new().parse_str(csv, &NullLogger).unwrap();
//! let stats = compute_statistics(&parsed.table, &parsed.summary.numeric_columns);
//!
//! let v = &stats["v"];
//! assert_eq!(v.mean, 2.5);
//! assert_eq!(v.median, 2.5);
//! assert_eq!(v.missing, 0);
//! ```

use crate::table::Table;
use serde::Serialize;
use std::collections::HashMap;

/// Descriptive statistics for one numeric column.
///
/// `std_dev` is the population standard deviation (sum of squared
/// deviations divided by the count, not count − 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRecord {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Rows whose value was absent, non-numeric or non-finite.
    pub missing: usize,
}

/// Computes a [`StatRecord`] for each numeric column.
///
/// Recomputed from the current table on every call; nothing is cached.
pub fn compute_statistics(
    table: &Table,
    numeric_columns: &[String],
) -> HashMap<String, StatRecord> {
    let total_rows = table.row_count();
    let mut statistics = HashMap::with_capacity(numeric_columns.len());

    for column in numeric_columns {
        let values = table.finite_values(column);
        let missing = total_rows - values.len();

        if values.is_empty() {
            statistics.insert(
                column.clone(),
                StatRecord {
                    mean: 0.0,
                    median: 0.0,
                    std_dev: 0.0,
                    min: 0.0,
                    max: 0.0,
                    missing,
                },
            );
            continue;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        statistics.insert(
            column.clone(),
            StatRecord {
                mean,
                median,
                std_dev,
                min: sorted[0],
                max: sorted[sorted.len() - 1],
                missing,
            },
        );
    }

    statistics
}
