//! Correlation and trend analysis, plus the merged analysis pass.
//!
//! Both analyses read the immutable table and the ingestion-time
//! column classification; neither mutates anything, so they can run in
//! any order (or in parallel, if the host wants to overlap them).
//!
//! Columns are filtered to finite values independently. For
//! correlation the two filtered vectors are then paired positionally
//! over the shorter length; rows are **not** re-aligned after
//! filtering. This reproduces the dashboard's observed pairing policy
//! (see DESIGN.md for the deliberate-parity note).
//!
//! # Example
//!
//! ```
//! use datasight::analysis::{correlations, trends, Trend};
//! use datasight::logger::NullLogger;
//! use datasight::parser::CsvParser;
//!
//! let csv = "a,b\n1,2\n2,4\n3,6\n4,8\n5,10\n6,12\n7,14\n8,16\n9,18\n10,20\n11,22\n";
//! let parsed = CsvParser::new().parse_str(csv, &NullLogger).unwrap();
//!
//! let corr = correlations(&parsed.table, &parsed.summary.numeric_columns);
//! assert!((corr[0].correlation - 1.0).abs() < 1e-10);
//!
//! let trends = trends(&parsed.table, &parsed.summary.numeric_columns);
//! assert_eq!(trends[0].trend, Trend::Increasing);
//! ```

use crate::clustering::{ApproximateClusterEstimator, ClusterResult};
use crate::logger::Logger;
use crate::parser::ParsedData;
use crate::statistics::{compute_statistics, StatRecord};
use crate::table::{ColumnSummary, Table};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// A column needs strictly more than this many usable values to
/// qualify for correlation or trend analysis.
pub const MIN_SERIES_LEN: usize = 10;

/// Minimum absolute correlation for a pair to be reported.
pub const CORRELATION_THRESHOLD: f64 = 0.3;

/// Absolute slope below which a trend is classified stable.
pub const STABLE_SLOPE: f64 = 0.01;

// ── Correlation ───────────────────────────────────────────────────────

/// One reported column pair with its Pearson coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// First column of the pair (earlier in the numeric column list).
    pub x: String,
    /// Second column of the pair.
    pub y: String,
    /// Pearson product-moment coefficient, in [-1, 1].
    pub correlation: f64,
}

/// Pearson correlation over the positional prefix of two vectors.
///
/// Computed on the first `min(x.len(), y.len())` elements with the
/// standard sum-based formula. A zero denominator (either side has no
/// variance) yields 0.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let n = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Computes pairwise correlations across the numeric columns.
///
/// Every unordered pair is considered once (i < j over the column
/// list). A pair is skipped unless both filtered vectors hold more
/// than [`MIN_SERIES_LEN`] values, and reported only when
/// |correlation| exceeds [`CORRELATION_THRESHOLD`]. The result is
/// sorted descending by absolute coefficient; ties keep pair
/// generation order.
pub fn correlations(table: &Table, numeric_columns: &[String]) -> Vec<CorrelationResult> {
    let mut results = Vec::new();

    for i in 0..numeric_columns.len() {
        for j in (i + 1)..numeric_columns.len() {
            let xs = table.finite_values(&numeric_columns[i]);
            let ys = table.finite_values(&numeric_columns[j]);
            if xs.len() <= MIN_SERIES_LEN || ys.len() <= MIN_SERIES_LEN {
                continue;
            }
            let correlation = pearson(&xs, &ys);
            if correlation.abs() > CORRELATION_THRESHOLD {
                results.push(CorrelationResult {
                    x: numeric_columns[i].clone(),
                    y: numeric_columns[j].clone(),
                    correlation,
                });
            }
        }
    }

    // sort_by is stable, preserving generation order on ties
    results.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

// ── Trend ─────────────────────────────────────────────────────────────

/// Direction of a column's least-squares slope over row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Trend classification for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub column: String,
    pub trend: Trend,
}

/// Detects a per-column trend via the closed-form OLS slope of value
/// against 0-based row position.
///
/// Columns with [`MIN_SERIES_LEN`] or fewer usable values are skipped.
/// Results follow the numeric column list's order.
pub fn trends(table: &Table, numeric_columns: &[String]) -> Vec<TrendResult> {
    let mut results = Vec::new();

    for column in numeric_columns {
        let values = table.finite_values(column);
        if values.len() <= MIN_SERIES_LEN {
            continue;
        }

        let n = values.len();
        let nf = n as f64;
        let sum_x: f64 = (0..n).map(|i| i as f64).sum();
        let sum_y: f64 = values.iter().sum();
        let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
        let sum_x2: f64 = (0..n).map(|i| (i * i) as f64).sum();

        let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x);

        let trend = if slope.abs() < STABLE_SLOPE {
            Trend::Stable
        } else if slope > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        };

        results.push(TrendResult {
            column: column.clone(),
            trend,
        });
    }

    results
}

// ── Merged analysis pass ──────────────────────────────────────────────

/// The merged result object consumed by the presentation and export
/// collaborators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The ingested table, unmodified.
    pub table: Table,
    /// Column names in header order.
    pub columns: Vec<String>,
    /// Ingestion-time column classification.
    pub summary: ColumnSummary,
    /// Per-column descriptive statistics.
    pub statistics: HashMap<String, StatRecord>,
    /// High-correlation pairs, descending by |r|.
    pub correlations: Vec<CorrelationResult>,
    /// Per-column trend directions.
    pub trends: Vec<TrendResult>,
    /// Approximate cluster placeholders.
    pub clusters: Vec<ClusterResult>,
}

/// Runs every analysis component over the parsed table and merges the
/// results.
///
/// Each component independently reads the immutable table and summary;
/// none mutates its input.
pub fn run_analysis(
    parsed: &ParsedData,
    estimator: &ApproximateClusterEstimator,
    logger: &dyn Logger,
) -> AnalysisResult {
    let numeric = &parsed.summary.numeric_columns;

    let statistics = compute_statistics(&parsed.table, numeric);
    let correlations = correlations(&parsed.table, numeric);
    let trends = trends(&parsed.table, numeric);
    let clusters = estimator.estimate(&parsed.table, numeric);

    logger.info(
        "analysis pass complete",
        Some(json!({
            "rows": parsed.summary.total_rows,
            "correlations": correlations.len(),
            "trends": trends.len(),
            "clusters": clusters.len(),
        })),
    );

    AnalysisResult {
        table: parsed.table.clone(),
        columns: parsed.table.columns().to_vec(),
        summary: parsed.summary.clone(),
        statistics,
        correlations,
        trends,
        clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use crate::parser::CsvParser;

    fn parse(csv: &str) -> ParsedData {
        CsvParser::new().parse_str(csv, &NullLogger).unwrap()
    }

    /// Builds CSV text with the given columns, one value per row.
    fn csv_of(columns: &[(&str, Vec<String>)]) -> String {
        let header: Vec<&str> = columns.iter().map(|(n, _)| *n).collect();
        let rows = columns[0].1.len();
        let mut out = header.join(",");
        out.push('\n');
        for r in 0..rows {
            let line: Vec<&str> = columns.iter().map(|(_, v)| v[r].as_str()).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    fn num_seq(values: impl IntoIterator<Item = f64>) -> Vec<String> {
        values.into_iter().map(|v| v.to_string()).collect()
    }

    // ── Pearson ──────────────────────────────────────────────────

    #[test]
    fn pearson_of_identical_series_is_one() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 1.7 + 3.0).collect();
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn pearson_is_symmetric() {
        let x: Vec<f64> = vec![1.0, 4.0, 2.0, 8.0, 5.0, 7.0, 3.0, 9.0, 6.0, 2.5, 4.5, 1.5];
        let y: Vec<f64> = vec![2.0, 3.0, 5.0, 7.0, 4.0, 8.0, 1.0, 9.0, 2.0, 6.5, 3.5, 7.5];
        assert!((pearson(&x, &y) - pearson(&y, &x)).abs() < 1e-12);
    }

    #[test]
    fn pearson_perfect_negative() {
        let x: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 100.0 - 2.0 * v).collect();
        assert!((pearson(&x, &y) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn pearson_zero_variance_is_zero() {
        let x = vec![5.0; 12];
        let y: Vec<f64> = (0..12).map(|i| i as f64).collect();
        assert_eq!(pearson(&x, &y), 0.0);
    }

    #[test]
    fn pearson_truncates_to_shorter_prefix() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let mut y: Vec<f64> = (0..20).map(|i| i as f64).collect();
        // Elements beyond the prefix never influence the result.
        y[15] = -1000.0;
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn pearson_short_input_is_zero() {
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    // ── Correlation over tables ──────────────────────────────────

    #[test]
    fn reports_strong_pair_descending() {
        let base: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let csv = csv_of(&[
            ("a", num_seq(base.clone())),
            ("b", num_seq(base.iter().map(|v| v * 2.0))),
            ("c", num_seq(base.iter().map(|v| 50.0 - v))),
        ]);
        let parsed = parse(&csv);
        let results = correlations(&parsed.table, &parsed.summary.numeric_columns);

        // All three pairs are perfectly correlated, so all survive the
        // threshold and no pair appears twice.
        assert_eq!(results.len(), 3);
        let mut seen = std::collections::HashSet::new();
        for r in &results {
            assert!(r.correlation.abs() > CORRELATION_THRESHOLD);
            assert!(seen.insert((r.x.clone(), r.y.clone())));
        }
        // Descending by |r|.
        for pair in results.windows(2) {
            assert!(pair[0].correlation.abs() >= pair[1].correlation.abs());
        }
        // Ties keep generation order: (a,b) before (a,c) before (b,c).
        assert_eq!((results[0].x.as_str(), results[0].y.as_str()), ("a", "b"));
    }

    #[test]
    fn skips_pairs_below_threshold() {
        // A constant column correlates 0 with anything (zero variance).
        let csv = csv_of(&[
            ("a", num_seq((0..12).map(|i| i as f64))),
            ("b", num_seq(std::iter::repeat(7.0).take(12))),
        ]);
        let parsed = parse(&csv);
        assert!(correlations(&parsed.table, &parsed.summary.numeric_columns).is_empty());
    }

    #[test]
    fn skips_pairs_with_short_series() {
        // Exactly 10 usable values: not strictly more, so skipped.
        let base: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let csv = csv_of(&[
            ("a", num_seq(base.clone())),
            ("b", num_seq(base.iter().map(|v| v * 3.0))),
        ]);
        let parsed = parse(&csv);
        assert!(correlations(&parsed.table, &parsed.summary.numeric_columns).is_empty());
    }

    #[test]
    fn filters_columns_independently() {
        // Column a loses one value to a text cell (11 usable), b keeps
        // all 12; the pair still qualifies and is paired positionally.
        let mut a = num_seq((0..12).map(|i| i as f64));
        a[5] = "n/a".to_string();
        let csv = csv_of(&[
            ("a", a),
            ("b", num_seq((0..12).map(|i| i as f64 * 2.0))),
        ]);
        let parsed = parse(&csv);
        let results = correlations(&parsed.table, &parsed.summary.numeric_columns);
        assert_eq!(results.len(), 1);
        assert!(results[0].correlation > 0.9);
    }

    // ── Trends ───────────────────────────────────────────────────

    #[test]
    fn classifies_directions() {
        let n = 12;
        let csv = csv_of(&[
            ("up", num_seq((0..n).map(|i| i as f64))),
            ("down", num_seq((0..n).map(|i| -(i as f64)))),
            ("flat", num_seq(std::iter::repeat(3.0).take(n))),
        ]);
        let parsed = parse(&csv);
        let results = trends(&parsed.table, &parsed.summary.numeric_columns);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].column, "up");
        assert_eq!(results[0].trend, Trend::Increasing);
        assert_eq!(results[1].trend, Trend::Decreasing);
        assert_eq!(results[2].trend, Trend::Stable);
    }

    #[test]
    fn near_zero_slope_is_stable() {
        // Alternating around a constant: slope well under 0.01.
        let csv = csv_of(&[(
            "v",
            num_seq((0..20).map(|i| if i % 2 == 0 { 5.001 } else { 4.999 })),
        )]);
        let parsed = parse(&csv);
        let results = trends(&parsed.table, &parsed.summary.numeric_columns);
        assert_eq!(results[0].trend, Trend::Stable);
    }

    #[test]
    fn short_columns_are_skipped() {
        let csv = csv_of(&[("v", num_seq((0..10).map(|i| i as f64)))]);
        let parsed = parse(&csv);
        assert!(trends(&parsed.table, &parsed.summary.numeric_columns).is_empty());
    }

    // ── Merged pass ──────────────────────────────────────────────

    #[test]
    fn eleven_row_scenario_from_the_dashboard() {
        let csv = "a,b\n1,2\n2,4\n3,6\n4,8\n5,10\n6,12\n7,14\n8,16\n9,18\n10,20\n11,22\n";
        let parsed = parse(csv);

        assert_eq!(parsed.summary.total_rows, 11);
        assert_eq!(
            parsed.summary.numeric_columns,
            vec!["a".to_string(), "b".to_string()]
        );

        let estimator = ApproximateClusterEstimator::new().seed(Some(7));
        let result = run_analysis(&parsed, &estimator, &NullLogger);

        assert_eq!(result.correlations.len(), 1);
        assert!((result.correlations[0].correlation - 1.0).abs() < 1e-10);
        assert_eq!(result.trends.len(), 2);
        assert!(result
            .trends
            .iter()
            .all(|t| t.trend == Trend::Increasing));
        assert_eq!(result.columns, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(result.table.row_count(), 11);
        assert!(result.statistics.contains_key("a"));
    }

    #[test]
    fn merged_result_serializes_for_export() {
        let csv = "a,b\n1,2\n2,4\n3,6\n4,8\n5,10\n6,12\n7,14\n8,16\n9,18\n10,20\n11,22\n";
        let parsed = parse(csv);
        let estimator = ApproximateClusterEstimator::new().seed(Some(1));
        let result = run_analysis(&parsed, &estimator, &NullLogger);

        let json = serde_json::to_value(&result).expect("serialize analysis result");
        assert_eq!(json["summary"]["totalRows"], 11);
        assert_eq!(json["correlations"][0]["x"], "a");
        assert_eq!(json["trends"][0]["trend"], "increasing");
        assert!(json["clusters"].is_array());
        assert_eq!(json["table"]["rows"][0]["a"], 1.0);
    }
}
