//! Approximate cluster estimation.
//!
//! This is a randomized placeholder, not a converging algorithm: the
//! dashboard's clustering panel only needs a plausible group count,
//! rough sizes and centroid coordinates to render. Cluster sizes are
//! perturbed by a random offset and may not sum to the row count;
//! centroid coordinates are drawn uniformly from [0, 100) independent
//! of the actual data distribution. Both properties are part of the
//! contract — swapping in real k-means would be a behavior change, not
//! a fix.
//!
//! # Example
//!
//! ```
//! use datasight::clustering::ApproximateClusterEstimator;
//! use datasight::logger::NullLogger;
//! use datasight::parser::CsvParser;
//!
//! let mut csv = String::from("a,b\n");
//! for i in 0..40 {
//!     csv.push_str(&format!("{i},{}\n", i * 2));
//! }
//! let parsed = CsvParser::new().parse_str(&csv, &NullLogger).unwrap();
//!
//! let estimator = ApproximateClusterEstimator::new().seed(Some(42));
//! let clusters = estimator.estimate(&parsed.table, &parsed.summary.numeric_columns);
//!
//! // k = min(4, floor(sqrt(40 / 2))) = 4
//! assert_eq!(clusters.len(), 4);
//! assert_eq!(clusters[0].centroid.len(), 2);
//! ```

use crate::table::Table;
use serde::Serialize;

/// Hard ceiling on the estimated cluster count.
pub const MAX_CLUSTERS: usize = 4;

/// One estimated cluster.
///
/// `size` is approximate by design: the per-cluster offsets are random
/// and the sizes are not corrected to sum to the row count. Small
/// tables can even produce a negative size, matching the dashboard's
/// accepted behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterResult {
    /// 0-based cluster id.
    pub cluster: usize,
    /// Approximate member count.
    pub size: i64,
    /// One coordinate per numeric column, uniform in [0, 100).
    pub centroid: Vec<f64>,
}

/// Randomized placeholder clustering strategy.
///
/// With `seed: None` (the default) every run draws fresh sizes and
/// centroids; pin a seed to make a run reproducible in tests.
#[derive(Debug, Clone, Default)]
pub struct ApproximateClusterEstimator {
    seed: Option<u64>,
}

impl ApproximateClusterEstimator {
    /// Creates an estimator with time-based seeding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the random seed (`None` for time-based).
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Estimates cluster placeholders for the table.
    ///
    /// Requires at least 2 numeric columns, else returns an empty
    /// sequence. k = min([`MAX_CLUSTERS`], floor(sqrt(rows / 2)));
    /// each cluster gets size floor(rows / k) plus a uniform offset in
    /// [-10, +10] and a centroid coordinate per numeric column.
    pub fn estimate(&self, table: &Table, numeric_columns: &[String]) -> Vec<ClusterResult> {
        if numeric_columns.len() < 2 {
            return Vec::new();
        }

        let rows = table.row_count();
        let k = MAX_CLUSTERS.min(((rows as f64 / 2.0).sqrt()).floor() as usize);
        if k == 0 {
            return Vec::new();
        }

        // Simple LCG-based random number generator so tests can pin a seed
        let mut rng_state = self.seed.unwrap_or_else(time_seed);
        let mut next_rand = || -> f64 {
            rng_state = rng_state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng_state >> 33) as f64 / (1u64 << 31) as f64
        };

        let base_size = (rows / k) as i64;
        (0..k)
            .map(|cluster| {
                let offset = (next_rand() * 21.0) as i64 - 10;
                let centroid = numeric_columns
                    .iter()
                    .map(|_| next_rand() * 100.0)
                    .collect();
                ClusterResult {
                    cluster,
                    size: base_size + offset,
                    centroid,
                }
            })
            .collect()
    }
}

/// Derives a seed from the wall clock for unseeded runs.
fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use crate::parser::CsvParser;

    fn two_column_table(rows: usize) -> crate::parser::ParsedData {
        let mut csv = String::from("a,b\n");
        for i in 0..rows {
            csv.push_str(&format!("{i},{}\n", i * 3));
        }
        CsvParser::new().parse_str(&csv, &NullLogger).unwrap()
    }

    #[test]
    fn requires_two_numeric_columns() {
        let mut csv = String::from("n,word\n");
        for i in 0..40 {
            csv.push_str(&format!("{i},w{i}\n"));
        }
        let parsed = CsvParser::new().parse_str(&csv, &NullLogger).unwrap();
        let estimator = ApproximateClusterEstimator::new().seed(Some(1));
        assert!(estimator
            .estimate(&parsed.table, &parsed.summary.numeric_columns)
            .is_empty());
    }

    #[test]
    fn cluster_count_follows_row_count() {
        let estimator = ApproximateClusterEstimator::new().seed(Some(1));

        // floor(sqrt(40 / 2)) = 4, capped at 4
        let parsed = two_column_table(40);
        assert_eq!(
            estimator
                .estimate(&parsed.table, &parsed.summary.numeric_columns)
                .len(),
            4
        );

        // floor(sqrt(18 / 2)) = 3
        let parsed = two_column_table(18);
        assert_eq!(
            estimator
                .estimate(&parsed.table, &parsed.summary.numeric_columns)
                .len(),
            3
        );

        // floor(sqrt(200 / 2)) = 10, capped at MAX_CLUSTERS
        let parsed = two_column_table(200);
        assert_eq!(
            estimator
                .estimate(&parsed.table, &parsed.summary.numeric_columns)
                .len(),
            MAX_CLUSTERS
        );
    }

    #[test]
    fn tiny_table_yields_no_clusters() {
        // floor(sqrt(1 / 2)) = 0
        let parsed = two_column_table(1);
        let estimator = ApproximateClusterEstimator::new().seed(Some(1));
        assert!(estimator
            .estimate(&parsed.table, &parsed.summary.numeric_columns)
            .is_empty());
    }

    #[test]
    fn shape_of_estimated_clusters() {
        let parsed = two_column_table(50);
        let estimator = ApproximateClusterEstimator::new().seed(Some(9));
        let clusters = estimator.estimate(&parsed.table, &parsed.summary.numeric_columns);

        let base = (50 / clusters.len()) as i64;
        for (i, c) in clusters.iter().enumerate() {
            assert_eq!(c.cluster, i);
            assert!(c.size >= base - 10 && c.size <= base + 10);
            assert_eq!(c.centroid.len(), 2);
            for &coord in &c.centroid {
                assert!((0.0..100.0).contains(&coord));
            }
        }
    }

    #[test]
    fn pinned_seed_is_reproducible() {
        let parsed = two_column_table(50);
        let estimator = ApproximateClusterEstimator::new().seed(Some(1234));
        let first = estimator.estimate(&parsed.table, &parsed.summary.numeric_columns);
        let second = estimator.estimate(&parsed.table, &parsed.summary.numeric_columns);
        assert_eq!(first, second);
    }

    #[test]
    fn seeds_differ() {
        let parsed = two_column_table(50);
        let a = ApproximateClusterEstimator::new()
            .seed(Some(1))
            .estimate(&parsed.table, &parsed.summary.numeric_columns);
        let b = ApproximateClusterEstimator::new()
            .seed(Some(2))
            .estimate(&parsed.table, &parsed.summary.numeric_columns);
        assert_ne!(a, b);
    }
}
