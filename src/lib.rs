//! # datasight
//!
//! Tabular analysis engine behind a CSV insight dashboard.
//!
//! datasight turns raw comma-delimited text into a typed table and a
//! merged analysis result the presentation layer can render and
//! export. It is a synchronous, pure computation: no I/O, no network,
//! no persistence. Anomalies in the data degrade with a log entry;
//! only an empty input or a fully invalid one is fatal.
//!
//! ## Modules
//!
//! - [`table`] — Row-major table model (Value, Row, Table, ColumnSummary)
//! - [`parser`] — CSV ingestion, per-column type inference, row-cap truncation
//! - [`statistics`] — Per-column mean/median/std-dev/min/max/missing
//! - [`analysis`] — Pairwise Pearson correlation, per-column trend detection, merged analysis pass
//! - [`clustering`] — Approximate (randomized placeholder) cluster estimation
//! - [`logger`] — Injectable logging capability with a bounded ring-buffer implementation
//! - [`config`] — Row and size limits applied around ingestion
//! - [`retry`] — Typed-outcome backoff contract for the external narration service
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use datasight::analysis::run_analysis;
//! use datasight::clustering::ApproximateClusterEstimator;
//! use datasight::logger::RingBufferLogger;
//! use datasight::parser::CsvParser;
//!
//! let csv = "a,b\n1,2\n2,4\n3,6\n4,8\n5,10\n6,12\n7,14\n8,16\n9,18\n10,20\n11,22\n";
//! let logger = RingBufferLogger::default();
//!
//! let parsed = CsvParser::new().parse_str(csv, &logger).unwrap();
//! assert_eq!(parsed.summary.total_rows, 11);
//! assert_eq!(parsed.summary.numeric_columns.len(), 2);
//!
//! let estimator = ApproximateClusterEstimator::new();
//! let result = run_analysis(&parsed, &estimator, &logger);
//!
//! assert_eq!(result.correlations.len(), 1);
//! assert!((result.correlations[0].correlation - 1.0).abs() < 1e-10);
//! ```

pub mod analysis;
pub mod clustering;
pub mod config;
pub mod error;
pub mod logger;
pub mod parser;
pub mod retry;
pub mod statistics;
pub mod table;
