//! Error types for datasight.

use thiserror::Error;

/// Fatal ingestion errors.
///
/// These are the only two unrecoverable conditions in the engine; every
/// other anomaly (malformed rows, non-numeric values, thin columns)
/// degrades silently with a log entry instead of failing the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input had fewer than a header line plus one data line.
    #[error("CSV must have at least a header and one data row (got {lines} lines)")]
    EmptyInput { lines: usize },

    /// Every data line was discarded by column-count validation.
    #[error("no valid data rows found in the CSV input")]
    NoValidRows,
}
