//! Engine limits and retry defaults.
//!
//! [`Limits`] carries the caps the host application applies around
//! ingestion: the byte ceiling the upload layer enforces before text
//! ever reaches the parser, and the row caps the truncation step uses
//! after parsing. The core itself only consumes `max_rows` and
//! `sample_size`; `max_file_size` is held here so the host reads one
//! config object.

use serde::{Deserialize, Serialize};

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default row count above which truncation kicks in.
pub const DEFAULT_MAX_ROWS: usize = 50_000;

/// Default row count kept after truncation.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Size and row caps applied around ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    /// Byte ceiling enforced by the upload collaborator, not the parser.
    pub max_file_size: u64,
    /// Row-count ceiling after which the table is truncated.
    pub max_rows: usize,
    /// Target row count after truncation.
    pub sample_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_rows: DEFAULT_MAX_ROWS,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Limits {
    /// Creates limits with the default caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the upload byte ceiling.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Sets the row-count ceiling.
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }

    /// Sets the post-truncation row count.
    pub fn sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let limits = Limits::default();
        assert_eq!(limits.max_file_size, 10 * 1024 * 1024);
        assert_eq!(limits.max_rows, 50_000);
        assert_eq!(limits.sample_size, 1000);
    }

    #[test]
    fn builder_overrides() {
        let limits = Limits::new().max_rows(100).sample_size(10);
        assert_eq!(limits.max_rows, 100);
        assert_eq!(limits.sample_size, 10);
        assert_eq!(limits.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn serde_round_trip_camel_case() {
        let json = r#"{"maxFileSize":1024,"maxRows":50,"sampleSize":5}"#;
        let limits: Limits = serde_json::from_str(json).expect("valid limits json");
        assert_eq!(limits.max_rows, 50);
        assert_eq!(serde_json::to_string(&limits).expect("serialize"), json);
    }
}
