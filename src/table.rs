//! Row-major table model for parsed CSV data.
//!
//! A [`Table`] is an ordered sequence of [`Row`]s sharing one fixed,
//! ordered list of column names. Values are typed per field at parse
//! time: a field that parses as a numeric literal is stored as
//! [`Value::Number`], everything else as [`Value::Text`]. Every row
//! holds exactly one value per column, in column order; rows that
//! cannot satisfy this are dropped at construction, never coerced.
//!
//! [`ColumnSummary`] records the numeric/categorical classification
//! computed once after ingestion. Tables serialize with rows rendered
//! as name→value maps, which is the shape the dashboard and export
//! collaborators consume.
//!
//! # Example
//!
//! ```
//! use datasight::table::{Row, Table, Value};
//!
//! let table = Table::new(
//!     vec!["a".into(), "b".into()],
//!     vec![
//!         Row::new(vec![Value::Number(1.0), Value::Text("x".into())]),
//!         Row::new(vec![Value::Number(2.0), Value::Text("y".into())]),
//!     ],
//! );
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.value(1, "a"), Some(&Value::Number(2.0)));
//! ```

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

// ── Value ─────────────────────────────────────────────────────────────

/// A single typed cell: numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Returns the numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Returns the numeric payload if it is a finite number.
    ///
    /// Non-finite values (`inf`, `NaN` from exotic literals) count as
    /// missing for every analysis component.
    pub fn as_finite(&self) -> Option<f64> {
        self.as_number().filter(|v| v.is_finite())
    }

    /// Returns `true` for [`Value::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

// ── Row ───────────────────────────────────────────────────────────────

/// One record; values positionally aligned with the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from column-ordered values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns the value at column position `idx`.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Number of values in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

// ── Table ─────────────────────────────────────────────────────────────

/// Ordered rows under one fixed, ordered column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a table, dropping any row whose value count does not
    /// match the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let n_cols = columns.len();
        let rows = rows.into_iter().filter(|r| r.len() == n_cols).collect();
        Self { columns, rows }
    }

    /// Column names, in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Retained rows, in input order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of retained rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of `name` in the column list.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (`row_idx`, `name`), if both exist.
    pub fn value(&self, row_idx: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row_idx)?.get(col)
    }

    /// Finite numeric values of `name`, in row order.
    ///
    /// Text values, non-finite numbers and unknown columns contribute
    /// nothing; the caller sees only usable data points.
    pub fn finite_values(&self, name: &str) -> Vec<f64> {
        let Some(col) = self.column_index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|r| r.get(col).and_then(Value::as_finite))
            .collect()
    }

    /// Keeps only the first `n` rows. Used by the row-cap step; type
    /// classification is never recomputed afterwards.
    pub(crate) fn truncate_rows(&mut self, n: usize) {
        self.rows.truncate(n);
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct RowAsMap<'a> {
            columns: &'a [String],
            row: &'a Row,
        }

        impl Serialize for RowAsMap<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                for (name, value) in self.columns.iter().zip(self.row.values()) {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        struct RowsAsSeq<'a>(&'a Table);

        impl Serialize for RowsAsSeq<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
                for row in &self.0.rows {
                    seq.serialize_element(&RowAsMap {
                        columns: &self.0.columns,
                        row,
                    })?;
                }
                seq.end()
            }
        }

        let mut st = serializer.serialize_struct("Table", 2)?;
        st.serialize_field("columns", &self.columns)?;
        st.serialize_field("rows", &RowsAsSeq(self))?;
        st.end()
    }
}

// ── Column summary ────────────────────────────────────────────────────

/// Classification of the table's columns, computed once after
/// ingestion.
///
/// `numeric_columns` and `categorical_columns` partition the column
/// list: together they cover every column and they never overlap. A
/// downstream row-cap step recomputes `total_rows` but leaves the
/// classification untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    /// Rows retained after validation (and after any truncation).
    pub total_rows: usize,
    /// Columns in the header.
    pub total_columns: usize,
    /// Columns classified numeric, in header order.
    pub numeric_columns: Vec<String>,
    /// Columns classified categorical, in header order.
    pub categorical_columns: Vec<String>,
}
