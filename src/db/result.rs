//! Generic tabular query output. Every query-layer function returns a
//! [`QueryResult`]: an immutable, ordered set of homogeneous rows whose
//! column set is fixed by the query identity, never by its parameters.

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// One cell of a result row. Untagged so payloads serialize as plain JSON
/// scalars (`null`, number, string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            Scalar::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Rendering used for axis labels, table cells and CSV fields.
    pub fn display(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Real(f) => {
                if f.fract() == 0.0 {
                    format!("{:.0}", f)
                } else {
                    format!("{:.2}", f)
                }
            }
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl From<ValueRef<'_>> for Scalar {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Scalar::Null,
            ValueRef::Integer(i) => Scalar::Integer(i),
            ValueRef::Real(f) => Scalar::Real(f),
            ValueRef::Text(t) => Scalar::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => Scalar::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl QueryResult {
    pub fn empty(columns: &[&str]) -> Self {
        QueryResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell lookup by column name; `Scalar::Null` for unknown columns or
    /// out-of-range rows.
    pub fn cell(&self, row: usize, column: &str) -> Scalar {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(r), Some(c)) => r.get(c).cloned().unwrap_or(Scalar::Null),
            _ => Scalar::Null,
        }
    }

    /// First-row numeric scalar, the common shape for single-row summary
    /// queries. 0.0 when absent or null (guards the "empty range" case).
    pub fn scalar_f64(&self, column: &str) -> f64 {
        self.cell(0, column).as_f64().unwrap_or(0.0)
    }

    pub fn scalar_i64(&self, column: &str) -> i64 {
        self.cell(0, column).as_i64().unwrap_or(0)
    }

    /// Entire column rendered as display labels.
    pub fn labels(&self, column: &str) -> Vec<String> {
        match self.column_index(column) {
            Some(c) => self.rows.iter().map(|r| r[c].display()).collect(),
            None => Vec::new(),
        }
    }

    /// Entire column as f64, nulls and non-numerics coerced to 0.0.
    pub fn numbers(&self, column: &str) -> Vec<f64> {
        match self.column_index(column) {
            Some(c) => self
                .rows
                .iter()
                .map(|r| r[c].as_f64().unwrap_or(0.0))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Runs one parametrized statement and shapes the rows into a
/// [`QueryResult`]. Column names come from the prepared statement, so the
/// result schema is stable even for zero-row outputs.
pub fn run_query(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> AppResult<QueryResult> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut raw = stmt.query(params)?;
    while let Some(row) = raw.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            cells.push(Scalar::from(row.get_ref(i)?));
        }
        rows.push(cells);
    }

    Ok(QueryResult { columns, rows })
}
