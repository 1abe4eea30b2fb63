//! Dataset loading and in-memory representation.
//!
//! A [`Dataset`] is an ordered collection of named columns, each holding
//! scalar values of one inferred type. It is loaded once at process start
//! from the first `*.csv` file in the configured data directory and is
//! read-only for the rest of the session.
//!
//! Loading is strict: a missing directory, a directory without a CSV file,
//! malformed CSV, or a file with zero data rows all fail with a
//! [`LoadError`]. Load failures are fatal to the session — the caller must
//! not configure the assistant or serve chat without a dataset.

pub mod stats;
pub mod summary;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while locating or parsing the dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset directory not found: {0}")]
    MissingDir(PathBuf),
    #[error("no CSV file found in {0}")]
    NoCsvFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("the loaded dataset is empty")]
    Empty,
}

// ---------------------------------------------------------------------------
// Values and columns
// ---------------------------------------------------------------------------

/// A single cell value. Empty CSV fields become [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Null => Ok(()),
        }
    }
}

/// The inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl ColumnType {
    /// Whether descriptive statistics apply to this column.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// A named column of homogeneously typed values.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<Value>,
}

impl Column {
    /// Number of non-null cells.
    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| **v != Value::Null).count()
    }

    /// Non-null numeric cell values widened to `f64`.
    ///
    /// Empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|v| match v {
                Value::Int(n) => Some(*n as f64),
                Value::Float(x) => Some(*x),
                _ => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The loaded tabular dataset. Columns share a common length.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File the dataset was loaded from (for display and health checks).
    pub source: PathBuf,
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Render the first `n` rows as strings, one `Vec<String>` per row.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        let limit = n.min(self.row_count());
        (0..limit)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| col.values[row].to_string())
                    .collect()
            })
            .collect()
    }

    /// Column header names in order.
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the dataset from a directory: the first `*.csv` file found
/// (lexicographic order, so the choice is stable across runs).
pub fn load_dir(dir: &Path) -> Result<Dataset, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDir(dir.to_path_buf()));
    }

    let mut csv_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| LoadError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    csv_files.sort();

    let path = csv_files
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::NoCsvFile(dir.to_path_buf()))?;

    load_csv(&path)
}

/// Load and type-infer a single CSV file. The first record is the header.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); header.len()];
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        for (idx, raw) in raw_columns.iter_mut().enumerate() {
            raw.push(record.get(idx).unwrap_or("").trim().to_string());
        }
    }

    if header.is_empty() || raw_columns.first().is_none_or(|c| c.is_empty()) {
        return Err(LoadError::Empty);
    }

    let columns = header
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| build_column(name, &raw))
        .collect();

    Ok(Dataset {
        source: path.to_path_buf(),
        columns,
    })
}

/// Infer a column type from its raw fields and parse the cells.
///
/// Widening order: int → float → bool → text. A column is int only if every
/// non-empty field parses as `i64`; float if every field parses as `f64`;
/// bool if every field is a true/false literal. Anything else is text.
fn build_column(name: String, raw: &[String]) -> Column {
    let non_empty: Vec<&str> = raw.iter().filter(|s| !s.is_empty()).map(|s| s.as_str()).collect();

    let dtype = if non_empty.is_empty() {
        ColumnType::Text
    } else if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        ColumnType::Int
    } else if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if non_empty.iter().all(|s| parse_bool(s).is_some()) {
        ColumnType::Bool
    } else {
        ColumnType::Text
    };

    let values = raw
        .iter()
        .map(|s| {
            if s.is_empty() {
                return Value::Null;
            }
            match dtype {
                ColumnType::Int => Value::Int(s.parse().unwrap_or_default()),
                ColumnType::Float => Value::Float(s.parse().unwrap_or_default()),
                ColumnType::Bool => Value::Bool(parse_bool(s).unwrap_or_default()),
                ColumnType::Text => Value::Text(s.clone()),
            }
        })
        .collect();

    Column { name, dtype, values }
}

/// Parse a boolean literal (`true`/`false`, any case).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn column_from(raw: &[&str]) -> Column {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        build_column("c".to_string(), &raw)
    }

    #[test]
    fn infers_int_column() {
        let col = column_from(&["1", "2", "-3"]);
        assert_eq!(col.dtype, ColumnType::Int);
        assert_eq!(col.values[2], Value::Int(-3));
    }

    #[test]
    fn infers_float_when_any_field_is_fractional() {
        let col = column_from(&["1", "2.5", "3"]);
        assert_eq!(col.dtype, ColumnType::Float);
        assert_eq!(col.values[0], Value::Float(1.0));
    }

    #[test]
    fn infers_bool_column() {
        let col = column_from(&["true", "False", "TRUE"]);
        assert_eq!(col.dtype, ColumnType::Bool);
        assert_eq!(col.values[1], Value::Bool(false));
    }

    #[test]
    fn mixed_fields_fall_back_to_text() {
        let col = column_from(&["1", "abc"]);
        assert_eq!(col.dtype, ColumnType::Text);
    }

    #[test]
    fn empty_fields_become_null() {
        let col = column_from(&["1", "", "3"]);
        assert_eq!(col.dtype, ColumnType::Int);
        assert_eq!(col.values[1], Value::Null);
        assert_eq!(col.non_null_count(), 2);
    }

    #[test]
    fn numeric_values_skip_nulls_and_widen_ints() {
        let col = column_from(&["1", "", "3"]);
        assert_eq!(col.numeric_values(), vec![1.0, 3.0]);
    }

    #[test]
    fn head_renders_rows_in_order() {
        let dataset = Dataset {
            source: PathBuf::from("test.csv"),
            columns: vec![
                column_from(&["1", "2", "3"]),
                column_from(&["true", "false", "true"]),
            ],
        };
        let head = dataset.head(2);
        assert_eq!(head, vec![vec!["1", "true"], vec!["2", "false"]]);
    }
}
