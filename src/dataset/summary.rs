//! The dataset summary pushed into the assistant's instructions.
//!
//! [`format_summary`] is a pure function of the dataset: same dataset in,
//! byte-identical text out. The block leads with the row and column counts,
//! then lists per-column types and non-null counts, the descriptive
//! statistics table, and the first rows as an aligned text table.

use std::fmt::Write;

use super::stats::{ColumnStats, describe};
use super::Dataset;

/// Number of sample rows included in the summary.
pub const SAMPLE_ROWS: usize = 5;

/// Format the full dataset summary text block.
pub fn format_summary(dataset: &Dataset) -> String {
    let mut out = String::new();

    // The leading figures. Writing to a String cannot fail.
    let _ = writeln!(out, "Number of rows: {}", dataset.row_count());
    let _ = writeln!(out, "Number of columns: {}", dataset.column_count());
    out.push('\n');

    out.push_str("Columns:\n");
    for col in &dataset.columns {
        let _ = writeln!(
            out,
            "  {}: {} ({} non-null)",
            col.name,
            col.dtype,
            col.non_null_count()
        );
    }
    out.push('\n');

    out.push_str("Basic statistics:\n");
    out.push_str(&render_stats_table(&describe(dataset)));
    out.push('\n');

    let _ = writeln!(out, "Sample data (first {SAMPLE_ROWS} rows):");
    out.push_str(&render_head_table(dataset, SAMPLE_ROWS));

    out
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// One line per numeric column: count, mean, std, min, quartiles, max.
fn render_stats_table(stats: &[ColumnStats]) -> String {
    if stats.is_empty() {
        return "  (no numeric columns)\n".to_string();
    }

    let name_width = stats
        .iter()
        .map(|s| s.name.len())
        .chain(std::iter::once("column".len()))
        .max()
        .unwrap_or(6);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<name_width$} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    );
    for s in stats {
        let _ = writeln!(
            out,
            "  {:<name_width$} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            s.name,
            s.count,
            fmt_stat(s.mean),
            fmt_stat(s.std),
            fmt_stat(s.min),
            fmt_stat(s.q25),
            fmt_stat(s.median),
            fmt_stat(s.q75),
            fmt_stat(s.max),
        );
    }
    out
}

/// Header plus the first `n` rows, columns padded to a shared width.
fn render_head_table(dataset: &Dataset, n: usize) -> String {
    let header = dataset.header();
    let rows = dataset.head(n);

    // Column width: widest cell (header included) per column.
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            rows.iter()
                .map(|row| row[idx].len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    render_row(&mut out, &header, &widths);
    for row in &rows {
        render_row(&mut out, row, &widths);
    }
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push_str("  ");
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            out.push_str("  ");
        }
        let _ = write!(out, "{:<width$}", cell, width = widths[idx]);
    }
    // No padding after the last cell.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

/// Fixed-precision statistic formatting; `NaN` renders literally.
fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnType, Value};
    use std::path::PathBuf;

    fn sample_dataset() -> Dataset {
        Dataset {
            source: PathBuf::from("fraud.csv"),
            columns: vec![
                Column {
                    name: "amount".to_string(),
                    dtype: ColumnType::Float,
                    values: vec![
                        Value::Float(12.5),
                        Value::Float(80.0),
                        Value::Float(3.99),
                        Value::Float(250.0),
                        Value::Float(7.25),
                    ],
                },
                Column {
                    name: "is_fraud".to_string(),
                    dtype: ColumnType::Bool,
                    values: vec![
                        Value::Bool(false),
                        Value::Bool(false),
                        Value::Bool(false),
                        Value::Bool(true),
                        Value::Bool(false),
                    ],
                },
            ],
        }
    }

    #[test]
    fn summary_leads_with_shape_figures() {
        let summary = format_summary(&sample_dataset());
        assert!(summary.starts_with("Number of rows: 5\nNumber of columns: 2\n"));
    }

    #[test]
    fn summary_is_deterministic() {
        let dataset = sample_dataset();
        assert_eq!(format_summary(&dataset), format_summary(&dataset));
    }

    #[test]
    fn summary_lists_column_types_and_non_null_counts() {
        let summary = format_summary(&sample_dataset());
        assert!(summary.contains("amount: float (5 non-null)"));
        assert!(summary.contains("is_fraud: bool (5 non-null)"));
    }

    #[test]
    fn summary_contains_stats_and_sample_rows() {
        let summary = format_summary(&sample_dataset());
        assert!(summary.contains("Basic statistics:"));
        assert!(summary.contains("Sample data (first 5 rows):"));
        // Head table includes the header and the first row's values.
        assert!(summary.contains("amount"));
        assert!(summary.contains("12.5"));
    }

    #[test]
    fn stats_table_handles_no_numeric_columns() {
        let dataset = Dataset {
            source: PathBuf::from("labels.csv"),
            columns: vec![Column {
                name: "label".to_string(),
                dtype: ColumnType::Text,
                values: vec![Value::Text("a".to_string())],
            }],
        };
        let summary = format_summary(&dataset);
        assert!(summary.contains("(no numeric columns)"));
    }
}
