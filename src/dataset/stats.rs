//! Descriptive statistics for numeric columns.
//!
//! Mirrors the classic describe table: count, mean, sample standard
//! deviation, min, quartiles, max. Quantiles use linear interpolation
//! between the two nearest order statistics.

use serde::Serialize;

use super::Dataset;

/// Descriptive statistics for one numeric column.
///
/// `std` is the sample standard deviation (n − 1 denominator) and is `NaN`
/// for a single observation.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Compute statistics for every numeric column, in dataset column order.
///
/// Non-numeric columns and numeric columns with no non-null values are
/// skipped.
pub fn describe(dataset: &Dataset) -> Vec<ColumnStats> {
    dataset
        .columns
        .iter()
        .filter(|col| col.dtype.is_numeric())
        .filter_map(|col| {
            let values = col.numeric_values();
            if values.is_empty() {
                return None;
            }
            Some(column_stats(&col.name, &values))
        })
        .collect()
}

fn column_stats(name: &str, values: &[f64]) -> ColumnStats {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    ColumnStats {
        name: name.to_string(),
        count: sorted.len(),
        mean: mean(&sorted),
        std: sample_std(&sorted),
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation. `NaN` when fewer than two observations.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Quantile of a sorted slice with linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnType, Value};
    use std::path::PathBuf;

    fn float_column(name: &str, values: &[f64]) -> Column {
        Column {
            name: name.to_string(),
            dtype: ColumnType::Float,
            values: values.iter().map(|v| Value::Float(*v)).collect(),
        }
    }

    #[test]
    fn mean_and_std_of_known_series() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        // Sample variance of this series is 32/7.
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((sample_std(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn std_of_single_value_is_nan() {
        assert!(sample_std(&[3.0]).is_nan());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&sorted, 0.75) - 3.25).abs() < 1e-12);
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn describe_skips_non_numeric_columns() {
        let dataset = crate::dataset::Dataset {
            source: PathBuf::from("test.csv"),
            columns: vec![
                float_column("amount", &[1.0, 2.0, 3.0]),
                Column {
                    name: "is_fraud".to_string(),
                    dtype: ColumnType::Bool,
                    values: vec![Value::Bool(false), Value::Bool(true), Value::Bool(false)],
                },
            ],
        };

        let stats = describe(&dataset);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "amount");
        assert_eq!(stats[0].count, 3);
        assert!((stats[0].median - 2.0).abs() < 1e-12);
    }

    #[test]
    fn describe_ignores_nulls() {
        let mut col = float_column("amount", &[1.0, 3.0]);
        col.values.push(Value::Null);
        let dataset = crate::dataset::Dataset {
            source: PathBuf::from("test.csv"),
            columns: vec![col],
        };

        let stats = describe(&dataset);
        assert_eq!(stats[0].count, 2);
        assert!((stats[0].mean - 2.0).abs() < 1e-12);
    }
}
