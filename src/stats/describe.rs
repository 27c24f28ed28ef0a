use crate::data::model::{ColumnData, ColumnType, Table};

use super::moments::{mean, sample_std};

/// Aggregate statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summaries for every numeric column, in table order. Categorical
/// columns are skipped.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .filter(|c| c.column_type() == ColumnType::Numeric)
        .map(|c| {
            let mut values = c.present_values().unwrap_or_default();
            values.sort_by(f64::total_cmp);
            ColumnSummary {
                name: c.name.clone(),
                count: values.len(),
                mean: mean(&values),
                std: sample_std(&values),
                min: values.first().copied().unwrap_or(f64::NAN),
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values.last().copied().unwrap_or(f64::NAN),
            }
        })
        .collect()
}

/// Quantile of ascending `sorted` by linear interpolation between the two
/// nearest ranks.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square matrix of pairwise Pearson coefficients between numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// Row-major, `names.len()` x `names.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Pearson correlation over the numeric columns of `table`, using for each
/// pair only the rows where both cells are present. Pairs involving a
/// constant column are NaN.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let columns: Vec<(&str, &[Option<f64>])> = table
        .columns()
        .iter()
        .filter_map(|c| match &c.data {
            ColumnData::Numeric(v) => Some((c.name.as_str(), v.as_slice())),
            ColumnData::Categorical(_) => None,
        })
        .collect();

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .1
                .iter()
                .zip(columns[j].1)
                .filter_map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((*a, *b)),
                    _ => None,
                })
                .unzip();
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        names: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Pearson correlation coefficient of two equal-length samples.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]),
            Column::numeric("y", vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0), Some(10.0)]),
            Column::numeric("z", vec![Some(5.0), Some(4.0), Some(3.0), Some(2.0), Some(1.0)]),
            Column::categorical("s", vec![None, None, None, None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0), 1.0);
        assert_eq!(quantile(&v, 0.5), 2.5);
        assert_eq!(quantile(&v, 0.25), 1.75);
        assert_eq!(quantile(&v, 1.0), 4.0);
        assert_eq!(quantile(&[7.0], 0.3), 7.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn describe_numeric_columns_only() {
        let summaries = describe(&table());
        assert_eq!(summaries.len(), 3);
        let x = &summaries[0];
        assert_eq!(x.name, "x");
        assert_eq!(x.count, 5);
        assert_eq!(x.mean, 3.0);
        assert_eq!(x.min, 1.0);
        assert_eq!(x.median, 3.0);
        assert_eq!(x.q1, 2.0);
        assert_eq!(x.q3, 4.0);
        assert_eq!(x.max, 5.0);
        assert!((x.std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn correlation_signs() {
        let m = correlation_matrix(&table());
        assert_eq!(m.names, vec!["x", "y", "z"]);
        assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((m.get(0, 2) + 1.0).abs() < 1e-12);
        assert_eq!(m.get(1, 2), m.get(2, 1));
    }

    #[test]
    fn constant_column_correlates_as_nan() {
        let t = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0), Some(3.0)]),
            Column::numeric("c", vec![Some(9.0), Some(9.0), Some(9.0)]),
        ])
        .unwrap();
        let m = correlation_matrix(&t);
        assert!(m.get(0, 1).is_nan());
        assert!(m.get(1, 1).is_nan());
    }

    #[test]
    fn pairwise_complete_rows() {
        let t = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), None, Some(3.0), Some(4.0)]),
            Column::numeric("b", vec![Some(1.0), Some(100.0), Some(3.0), Some(4.0)]),
        ])
        .unwrap();
        let m = correlation_matrix(&t);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
    }
}
