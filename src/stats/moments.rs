use crate::data::model::Table;
use crate::error::AnalysisError;

/// The four descriptive statistics of one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentSet {
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator).
    pub stddev: f64,
    /// Biased Fisher-Pearson coefficient g1 = m3 / m2^1.5.
    pub skewness: f64,
    /// m4 / m2^2 − 3, so a normal distribution scores 0.
    pub excess_kurtosis: f64,
}

/// Compute the moments of `attribute` over the present values of that column.
///
/// Fails only when the column is absent or categorical. Too few values or a
/// zero variance yield NaN fields.
pub fn compute_moments(table: &Table, attribute: &str) -> Result<MomentSet, AnalysisError> {
    let values = table.column(attribute)?.present_values()?;
    Ok(moments_of(&values))
}

pub fn moments_of(values: &[f64]) -> MomentSet {
    MomentSet {
        mean: mean(values),
        stddev: sample_std(values),
        skewness: skewness(values),
        excess_kurtosis: excess_kurtosis(values),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with one degree of freedom removed. NaN below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// k-th population central moment, `sum((x - mean)^k) / n`.
fn central_moment(values: &[f64], m: f64, k: i32) -> f64 {
    values.iter().map(|v| (v - m).powi(k)).sum::<f64>() / values.len() as f64
}

pub fn skewness(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let m2 = central_moment(values, m, 2);
    let m3 = central_moment(values, m, 3);
    m3 / m2.powf(1.5)
}

pub fn excess_kurtosis(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let m2 = central_moment(values, m, 2);
    let m4 = central_moment(values, m, 4);
    m4 / (m2 * m2) - 3.0
}
