//! Chart rendering behind a capability trait.
//!
//! The pipeline only knows [`PlotRenderer`]; [`bitmap::BitmapRenderer`] is the
//! PNG implementation. Chart data (scatter points, histogram bins) is
//! prepared by pure functions here so it can be checked without a backend.

pub mod bitmap;
pub mod color;

use std::path::PathBuf;

use anyhow::Result;

use crate::data::model::{Table, Value};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Chart requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum PlotSpec {
    /// Scatter of `y` against `x`.
    Relational {
        x: String,
        y: String,
        title: String,
        file: PathBuf,
    },
    /// Equal-width histogram of one column.
    Categorical {
        column: String,
        bins: usize,
        title: String,
        file: PathBuf,
    },
    /// Annotated correlation heatmap over every numeric column.
    Statistical { title: String, file: PathBuf },
}

impl PlotSpec {
    pub fn file(&self) -> &PathBuf {
        match self {
            PlotSpec::Relational { file, .. }
            | PlotSpec::Categorical { file, .. }
            | PlotSpec::Statistical { file, .. } => file,
        }
    }
}

/// Something that turns a table and a chart request into an image file.
pub trait PlotRenderer {
    /// Render `spec` from `table` and return the path written.
    fn render(&mut self, table: &Table, spec: &PlotSpec) -> Result<PathBuf>;
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// `(x, y)` pairs for rows where both cells are present.
pub fn scatter_points(table: &Table, x: &str, y: &str) -> Result<Vec<(f64, f64)>, AnalysisError> {
    let xc = table.column(x)?;
    let yc = table.column(y)?;
    // Type check both before pairing rows.
    xc.present_values()?;
    yc.present_values()?;

    Ok((0..table.row_count())
        .filter_map(|i| match (xc.value(i), yc.value(i)) {
            (Value::Number(a), Value::Number(b)) => Some((a, b)),
            _ => None,
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// Each bin is half-open except the last, which also takes `max`. A zero
/// range is widened to `[v - 0.5, v + 0.5]`; no values at all gives bins over
/// `[0, 1]`. Non-finite values are ignored.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if finite.is_empty() {
        (lo, hi) = (0.0, 1.0);
    } else if lo == hi {
        (lo, hi) = (lo - 0.5, hi + 0.5);
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}
