use std::fmt;
use std::io::{self, Write};

use crate::data::model::Table;
use crate::stats::describe::{ColumnSummary, CorrelationMatrix};
use crate::stats::moments::MomentSet;
use crate::stats::shape::ShapeLabel;

// ---------------------------------------------------------------------------
// Moment report
// ---------------------------------------------------------------------------

/// Human-readable account of one attribute's moments and shape.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub attribute: &'a str,
    pub moments: &'a MomentSet,
    pub shape: ShapeLabel,
}

impl<'a> Report<'a> {
    pub fn new(attribute: &'a str, moments: &'a MomentSet) -> Self {
        Report {
            attribute,
            moments,
            shape: ShapeLabel::of(moments),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.moments;
        writeln!(f, "For the attribute {}:", self.attribute)?;
        writeln!(
            f,
            "Mean = {:.2}, Standard Deviation = {:.2}, Skewness = {:.2}, and Excess Kurtosis = {:.2}.",
            m.mean, m.stddev, m.skewness, m.excess_kurtosis
        )?;
        write!(
            f,
            "The data was {} and {}.",
            self.shape.skew, self.shape.kurtosis
        )
    }
}

/// Write the report for `attribute`, preceded by a blank line.
pub fn write_report(out: &mut dyn Write, attribute: &str, moments: &MomentSet) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", Report::new(attribute, moments))
}

// ---------------------------------------------------------------------------
// Plain-text grids for the inspection summaries
// ---------------------------------------------------------------------------

/// A header row plus labelled rows, rendered with right-aligned columns.
struct TextGrid {
    header: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_w = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|(_, cells)| cells.get(i).map(String::len))
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_w$}", "")?;
        for (h, w) in self.header.iter().zip(&widths) {
            write!(f, "  {h:>w$}")?;
        }
        for (label, cells) in &self.rows {
            writeln!(f)?;
            write!(f, "{label:<label_w$}")?;
            for (c, w) in cells.iter().zip(&widths) {
                write!(f, "  {c:>w$}")?;
            }
        }
        Ok(())
    }
}

fn fixed(v: f64) -> String {
    format!("{v:.6}")
}

/// `describe`-style block: one row per statistic, one column per attribute.
pub fn format_summary(summaries: &[ColumnSummary]) -> String {
    type Pick = fn(&ColumnSummary) -> String;
    let stats: [(&str, Pick); 8] = [
        ("count", |s: &ColumnSummary| fixed(s.count as f64)),
        ("mean", |s: &ColumnSummary| fixed(s.mean)),
        ("std", |s: &ColumnSummary| fixed(s.std)),
        ("min", |s: &ColumnSummary| fixed(s.min)),
        ("25%", |s: &ColumnSummary| fixed(s.q1)),
        ("50%", |s: &ColumnSummary| fixed(s.median)),
        ("75%", |s: &ColumnSummary| fixed(s.q3)),
        ("max", |s: &ColumnSummary| fixed(s.max)),
    ];
    TextGrid {
        header: summaries.iter().map(|s| s.name.clone()).collect(),
        rows: stats
            .iter()
            .map(|(label, pick)| (label.to_string(), summaries.iter().map(*pick).collect()))
            .collect(),
    }
    .to_string()
}

/// The first `n` rows, labelled by position.
pub fn format_sample(table: &Table, n: usize) -> String {
    TextGrid {
        header: table.column_names().iter().map(|s| s.to_string()).collect(),
        rows: (0..n.min(table.row_count()))
            .map(|i| {
                let cells = table.row(i).iter().map(|v| v.to_string()).collect();
                (i.to_string(), cells)
            })
            .collect(),
    }
    .to_string()
}

pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    TextGrid {
        header: matrix.names.clone(),
        rows: matrix
            .names
            .iter()
            .zip(&matrix.values)
            .map(|(name, row)| (name.clone(), row.iter().map(|&r| fixed(r)).collect()))
            .collect(),
    }
    .to_string()
}
