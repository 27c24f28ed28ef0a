use std::io::Write;

use anyhow::{Context, Result};

use super::model::{ColumnType, Table};
use crate::report::{format_correlation, format_sample, format_summary};
use crate::stats::describe::{correlation_matrix, describe};

/// Drop every row with a missing cell in any column. Returns the kept table
/// and the number of rows removed.
pub fn drop_incomplete_rows(table: &Table) -> (Table, usize) {
    let keep: Vec<bool> = (0..table.row_count())
        .map(|i| !table.row_has_missing(i))
        .collect();
    let dropped = keep.iter().filter(|&&k| !k).count();
    (table.retain_rows(&keep), dropped)
}

/// Keep only the columns declared numeric.
pub fn select_numeric(table: &Table) -> Table {
    table.select_type(ColumnType::Numeric)
}

/// Clean `raw` into a complete, all-numeric table and print the inspection
/// summaries (aggregate statistics, leading sample, correlation matrix) to
/// `out`.
pub fn preprocess(raw: &Table, sample_rows: usize, out: &mut dyn Write) -> Result<Table> {
    let (complete, dropped) = drop_incomplete_rows(raw);
    if dropped > 0 {
        log::info!(
            "Dropped {dropped} of {} rows with missing values",
            raw.row_count()
        );
    }

    let numeric = select_numeric(&complete);
    let skipped = complete.column_count() - numeric.column_count();
    if skipped > 0 {
        log::debug!("Skipped {skipped} categorical column(s)");
    }
    if numeric.column_count() == 0 {
        log::warn!("No numeric columns remain after preprocessing");
    }

    write_inspection(&numeric, sample_rows, out).context("writing data summaries")?;
    Ok(numeric)
}

fn write_inspection(table: &Table, sample_rows: usize, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Data Summary:")?;
    writeln!(out, "{}", format_summary(&describe(table)))?;
    writeln!(out)?;
    writeln!(out, "Sample Data:")?;
    writeln!(out, "{}", format_sample(table, sample_rows))?;
    writeln!(out)?;
    writeln!(out, "Correlation Matrix:")?;
    writeln!(out, "{}", format_correlation(&correlation_matrix(table)))
}
