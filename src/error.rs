use thiserror::Error;

/// Typed failures raised by the table model and the statistics stages.
///
/// Degenerate numeric input (too few samples, zero variance) is not an
/// error: it surfaces as NaN in the computed statistics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    #[error("column '{name}' is not numeric")]
    NonNumericColumn { name: String },

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },
}
