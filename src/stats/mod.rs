//! Statistics layer: scalar moments, shape labels and table summaries.
//!
//! ```text
//!   numeric column ──► moments ──► MomentSet ──► shape ──► ShapeLabel
//!   numeric table  ──► describe ──► ColumnSummary / CorrelationMatrix
//! ```

pub mod describe;
pub mod moments;
pub mod shape;
