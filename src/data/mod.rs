//! Data layer: core types, loading, and preprocessing.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table (column types fixed here)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   Table   │  Vec<Column>, equal lengths, unique names
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ preprocess  │  drop incomplete rows → keep numeric columns
//!   └────────────┘
//! ```

pub mod loader;
pub mod model;
pub mod preprocess;
