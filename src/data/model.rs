use std::collections::BTreeSet;
use std::fmt;

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// ColumnType – the declared semantic type of a column
// ---------------------------------------------------------------------------

/// Declared semantic type, fixed once when the table is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

// ---------------------------------------------------------------------------
// Value – a single cell, used when viewing the table row-wise
// ---------------------------------------------------------------------------

/// A borrowed view of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl Value<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "NaN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed sequence of cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self.data {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row`. A NaN stored in a numeric column reads as missing.
    pub fn value(&self, row: usize) -> Value<'_> {
        match &self.data {
            ColumnData::Numeric(v) => match v.get(row).copied().flatten() {
                Some(x) if !x.is_nan() => Value::Number(x),
                _ => Value::Missing,
            },
            ColumnData::Categorical(v) => match v.get(row).and_then(|s| s.as_deref()) {
                Some(s) => Value::Text(s),
                None => Value::Missing,
            },
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        self.value(row).is_missing()
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&r| self.is_missing(r)).count()
    }

    /// The non-missing numeric values, or an error for categorical columns.
    pub fn present_values(&self) -> Result<Vec<f64>, AnalysisError> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v
                .iter()
                .flatten()
                .copied()
                .filter(|x| !x.is_nan())
                .collect()),
            ColumnData::Categorical(_) => Err(AnalysisError::NonNumericColumn {
                name: self.name.clone(),
            }),
        }
    }

    /// Copy of this column keeping only the rows whose flag is `true`.
    fn retain_rows(&self, keep: &[bool]) -> Column {
        fn pick<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| v.clone())
                .collect()
        }
        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(pick(v, keep)),
            ColumnData::Categorical(v) => ColumnData::Categorical(pick(v, keep)),
        };
        Column {
            name: self.name.clone(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered collection of equal-length columns
// ---------------------------------------------------------------------------

/// Column-major table. Rows are aligned by position across columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, checking that every column has the same length and
    /// that names are unique.
    pub fn new(columns: Vec<Column>) -> Result<Self, AnalysisError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = BTreeSet::new();
        for col in &columns {
            if col.len() != row_count {
                return Err(AnalysisError::LengthMismatch {
                    column: col.name.clone(),
                    expected: row_count,
                    actual: col.len(),
                });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(AnalysisError::DuplicateColumn {
                    name: col.name.clone(),
                });
            }
        }
        Ok(Table { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// `(name, declared type)` for each column, in order.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type()))
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, AnalysisError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AnalysisError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Row `index` as a vector of cells, one per column.
    pub fn row(&self, index: usize) -> Vec<Value<'_>> {
        self.columns.iter().map(|c| c.value(index)).collect()
    }

    pub fn row_has_missing(&self, index: usize) -> bool {
        self.columns.iter().any(|c| c.is_missing(index))
    }

    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// New table with only the rows whose flag is `true`.
    pub fn retain_rows(&self, keep: &[bool]) -> Table {
        let columns: Vec<Column> = self.columns.iter().map(|c| c.retain_rows(keep)).collect();
        let row_count = keep.iter().take(self.row_count).filter(|&&k| k).count();
        Table { columns, row_count }
    }

    /// New table with only the columns of the given type.
    pub fn select_type(&self, column_type: ColumnType) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .filter(|c| c.column_type() == column_type)
                .cloned()
                .collect(),
            row_count: self.row_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
