use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, mirroring what the loaders can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for plotting.  Timestamps map to
    /// seconds since the Unix epoch so they stay ordered on the x axis.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Timestamp(ts) => Some(ts.and_utc().timestamp() as f64),
            _ => None,
        }
    }

    /// The timestamp payload, if any.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the declared type of a whole column
// ---------------------------------------------------------------------------

/// Column type as inferred at load time.  Kept on the column itself so schema
/// queries (e.g. date-column candidates) work on zero-row tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Number,
    Timestamp,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Timestamp => write!(f, "timestamp"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// A named column: declared type plus one value per row.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its declared type from the values.
    ///
    /// The majority type among non-null cells wins; a column with no
    /// non-null cells is text.
    pub fn from_values(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let mut n_text = 0usize;
        let mut n_number = 0usize;
        let mut n_timestamp = 0usize;
        for v in &values {
            match v {
                CellValue::Text(_) => n_text += 1,
                CellValue::Number(_) => n_number += 1,
                CellValue::Timestamp(_) => n_timestamp += 1,
                CellValue::Null => {}
            }
        }
        let ty = if n_timestamp > n_text && n_timestamp > n_number {
            ColumnType::Timestamp
        } else if n_number > n_text && n_number >= n_timestamp {
            ColumnType::Number
        } else {
            ColumnType::Text
        };
        Column {
            name: name.into(),
            ty,
            values,
        }
    }
}

/// An ordered collection of equally-long named columns.
///
/// Immutable once loaded, except for [`coerce_to_temporal`] which swaps one
/// column for its parsed form.  Every derived table (a filter result) holds
/// the identical column set in the identical order.
///
/// [`coerce_to_temporal`]: crate::data::filter::coerce_to_temporal
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns
                .windows(2)
                .all(|w| w[0].values.len() == w[1].values.len()),
            "all columns must have the same length"
        );
        Table { columns }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.  A headers-only file still has columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Ordered column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// New table containing the given rows, in order, with the same columns.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                ty: col.ty,
                values: indices.iter().map(|&i| col.values[i].clone()).collect(),
            })
            .collect();
        Table { columns }
    }

    /// Replace one column wholesale, keeping its position.
    pub fn with_column_replaced(&self, index: usize, column: Column) -> Table {
        let mut columns = self.columns.clone();
        columns[index] = column;
        Table { columns }
    }
}
