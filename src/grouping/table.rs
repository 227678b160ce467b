//! grouping::table — minimal column source for preparing cluster data.
//!
//! The covariance core never parses raw tabular data. It only asks a
//! [`ColumnSource`] for the group codes of declared grouping variables and
//! fails with [`GroupingError::NotGrouping`] when a column holds something
//! else. [`DataTable`] is a small in-memory implementation suitable for
//! tests and for callers that already hold materialized columns.
use crate::grouping::{
    codes::GroupCodes,
    errors::{GroupingError, GroupingResult},
};
use std::collections::BTreeMap;

/// A materialized column: either plain numeric values or group codes.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Grouped(GroupCodes),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Grouped(codes) => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source of named columns, implemented by whatever table type the caller uses.
pub trait ColumnSource {
    /// Look up a column by name.
    fn column(&self, name: &str) -> Option<&Column>;

    /// Group codes for `name`.
    ///
    /// Errors
    /// ------
    /// - `GroupingError::MissingColumn` if the column does not exist.
    /// - `GroupingError::NotGrouping` if the column is not grouping-coded.
    fn group_codes(&self, name: &str) -> GroupingResult<&GroupCodes> {
        match self.column(name) {
            Some(Column::Grouped(codes)) => Ok(codes),
            Some(Column::Numeric(_)) => Err(GroupingError::NotGrouping { name: name.to_string() }),
            None => Err(GroupingError::MissingColumn { name: name.to_string() }),
        }
    }
}

/// DataTable — named columns kept in insertion-independent (sorted) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: BTreeMap<String, Column>,
}

impl DataTable {
    pub fn new() -> DataTable {
        DataTable::default()
    }

    /// Insert or replace a column.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> &mut Self {
        self.columns.insert(name.into(), column);
        self
    }

    /// Insert a categorical column by pooling raw labels into group codes.
    pub fn insert_categorical<T: std::hash::Hash + Eq>(
        &mut self, name: impl Into<String>, labels: &[T],
    ) -> &mut Self {
        self.insert(name, Column::Grouped(GroupCodes::from_labels(labels)))
    }

    pub fn insert_numeric(&mut self, name: impl Into<String>, values: Vec<f64>) -> &mut Self {
        self.insert(name, Column::Numeric(values))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl ColumnSource for DataTable {
    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }
}
