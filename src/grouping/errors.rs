//! Error handling for grouping-column lookup and preparation.
//!
//! This module defines `GroupingError`, raised when a declared grouping
//! variable cannot be turned into integer group codes: the column is absent,
//! the column is not grouping-coded (the "type error" class), or a row mask
//! does not match the column length. An alias `GroupingResult<T>`
//! standardizes the return type across grouping code.

pub type GroupingResult<T> = Result<T, GroupingError>;

/// Unified error type for grouping routines.
///
/// Variants carry the offending column name or lengths so that failures can
/// be reported without access to the source table.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupingError {
    // ---- Column lookup ----
    /// The table has no column with this name.
    MissingColumn { name: String },

    /// The column exists but does not hold group codes.
    NotGrouping { name: String },

    // ---- Row selection ----
    /// A row mask does not match the number of rows in the column.
    MaskLength { expected: usize, found: usize },
}

impl std::error::Error for GroupingError {}

impl std::fmt::Display for GroupingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Column lookup ----
            GroupingError::MissingColumn { name } => {
                write!(f, "Grouping Error: column `{name}` not found")
            }
            GroupingError::NotGrouping { name } => write!(
                f,
                "Grouping Error: column `{name}` is not grouping-coded; convert it to group \
                 codes first"
            ),

            // ---- Row selection ----
            GroupingError::MaskLength { expected, found } => write!(
                f,
                "Grouping Error: row mask has length {found}, expected {expected}"
            ),
        }
    }
}
