//! grouping — integer group codes for cluster-robust estimation.
//!
//! Purpose
//! -------
//! Provide the small slice of grouping functionality the covariance core
//! depends on: dense per-row group codes with their cardinality
//! ([`GroupCodes`]), combined-key grouping across several columns
//! ([`GroupCodes::combine`]), and a column lookup interface
//! ([`ColumnSource`]) that distinguishes grouping-coded columns from
//! everything else.
//!
//! Invariants & assumptions
//! ------------------------
//! - All code columns handed to the estimators are dense (`0..ngroups`).
//! - Loading, validating and pooling arbitrary tabular data is the caller's
//!   business; [`DataTable`] is only a convenient in-memory carrier.

pub mod codes;
pub mod errors;
pub mod table;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::codes::GroupCodes;
pub use self::errors::{GroupingError, GroupingResult};
pub use self::table::{Column, ColumnSource, DataTable};
