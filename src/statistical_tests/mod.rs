//! statistical_tests — weak-identification diagnostics for IV models.
//!
//! Purpose
//! -------
//! Collect first-stage diagnostics that sit on top of the covariance
//! estimators. This subtree implements the Kleibergen–Paap rk Wald test
//! together with its input validation and error handling.
//!
//! Key behaviors
//! -------------
//! - Expose the rank test via [`RankTestOutcome`] and its constructor
//!   [`RankTestOutcome::kleibergen_paap`], configured by
//!   [`RankTestOptions`].
//! - Centralize shape guards in [`validate_shapes`] so every entry point
//!   rejects malformed inputs the same way.
//! - Report failures through [`RankTestError`] / [`RankTestResult`];
//!   covariance failures are wrapped, not flattened.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are dense `ndarray` matrices of the same row count.
//! - Tests never mutate the prepared [`VcovMethodData`](crate::covariance::VcovMethodData)
//!   they are given.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use ndarray::array;
//! use robust_vcov::covariance::{VcovMethod, VcovMethodData};
//! use robust_vcov::grouping::DataTable;
//! use robust_vcov::statistical_tests::{RankTestOptions, RankTestOutcome};
//!
//! let z = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, -1.0], [2.0, 1.0]];
//! let x = array![[1.0], [2.0], [0.0], [1.0], [3.0]];
//! let pi = array![[0.5], [0.25]];
//! let method = VcovMethodData::prepare(&VcovMethod::simple(), &DataTable::new()).unwrap();
//!
//! let outcome =
//!     RankTestOutcome::kleibergen_paap(&x, &z, &pi, &method, &RankTestOptions::default())
//!         .unwrap();
//! assert!(outcome.p_value() > 0.0 && outcome.p_value() < 1.0);
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests cover the closed-form single-regressor case and each
//!   error branch; the integration test runs the test after a full
//!   first-stage fit.

pub mod errors;
pub mod validation;

pub use self::errors::{RankTestError, RankTestResult};
pub use self::rank_test::{count_instruments, RankTestOptions, RankTestOutcome};
pub use self::validation::validate_shapes;
