//! robust_vcov — robust covariance estimators and weak-instrument diagnostics.
//!
//! Purpose
//! -------
//! Serve as the crate root for callers that have already fitted a linear
//! (or multi-response / IV) regression and need inference beyond the
//! homoskedastic case: classical, heteroskedasticity-robust (White) and
//! multi-way cluster-robust covariance matrices, plus the Kleibergen–Paap
//! rank test for weak identification.
//!
//! Key behaviors
//! -------------
//! - [`grouping`] turns categorical columns into dense group codes and
//!   exposes them through the [`grouping::ColumnSource`] seam.
//! - [`covariance`] validates a fitted model's building blocks into
//!   [`covariance::VcovData`], prepares a [`covariance::VcovMethod`] against
//!   a data source, and computes meats and sandwich covariances.
//! - [`statistical_tests`] runs the rank test on top of a prepared method.
//!
//! Invariants & assumptions
//! ------------------------
//! - All computation is synchronous and in-memory; no operation performs
//!   I/O.
//! - Prepared method data is read-only and may be shared across any number
//!   of estimator or test calls.
//! - Errors are returned as values; public entry points do not panic on
//!   malformed user input.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray` arrays at every public boundary.
//! - Diagnostics are emitted through the `log` facade; the crate never
//!   installs a logger.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/` holds end-to-end checks
//!   that fit OLS and 2SLS first stages by hand and run every estimator.

pub mod covariance;
pub mod grouping;
pub mod statistical_tests;
