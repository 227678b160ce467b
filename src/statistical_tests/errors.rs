//! statistical_tests::errors — error types for the weak-identification test.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the Kleibergen–Paap rank
//! test and its input validation, so that malformed inputs and ill-posed
//! first stages are reported as values instead of panics.
//!
//! Key behaviors
//! -------------
//! - Define [`RankTestResult`] and [`RankTestError`] as the canonical result
//!   and error types for [`RankTestOutcome`](super::RankTestOutcome).
//! - Attach human-readable `Display` messages to each variant.
//! - Wrap covariance failures from the meat computation via
//!   `From<VcovError>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `SingularMatrix` signals ill-posed input (collinear instruments or
//!   regressors). It is never retried.
//! - Every failure is deterministic given the inputs.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` messages embed their payloads and
//!   that covariance errors convert losslessly.
use crate::covariance::VcovError;

pub type RankTestResult<T> = Result<T, RankTestError>;

/// RankTestError — error conditions for the rank test.
///
/// Variants
/// --------
/// - `DimensionMismatch { what, expected, found }`
///   An input matrix has the wrong number of rows or columns.
/// - `TooFewInstruments { instruments, regressors }`
///   `L < K`: the model is under-identified by construction.
/// - `SingularMatrix { context }`
///   A cross-product or the variance of the rotated statistic is not
///   positive definite.
/// - `InvalidDegreesOfFreedom { nobs, instruments, df_absorb }`
///   `nobs − L − df_absorb ≤ 0`.
/// - `Distribution(String)`
///   The χ² reference distribution could not be built.
/// - `Vcov(VcovError)`
///   Failure while computing the robust meat.
#[derive(Debug, Clone, PartialEq)]
pub enum RankTestError {
    // ---- Input validation ----
    DimensionMismatch { what: &'static str, expected: usize, found: usize },
    TooFewInstruments { instruments: usize, regressors: usize },
    InvalidDegreesOfFreedom { nobs: usize, instruments: usize, df_absorb: usize },

    // ---- Numerical failures ----
    SingularMatrix { context: &'static str },
    Distribution(String),

    // ---- Covariance passthrough ----
    Vcov(VcovError),
}

impl std::error::Error for RankTestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RankTestError::Vcov(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VcovError> for RankTestError {
    fn from(err: VcovError) -> Self {
        RankTestError::Vcov(err)
    }
}

impl std::fmt::Display for RankTestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankTestError::DimensionMismatch { what, expected, found } => {
                write!(f, "Rank test: {what} is {found}, expected {expected}.")
            }
            RankTestError::TooFewInstruments { instruments, regressors } => write!(
                f,
                "Rank test: {instruments} instrument(s) for {regressors} regressor(s); need L ≥ K."
            ),
            RankTestError::InvalidDegreesOfFreedom { nobs, instruments, df_absorb } => write!(
                f,
                "Rank test: no residual degrees of freedom (n = {nobs}, L = {instruments}, \
                 absorbed = {df_absorb})."
            ),
            RankTestError::SingularMatrix { context } => {
                write!(f, "Rank test: {context} is not positive definite.")
            }
            RankTestError::Distribution(msg) => {
                write!(f, "Rank test: invalid reference distribution: {msg}")
            }
            RankTestError::Vcov(err) => write!(f, "Rank test: {err}"),
        }
    }
}
