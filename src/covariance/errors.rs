//! Unified error handling for covariance estimation.
//!
//! This module defines `VcovError`, the central error type used by
//! `VcovData` construction, method preparation, and the `shat`/`vcov`
//! estimators. It groups shape violations (the dimension-error class),
//! grouping failures (the type-error class, wrapped from
//! [`GroupingError`]), singular bread/cross-product matrices, and
//! configuration errors for cluster specifications. An alias
//! `VcovResult<T>` standardizes the return type across covariance code.
//!
//! All failures are deterministic given the inputs; nothing here is
//! retryable.
use crate::grouping::GroupingError;

pub type VcovResult<T> = Result<T, VcovError>;

/// Unified error type for covariance routines.
///
/// Variants
/// --------
/// - Dimension errors: `NoObservations`, `RowMismatch`, `NonSquareBread`,
///   `BreadDimension`, `InvalidDfResidual`, `GroupLengthMismatch`.
/// - Type errors: `Grouping` (a declared grouping variable is missing or
///   not grouping-coded).
/// - Numerical errors: `SingularMatrix`, `InsufficientClusters`.
/// - Configuration errors: `InvalidClusterSpec`.
#[derive(Debug, Clone, PartialEq)]
pub enum VcovError {
    // ---- Dimension errors ----
    /// Regressors and residuals have zero rows.
    NoObservations,

    /// Regressors and residuals disagree on the number of observations.
    RowMismatch { regressors: usize, residuals: usize },

    /// The bread matrix is not square.
    NonSquareBread { rows: usize, cols: usize },

    /// The bread dimension is not `regressors.ncols() * residuals.ncols()`.
    BreadDimension { expected: usize, found: usize },

    /// Residual degrees of freedom must be strictly positive.
    InvalidDfResidual { df_residual: usize },

    /// Group codes of a cluster variable do not cover the observations.
    GroupLengthMismatch { name: String, expected: usize, found: usize },

    // ---- Type errors ----
    Grouping(GroupingError),

    // ---- Numerical errors ----
    /// A matrix that must be inverted or factorized is singular.
    SingularMatrix { context: &'static str },

    /// A cluster term needs at least two groups for its finite-sample factor.
    InsufficientClusters { name: String, found: usize },

    // ---- Configuration ----
    InvalidClusterSpec(String),
}

impl std::error::Error for VcovError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VcovError::Grouping(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GroupingError> for VcovError {
    fn from(err: GroupingError) -> Self {
        VcovError::Grouping(err)
    }
}

impl std::fmt::Display for VcovError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dimension errors ----
            VcovError::NoObservations => write!(f, "Vcov Error: data has no observations"),
            VcovError::RowMismatch { regressors, residuals } => write!(
                f,
                "Vcov Error: regressors have {regressors} rows but residuals have {residuals}"
            ),
            VcovError::NonSquareBread { rows, cols } => {
                write!(f, "Vcov Error: invcrossmatrix must be square, got {rows}x{cols}")
            }
            VcovError::BreadDimension { expected, found } => write!(
                f,
                "Vcov Error: invcrossmatrix has dimension {found}, expected {expected} \
                 (regressor columns x residual columns)"
            ),
            VcovError::InvalidDfResidual { df_residual } => {
                write!(f, "Vcov Error: df_residual must be positive, got {df_residual}")
            }
            VcovError::GroupLengthMismatch { name, expected, found } => write!(
                f,
                "Vcov Error: cluster variable `{name}` has {found} codes for {expected} \
                 observations"
            ),

            // ---- Type errors ----
            VcovError::Grouping(err) => write!(f, "Vcov Error: {err}"),

            // ---- Numerical errors ----
            VcovError::SingularMatrix { context } => {
                write!(f, "Vcov Error: singular matrix in {context}")
            }
            VcovError::InsufficientClusters { name, found } => write!(
                f,
                "Vcov Error: clustering on `{name}` yields {found} group(s); at least 2 are \
             required"
            ),

            // ---- Configuration ----
            VcovError::InvalidClusterSpec(msg) => {
                write!(f, "Vcov Error: invalid cluster specification: {msg}")
            }
        }
    }
}
