//! covariance — classical, White, and multi-way cluster sandwich estimators.
//!
//! Purpose
//! -------
//! Compute variance–covariance estimates for linear regression coefficients
//! from the building blocks of an already fitted model: the bread
//! `H = (X'X)⁻¹` (or a generalized analog), the regressors, the residuals,
//! and the residual degrees of freedom.
//!
//! Key behaviors
//! -------------
//! - Validate inputs once in [`VcovData::new`]; shape violations surface as
//!   [`VcovError`] dimension variants.
//! - Configure the estimator with [`VcovMethod`] and bind it to a dataset
//!   with [`VcovMethodData::prepare`].
//! - Compute the meat with [`CovarianceEstimator::shat`] and the final
//!   covariance with [`CovarianceEstimator::vcov`]:
//!   - Simple: `H · ‖u‖² / df`.
//!   - White: `H · (n/df · Σ kron_i kron_iᵀ) · H`.
//!   - Cluster: `H · ((n−1)/df · Σ_c ±S(c)) · H` over all non-empty subsets
//!     of grouping variables.
//! - Post-process with [`make_psd`], [`standard_errors`] and [`coef_tests`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Regressors are `n×K`; residuals are a length-`n` vector or `n×L`
//!   matrix; the bread is `(K·L)×(K·L)`.
//! - Prepared method data is immutable and can be shared across calls.
//! - `vcov` consumes the [`VcovData`]; its bread buffer becomes (or is
//!   replaced by) the returned covariance.
//!
//! Conventions
//! -----------
//! - Data is exchanged as `ndarray` arrays. Factorizations run on
//!   `nalgebra` matrices behind a private bridge.
//! - Per-observation score vectors use the layout
//!   `kron_i[l·K + k] = X[i,k]·U[i,l]`.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use ndarray::array;
//! use robust_vcov::covariance::prelude::*;
//! use robust_vcov::grouping::DataTable;
//!
//! let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
//! let u = array![-0.1, 0.8, -1.3, 0.6];
//! let bread = array![[0.7, -0.3], [-0.3, 0.2]];
//!
//! let method = VcovMethodData::prepare(&VcovMethod::robust(), &DataTable::new()).unwrap();
//! let vcov = method.vcov(VcovData::new(bread, x, u, 2).unwrap()).unwrap();
//! assert!(standard_errors(&vcov).iter().all(|se| se.is_finite()));
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each estimator; `tests/` exercises the full
//!   fit → prepare → vcov → rank-test pipeline on synthetic data.

pub mod cluster;
pub mod data;
pub mod errors;
pub mod inference;
pub(crate) mod linalg;
pub mod method;
pub mod sandwich;
pub mod simple;
pub mod white;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::cluster::{
    inclusion_exclusion_terms, ClusterData, ClusterSubset, MAX_CLUSTER_VARIABLES,
};
pub use self::data::{FittedModel, ResidualRank, VcovData};
pub use self::errors::{VcovError, VcovResult};
pub use self::inference::{coef_tests, make_psd, standard_errors, CoefTest};
pub use self::method::{CovarianceEstimator, VcovMethod, VcovMethodData};
pub use self::sandwich::sandwich;
pub use self::simple::SimpleCovariance;
pub use self::white::WhiteCovariance;

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::data::{FittedModel, VcovData};
    pub use super::errors::{VcovError, VcovResult};
    pub use super::inference::{coef_tests, make_psd, standard_errors};
    pub use super::method::{CovarianceEstimator, VcovMethod, VcovMethodData};
}
