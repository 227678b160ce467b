//! Homoskedastic (classical OLS) covariance.
//!
//! `shat = H⁻¹ ‖u‖²` and `vcov = H · ‖u‖² / df_residual`, i.e. the
//! textbook `σ̂² (X'X)⁻¹`.
use crate::covariance::{
    data::{ResidualRank, VcovData},
    errors::{VcovError, VcovResult},
    linalg,
    method::CovarianceEstimator,
};
use ndarray::Array2;

/// Classical covariance under homoskedastic errors. Needs no grouping data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleCovariance;

impl CovarianceEstimator for SimpleCovariance {
    /// `invcrossmatrix⁻¹ · ‖u‖²`.
    ///
    /// Errors
    /// ------
    /// - `VcovError::SingularMatrix` if the bread cannot be inverted.
    fn shat<D: ResidualRank>(&self, data: &VcovData<D>) -> VcovResult<Array2<f64>> {
        let cross = linalg::inverse(data.invcrossmatrix().view())
            .ok_or(VcovError::SingularMatrix { context: "invcrossmatrix (simple shat)" })?;
        Ok(cross * data.residual_ss())
    }

    fn vcov<D: ResidualRank>(&self, data: VcovData<D>) -> VcovResult<Array2<f64>> {
        let scale = data.residual_ss() / data.df_residual() as f64;
        let mut bread = data.into_invcrossmatrix();
        bread *= scale;
        Ok(bread)
    }
}
