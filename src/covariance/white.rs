//! Heteroskedasticity-robust (Eicker–Huber–White) covariance.
//!
//! The meat is `S = Σ_i kron_i kron_iᵀ` built from per-observation scores
//! (`Xu'Xu` for vector residuals). The covariance applies the small-sample
//! factor `n / df_residual` and the sandwich `H S H`.
use crate::covariance::{
    data::{ResidualRank, VcovData},
    errors::VcovResult,
    method::CovarianceEstimator,
    sandwich::{sandwich, score_matrix},
};
use ndarray::Array2;

/// White (HC1-style) heteroskedasticity-robust covariance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhiteCovariance;

impl CovarianceEstimator for WhiteCovariance {
    fn shat<D: ResidualRank>(&self, data: &VcovData<D>) -> VcovResult<Array2<f64>> {
        let scores = score_matrix(data.regressors(), data.residual_columns());
        Ok(scores.t().dot(&scores))
    }

    fn vcov<D: ResidualRank>(&self, data: VcovData<D>) -> VcovResult<Array2<f64>> {
        let mut meat = self.shat(&data)?;
        meat *= data.nobs() as f64 / data.df_residual() as f64;
        Ok(sandwich(data.invcrossmatrix(), &meat))
    }
}
