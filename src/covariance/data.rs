//! covariance::data — regression building blocks shared by every estimator.
//!
//! Purpose
//! -------
//! Hold the quantities a sandwich covariance estimator needs from a fitted
//! regression: the bread matrix (`invcrossmatrix`), the regressors, the
//! residuals, and the residual degrees of freedom. Shape invariants are
//! validated once at construction so the estimators can index freely.
//!
//! Key behaviors
//! -------------
//! - [`VcovData::new`] validates shapes and returns a [`VcovError`] on any
//!   violation; no partially valid value is ever produced.
//! - The residual rank `N` is a type parameter: `VcovData<Ix1>` for
//!   single-response models and `VcovData<Ix2>` for multi-response / IV
//!   first stages. [`ResidualRank`] presents both as an `n×L` view.
//! - [`VcovData::into_invcrossmatrix`] hands the bread buffer to `vcov`,
//!   which scales or overwrites it into the final covariance. Consuming the
//!   data makes stale reuse of the bread a compile-time error.
//!
//! Invariants
//! ----------
//! - `regressors.nrows() == residuals` row count.
//! - `invcrossmatrix` is square with side `regressors.ncols() * L`, where
//!   `L` is the number of residual columns (1 for vector residuals).
//! - `df_residual ≥ 1`.
use crate::covariance::errors::{VcovError, VcovResult};
use ndarray::{Array, Array1, Array2, ArrayView2, Axis, Dimension, Ix1, Ix2};

/// Residual shapes accepted by [`VcovData`].
///
/// Implemented for `Ix1` (vector residuals) and `Ix2` (matrix residuals).
pub trait ResidualRank: Dimension {
    /// View residuals as an `n×L` matrix (`L = 1` for vectors).
    fn as_columns(residuals: &Array<f64, Self>) -> ArrayView2<'_, f64>;
}

impl ResidualRank for Ix1 {
    fn as_columns(residuals: &Array1<f64>) -> ArrayView2<'_, f64> {
        residuals.view().insert_axis(Axis(1))
    }
}

impl ResidualRank for Ix2 {
    fn as_columns(residuals: &Array2<f64>) -> ArrayView2<'_, f64> {
        residuals.view()
    }
}

/// VcovData — validated inputs for covariance estimation.
///
/// Fields
/// ------
/// - `invcrossmatrix`: `Array2<f64>`
///   The bread `H`, typically `(X'X)⁻¹`. Side `K·L`.
/// - `regressors`: `Array2<f64>`
///   `n×K` regressor matrix.
/// - `residuals`: `Array<f64, D>`
///   Length-`n` vector or `n×L` matrix of residuals.
/// - `df_residual`: `usize`
///   Residual degrees of freedom supplied by the fitting step.
///
/// Notes
/// -----
/// - Construct one value per estimation call. `shat` borrows it; `vcov`
///   consumes it and returns the bread buffer rescaled into the covariance.
#[derive(Debug, Clone, PartialEq)]
pub struct VcovData<D: ResidualRank> {
    invcrossmatrix: Array2<f64>,
    regressors: Array2<f64>,
    residuals: Array<f64, D>,
    df_residual: usize,
}

impl<D: ResidualRank> VcovData<D> {
    /// Validate and assemble the estimator inputs.
    ///
    /// Parameters
    /// ----------
    /// - `invcrossmatrix`: `Array2<f64>`
    ///   Square bread matrix of side `regressors.ncols() * L`.
    /// - `regressors`: `Array2<f64>`
    ///   `n×K` regressors.
    /// - `residuals`: `Array<f64, D>`
    ///   Residual vector (`Ix1`) or `n×L` residual matrix (`Ix2`).
    /// - `df_residual`: `usize`
    ///   Strictly positive residual degrees of freedom.
    ///
    /// Returns
    /// -------
    /// `VcovResult<VcovData<D>>`
    ///   The validated container.
    ///
    /// Errors
    /// ------
    /// - `VcovError::RowMismatch` if regressors and residuals disagree on `n`.
    /// - `VcovError::NoObservations` if `n == 0`.
    /// - `VcovError::NonSquareBread` if `invcrossmatrix` is not square.
    /// - `VcovError::BreadDimension` if its side is not `K·L`.
    /// - `VcovError::InvalidDfResidual` if `df_residual == 0`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use robust_vcov::covariance::VcovData;
    /// let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
    /// let u = array![0.1, -0.2, 0.1];
    /// let bread = array![[5.0 / 6.0, -0.5], [-0.5, 0.5]];
    /// let data = VcovData::new(bread, x, u, 1).unwrap();
    /// assert_eq!(data.nobs(), 3);
    /// ```
    pub fn new(
        invcrossmatrix: Array2<f64>, regressors: Array2<f64>, residuals: Array<f64, D>,
        df_residual: usize,
    ) -> VcovResult<VcovData<D>> {
        let residual_view = D::as_columns(&residuals);
        if regressors.nrows() != residual_view.nrows() {
            return Err(VcovError::RowMismatch {
                regressors: regressors.nrows(),
                residuals: residual_view.nrows(),
            });
        }
        if regressors.nrows() == 0 {
            return Err(VcovError::NoObservations);
        }
        let (rows, cols) = invcrossmatrix.dim();
        if rows != cols {
            return Err(VcovError::NonSquareBread { rows, cols });
        }
        let expected = regressors.ncols() * residual_view.ncols();
        if rows != expected {
            return Err(VcovError::BreadDimension { expected, found: rows });
        }
        if df_residual == 0 {
            return Err(VcovError::InvalidDfResidual { df_residual });
        }
        Ok(VcovData { invcrossmatrix, regressors, residuals, df_residual })
    }

    /// Build from a fitted model's building blocks.
    ///
    /// The bread is copied out of the model so that `vcov` can consume it.
    pub fn from_model<M>(model: &M) -> VcovResult<VcovData<D>>
    where
        M: FittedModel<Rank = D>,
    {
        VcovData::new(
            model.invcrossmatrix().to_owned(),
            model.regressors().to_owned(),
            model.residuals().to_owned(),
            model.df_residual(),
        )
    }

    pub fn invcrossmatrix(&self) -> &Array2<f64> {
        &self.invcrossmatrix
    }

    pub fn regressors(&self) -> &Array2<f64> {
        &self.regressors
    }

    pub fn residuals(&self) -> &Array<f64, D> {
        &self.residuals
    }

    /// Residuals as an `n×L` view.
    pub fn residual_columns(&self) -> ArrayView2<'_, f64> {
        D::as_columns(&self.residuals)
    }

    pub fn df_residual(&self) -> usize {
        self.df_residual
    }

    /// Number of observations (rows of the regressor matrix).
    pub fn nobs(&self) -> usize {
        self.regressors.nrows()
    }

    /// Residual sum of squares `‖u‖²` (Frobenius norm for matrix residuals).
    pub fn residual_ss(&self) -> f64 {
        self.residuals.iter().map(|u| u * u).sum()
    }

    /// Give up the data and keep only the bread buffer.
    pub fn into_invcrossmatrix(self) -> Array2<f64> {
        self.invcrossmatrix
    }
}

/// FittedModel — what the model-fitting collaborator exposes.
///
/// Any fitted linear model that can report its bread, regressors,
/// residuals and residual degrees of freedom can feed the estimators via
/// [`VcovData::from_model`].
pub trait FittedModel {
    type Rank: ResidualRank;

    fn invcrossmatrix(&self) -> &Array2<f64>;
    fn regressors(&self) -> &Array2<f64>;
    fn residuals(&self) -> &Array<f64, Self::Rank>;
    fn df_residual(&self) -> usize;
}
