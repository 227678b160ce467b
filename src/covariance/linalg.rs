//! Bridge between `ndarray` storage and `nalgebra` decompositions.
//!
//! Public data in this crate is held in `ndarray` arrays; factorizations
//! (Cholesky, SVD, QR, symmetric eigen) and inverses run on
//! `nalgebra::DMatrix`. The helpers here copy between the two
//! representations and wrap the handful of dense routines the estimators
//! and the rank test share. Failures are reported as `None`; callers map
//! them into their own error type with a context string.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayView2};

/// Eigenvalues at or below this threshold are treated as zero when
/// repairing or taking square roots of symmetric PSD matrices.
pub(crate) const EIGEN_EPS: f64 = f64::EPSILON;

/// Copy an `ndarray` matrix view into a column-major `DMatrix`.
pub(crate) fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy a `DMatrix` back into a row-major `Array2`.
pub(crate) fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// General inverse of a square `ndarray` matrix.
pub(crate) fn inverse(a: ArrayView2<'_, f64>) -> Option<Array2<f64>> {
    to_dmatrix(a).try_inverse().map(|inv| to_array2(&inv))
}

/// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
///
/// Returns `None` when `A` is not numerically positive definite.
pub(crate) fn cholesky_lower(a: DMatrix<f64>) -> Option<DMatrix<f64>> {
    a.cholesky().map(|chol| chol.l())
}

/// Inverse of a lower-triangular matrix by forward substitution.
pub(crate) fn lower_triangular_inverse(l: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let n = l.nrows();
    l.solve_lower_triangular(&DMatrix::identity(n, n))
}

/// Solve `A x = b` for symmetric positive definite `A` via Cholesky.
pub(crate) fn cholesky_solve(a: DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    a.cholesky().map(|chol| chol.solve(b))
}

/// Principal square root of a symmetric PSD matrix, `Q diag(√λ) Qᵀ`.
///
/// Eigenvalues at or below [`EIGEN_EPS`] are taken as zero.
pub(crate) fn sqrtm_psd(a: DMatrix<f64>) -> DMatrix<f64> {
    let eigen = a.symmetric_eigen();
    let roots =
        eigen.eigenvalues.map(|lambda| if lambda > EIGEN_EPS { lambda.sqrt() } else { 0.0 });
    &eigen.eigenvectors * DMatrix::from_diagonal(&roots) * eigen.eigenvectors.transpose()
}

/// Extend the orthonormal columns of `u_thin` (`m×r`, `r ≤ m`) to a full
/// `m×m` orthogonal matrix whose first `r` columns are `u_thin`.
///
/// The complement is read off the Householder QR of `[u_thin | I_m]`: its
/// first `r` Q-columns span the same space as `u_thin`, so the remaining
/// `m−r` columns are an orthonormal basis of the orthogonal complement.
pub(crate) fn complete_orthonormal(u_thin: &DMatrix<f64>) -> DMatrix<f64> {
    let (m, r) = u_thin.shape();
    if r == m {
        return u_thin.clone();
    }
    let mut stacked = DMatrix::<f64>::zeros(m, r + m);
    stacked.view_mut((0, 0), (m, r)).copy_from(u_thin);
    stacked.view_mut((0, r), (m, m)).fill_with_identity();
    let mut full = stacked.qr().q();
    full.view_mut((0, 0), (m, r)).copy_from(u_thin);
    full
}
