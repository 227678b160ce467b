//! Shared pieces of the sandwich estimators: per-observation scores and
//! the `H S H` transform.
use ndarray::{s, Array2, ArrayView2, Axis};

/// Per-observation score matrix for the meat of a sandwich estimator.
///
/// Parameters
/// ----------
/// - `regressors`: `&Array2<f64>`
///   `n×K` regressors `X`.
/// - `residuals`: `ArrayView2<f64>`
///   `n×L` residuals `U` (`L = 1` for single-response models).
///
/// Returns
/// -------
/// `Array2<f64>`
///   `n×(K·L)` matrix whose row `i` is `kron_i` with
///   `kron_i[l·K + k] = X[i,k] · U[i,l]`, i.e. `K` varies fastest inside
///   each residual block. For `L = 1` this is the familiar `Xu` matrix.
///
/// Notes
/// -----
/// - Row `i` equals `vec(x_i u_iᵀ)` in column-major order, which is what
///   lets the rank test reuse this for `vec(Π)` variances.
pub(crate) fn score_matrix(
    regressors: &Array2<f64>, residuals: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let (n, k) = regressors.dim();
    let l = residuals.ncols();
    let mut scores = Array2::<f64>::zeros((n, k * l));
    for (j, res_col) in residuals.axis_iter(Axis(1)).enumerate() {
        let mut block = scores.slice_mut(s![.., j * k..(j + 1) * k]);
        block.assign(regressors);
        block *= &res_col.insert_axis(Axis(1));
    }
    scores
}

/// Sandwich transform `H S H`.
///
/// `H` is already the bread (an inverse cross-product), so no inverse is
/// taken here. The result is symmetric whenever `S` and `H` are.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use robust_vcov::covariance::sandwich;
/// let h = array![[2.0, 0.0], [0.0, 1.0]];
/// let s = array![[1.0, 0.5], [0.5, 1.0]];
/// let v = sandwich(&h, &s);
/// assert_eq!(v, array![[4.0, 1.0], [1.0, 1.0]]);
/// ```
pub fn sandwich(h: &Array2<f64>, s: &Array2<f64>) -> Array2<f64> {
    h.dot(s).dot(h)
}
