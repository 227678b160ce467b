//! statistical_tests::validation — shape guards for the rank test.
//!
//! Centralizes the checks on `X`, `Z` and `Π` that must hold before any
//! cross-product or decomposition is attempted, and maps violations into
//! [`RankTestError`] values.
use crate::statistical_tests::errors::{RankTestError, RankTestResult};
use ndarray::Array2;

/// Validate the shapes of the rank-test inputs.
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`
///   `n×K` endogenous regressors.
/// - `z`: `&Array2<f64>`
///   `n×L` instruments.
/// - `pi`: `&Array2<f64>`
///   `L×K` first-stage coefficients.
///
/// Returns
/// -------
/// `RankTestResult<(usize, usize, usize)>`
///   `(n, K, L)` on success.
///
/// Errors
/// ------
/// - `RankTestError::DimensionMismatch` if the row counts of `x` and `z`
///   differ, if `x` has no columns or no rows, or if `pi` is not `L×K`.
/// - `RankTestError::TooFewInstruments` if `L < K`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array2;
/// # use robust_vcov::statistical_tests::validation::validate_shapes;
/// let x = Array2::<f64>::zeros((5, 1));
/// let z = Array2::<f64>::zeros((5, 2));
/// let pi = Array2::<f64>::zeros((2, 1));
/// assert_eq!(validate_shapes(&x, &z, &pi).unwrap(), (5, 1, 2));
/// ```
pub fn validate_shapes(
    x: &Array2<f64>, z: &Array2<f64>, pi: &Array2<f64>,
) -> RankTestResult<(usize, usize, usize)> {
    let (n, k) = x.dim();
    let l = z.ncols();
    if z.nrows() != n {
        return Err(RankTestError::DimensionMismatch {
            what: "number of rows of Z",
            expected: n,
            found: z.nrows(),
        });
    }
    if n == 0 {
        return Err(RankTestError::DimensionMismatch {
            what: "number of observations",
            expected: 1,
            found: 0,
        });
    }
    if k == 0 {
        return Err(RankTestError::DimensionMismatch {
            what: "number of columns of X",
            expected: 1,
            found: 0,
        });
    }
    if l < k {
        return Err(RankTestError::TooFewInstruments { instruments: l, regressors: k });
    }
    if pi.nrows() != l {
        return Err(RankTestError::DimensionMismatch {
            what: "number of rows of Pi",
            expected: l,
            found: pi.nrows(),
        });
    }
    if pi.ncols() != k {
        return Err(RankTestError::DimensionMismatch {
            what: "number of columns of Pi",
            expected: k,
            found: pi.ncols(),
        });
    }
    Ok((n, k, l))
}
