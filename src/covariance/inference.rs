//! covariance::inference — from a covariance matrix to coefficient tests.
//!
//! Purpose
//! -------
//! Post-process a covariance estimate: repair indefiniteness that
//! multi-way inclusion–exclusion can introduce, extract standard errors,
//! and compute per-coefficient t-statistics with Student-t p-values.
//!
//! Conventions
//! -----------
//! - Degrees of freedom for the t-distribution come from the caller,
//!   typically [`VcovMethodData::dof_tstat`](crate::covariance::VcovMethodData::dof_tstat).
//! - Non-positive variances yield `NaN` standard errors rather than errors;
//!   they signal an estimate that needs [`make_psd`] first.
use crate::covariance::{
    errors::{VcovError, VcovResult},
    linalg::{to_array2, to_dmatrix, EIGEN_EPS},
};
use log::warn;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Project a symmetric covariance onto the PSD cone by zeroing negative
/// eigenvalues.
///
/// Parameters
/// ----------
/// - `vcov`: `Array2<f64>`
///   Symmetric covariance estimate. Consumed.
///
/// Returns
/// -------
/// `(Array2<f64>, bool)`
///   The (possibly repaired) matrix and whether any eigenvalue was clamped.
///   When nothing is clamped the input is returned unchanged.
///
/// Notes
/// -----
/// - Multi-way cluster estimates subtract intersection terms and can have
///   small negative eigenvalues in finite samples.
/// - An eigenvalue counts as negative only below
///   `−EIGEN_EPS · dim · max|λ|`, so singular PSD inputs whose zero
///   eigenvalues come out as rounding noise pass through untouched.
pub fn make_psd(vcov: Array2<f64>) -> (Array2<f64>, bool) {
    let eigen = to_dmatrix(vcov.view()).symmetric_eigen();
    let scale = eigen.eigenvalues.iter().fold(0.0_f64, |acc, lambda| acc.max(lambda.abs()));
    let tol = EIGEN_EPS * vcov.nrows() as f64 * scale;
    let clamped = eigen.eigenvalues.iter().filter(|&&lambda| lambda < -tol).count();
    if clamped == 0 {
        return (vcov, false);
    }
    warn!("covariance has {clamped} negative eigenvalue(s); clamping to zero");
    let values = eigen.eigenvalues.map(|lambda| lambda.max(0.0));
    let repaired =
        &eigen.eigenvectors * DMatrix::from_diagonal(&values) * eigen.eigenvectors.transpose();
    (to_array2(&repaired), true)
}

/// Square roots of the diagonal of a covariance matrix.
pub fn standard_errors(vcov: &Array2<f64>) -> Array1<f64> {
    vcov.diag().mapv(f64::sqrt)
}

/// CoefTest — Wald t-test of a single coefficient against zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefTest {
    pub estimate: f64,
    pub std_error: f64,
    pub t_stat: f64,
    /// Two-sided p-value under Student-t with the supplied dof.
    pub p_value: f64,
}

/// t-statistics and two-sided p-values for each coefficient.
///
/// Parameters
/// ----------
/// - `coef`: `&Array1<f64>`
///   Coefficient estimates, length `K`.
/// - `vcov`: `&Array2<f64>`
///   `K×K` covariance estimate.
/// - `dof`: `usize`
///   Degrees of freedom of the reference t-distribution; must be positive.
///
/// Errors
/// ------
/// - `VcovError::BreadDimension` if `vcov` is not `K×K`.
/// - `VcovError::InvalidDfResidual` if `dof == 0`.
pub fn coef_tests(coef: &Array1<f64>, vcov: &Array2<f64>, dof: usize) -> VcovResult<Vec<CoefTest>> {
    if vcov.nrows() != coef.len() || vcov.ncols() != coef.len() {
        return Err(VcovError::BreadDimension { expected: coef.len(), found: vcov.nrows() });
    }
    let dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|_| VcovError::InvalidDfResidual { df_residual: dof })?;
    let tests = coef
        .iter()
        .zip(standard_errors(vcov).iter())
        .map(|(&estimate, &std_error)| {
            let t_stat = estimate / std_error;
            let p_value = 2.0 * dist.sf(t_stat.abs());
            CoefTest { estimate, std_error, t_stat, p_value }
        })
        .collect();
    Ok(tests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A PSD input passes through untouched; an indefinite one is repaired
    // to a PSD matrix.
    //
    // Given
    // -----
    // - A = diag(2, 1) and B = [[1, 2], [2, 1]] (eigenvalues 3, −1).
    //
    // Expect
    // ------
    // - A unchanged with flag false; B becomes 1.5·[[1,1],[1,1]] with flag true.
    fn make_psd_clamps_negative_eigenvalues() {
        let (a, clamped_a) = make_psd(array![[2.0, 0.0], [0.0, 1.0]]);
        assert!(!clamped_a);
        assert_eq!(a, array![[2.0, 0.0], [0.0, 1.0]]);

        let (b, clamped_b) = make_psd(array![[1.0, 2.0], [2.0, 1.0]]);
        assert!(clamped_b);
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(b[[i, j]], 1.5, epsilon = 1e-10);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Singular but PSD matrices are not reported as repaired.
    //
    // Given
    // -----
    // - [[1, 1], [1, 1]] (eigenvalues 2, 0) and the zero matrix.
    //
    // Expect
    // ------
    // - Both returned unchanged with flag false.
    fn make_psd_leaves_singular_psd_untouched() {
        let singular = array![[1.0, 1.0], [1.0, 1.0]];
        let (out, clamped) = make_psd(singular.clone());
        assert!(!clamped);
        assert_eq!(out, singular);

        let (zero, clamped_zero) = make_psd(Array2::zeros((3, 3)));
        assert!(!clamped_zero);
        assert_eq!(zero, Array2::<f64>::zeros((3, 3)));
    }

    #[test]
    // Purpose
    // -------
    // t-statistics divide by standard errors; p-values are two-sided.
    //
    // Given
    // -----
    // - coef = (2, 0), vcov = diag(4, 1), dof = 30.
    //
    // Expect
    // ------
    // - t = (1, 0), p(0) = 1, p(1) ∈ (0.3, 0.35).
    fn coef_tests_two_sided() {
        let tests = coef_tests(&array![2.0, 0.0], &array![[4.0, 0.0], [0.0, 1.0]], 30).unwrap();

        assert_relative_eq!(tests[0].std_error, 2.0);
        assert_relative_eq!(tests[0].t_stat, 1.0);
        assert!(tests[0].p_value > 0.3 && tests[0].p_value < 0.35);
        assert_relative_eq!(tests[1].p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Shape and dof violations are reported as errors.
    fn coef_tests_validates_inputs() {
        assert!(coef_tests(&array![1.0], &array![[1.0, 0.0], [0.0, 1.0]], 5).is_err());
        assert!(matches!(
            coef_tests(&array![1.0], &array![[1.0]], 0),
            Err(VcovError::InvalidDfResidual { df_residual: 0 })
        ));
    }
}
