//! Integration tests for the covariance and rank-test pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a regression package takes: fit OLS by
//!   hand, wrap the fit as a `FittedModel`, prepare each variance method
//!   against a data table, compute covariances, repair and test
//!   coefficients, and finally run the Kleibergen–Paap test on a first
//!   stage.
//! - Exercise realistic shapes (dozens of rows, several regressors,
//!   overlapping cluster dimensions) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `covariance`:
//!   - `VcovData::from_model` for vector and matrix residuals.
//!   - Simple, White, one-way and two-way cluster estimators.
//!   - `make_psd`, `standard_errors`, `coef_tests`, `dof_tstat`.
//!   - `prepare_subset` cardinalities.
//! - `statistical_tests`:
//!   - `RankTestOutcome::kleibergen_paap` under all three methods.
//!
//! Exclusions
//! ----------
//! - Low-level guards and error variants, covered by unit tests.
//! - Comparison against external statistical packages.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Axis, Ix1, Ix2};
use robust_vcov::{
    covariance::{
        coef_tests, make_psd, standard_errors, CovarianceEstimator, FittedModel, VcovData,
        VcovMethod, VcovMethodData,
    },
    grouping::DataTable,
    statistical_tests::{RankTestOptions, RankTestOutcome},
};

const N: usize = 24;

/// Hand-rolled OLS fit exposing the blocks the estimators need.
struct OlsFit<R> {
    coef: Array2<f64>,
    bread: Array2<f64>,
    x: Array2<f64>,
    resid: R,
    df: usize,
}

impl FittedModel for OlsFit<Array1<f64>> {
    type Rank = Ix1;
    fn invcrossmatrix(&self) -> &Array2<f64> {
        &self.bread
    }
    fn regressors(&self) -> &Array2<f64> {
        &self.x
    }
    fn residuals(&self) -> &Array1<f64> {
        &self.resid
    }
    fn df_residual(&self) -> usize {
        self.df
    }
}

impl FittedModel for OlsFit<Array2<f64>> {
    type Rank = Ix2;
    fn invcrossmatrix(&self) -> &Array2<f64> {
        &self.bread
    }
    fn regressors(&self) -> &Array2<f64> {
        &self.x
    }
    fn residuals(&self) -> &Array2<f64> {
        &self.resid
    }
    fn df_residual(&self) -> usize {
        self.df
    }
}

fn invert(a: &Array2<f64>) -> Array2<f64> {
    let m = DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]]);
    let inv = m.try_inverse().expect("invertible cross-product");
    Array2::from_shape_fn(a.dim(), |(i, j)| inv[(i, j)])
}

/// Regress every column of `y` on `x`.
fn fit(x: &Array2<f64>, y: &Array2<f64>) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    let bread = invert(&x.t().dot(x));
    let coef = bread.dot(&x.t().dot(y));
    let resid = y - &x.dot(&coef);
    (coef, resid, bread)
}

/// Deterministic design: intercept, a trend and a cyclical regressor, with
/// noise whose scale grows with the trend.
fn design() -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((N, 3), |(i, j)| match j {
        0 => 1.0,
        1 => i as f64 / 4.0,
        _ => ((i * 7) % 5) as f64,
    });
    let y = Array1::from_shape_fn(N, |i| {
        let noise = (((i * 13) % 7) as f64 / 7.0 - 0.43) * (1.0 + 0.3 * x[[i, 1]]);
        1.0 + 0.5 * x[[i, 1]] - 0.3 * x[[i, 2]] + noise
    });
    (x, y)
}

fn single_response_fit() -> OlsFit<Array1<f64>> {
    let (x, y) = design();
    let (coef, resid, bread) = fit(&x, &y.insert_axis(Axis(1)));
    OlsFit { coef, bread, x, resid: resid.column(0).to_owned(), df: N - 3 }
}

fn panel_table() -> DataTable {
    let firm: Vec<usize> = (0..N).map(|i| i / 4).collect();
    let year: Vec<usize> = (0..N).map(|i| i % 3).collect();
    let firm_year: Vec<(usize, usize)> = firm.iter().copied().zip(year.iter().copied()).collect();
    let mut table = DataTable::new();
    table
        .insert_categorical("firm", &firm)
        .insert_categorical("year", &year)
        .insert_categorical("firm_year", &firm_year);
    table
}

fn assert_symmetric(m: &Array2<f64>) {
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            approx::assert_relative_eq!(
                m[[i, j]],
                m[[j, i]],
                epsilon = 1e-10,
                max_relative = 1e-10
            );
        }
    }
}

#[test]
// Purpose
// -------
// Every method runs on one fitted model and produces a symmetric
// covariance with finite standard errors; the simple estimate matches the
// textbook `σ̂² (X'X)⁻¹`.
fn all_methods_on_single_response_fit() {
    let model = single_response_fit();
    let table = panel_table();
    let rss: f64 = model.resid.iter().map(|u| u * u).sum();

    for method in [
        VcovMethod::simple(),
        VcovMethod::robust(),
        VcovMethod::cluster(["firm"]),
        VcovMethod::cluster(["firm", "year"]),
    ] {
        let prepared = VcovMethodData::prepare(&method, &table).unwrap();
        let vcov = prepared.vcov(VcovData::from_model(&model).unwrap()).unwrap();

        assert_eq!(vcov.dim(), (3, 3));
        assert_symmetric(&vcov);
        if prepared.is_simple() {
            let expected = &model.bread * (rss / model.df as f64);
            for (a, b) in vcov.iter().zip(expected.iter()) {
                approx::assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }

        let (repaired, _) = make_psd(vcov);
        let se = standard_errors(&repaired);
        assert!(se.iter().all(|s| s.is_finite() && *s >= 0.0), "{method}: {se:?}");
    }
}

#[test]
// Purpose
// -------
// The two-way cluster meat equals the inclusion–exclusion combination of
// the firm, year and firm×year one-way meats.
fn two_way_meat_is_inclusion_exclusion() {
    let model = single_response_fit();
    let table = panel_table();
    let data = VcovData::from_model(&model).unwrap();
    let meat = |method: VcovMethod| {
        VcovMethodData::prepare(&method, &table).unwrap().shat(&data).unwrap()
    };

    let two_way = meat(VcovMethod::cluster(["firm", "year"]));
    let combined = meat(VcovMethod::cluster(["firm"])) + meat(VcovMethod::cluster(["year"]))
        - meat(VcovMethod::cluster(["firm_year"]));

    for (a, b) in two_way.iter().zip(combined.iter()) {
        approx::assert_relative_eq!(*a, *b, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
// Purpose
// -------
// Coefficient tests use cluster-count degrees of freedom under clustering
// and residual degrees of freedom otherwise.
fn coef_tests_follow_method_dof() {
    let model = single_response_fit();
    let table = panel_table();
    let coef = model.coef.column(0).to_owned();

    let cluster = VcovMethodData::prepare(&VcovMethod::cluster(["firm"]), &table).unwrap();
    let white = VcovMethodData::prepare(&VcovMethod::robust(), &table).unwrap();
    assert_eq!(cluster.dof_tstat(model.df), 5);
    assert_eq!(white.dof_tstat(model.df), N - 3);

    let vcov = white.vcov(VcovData::from_model(&model).unwrap()).unwrap();
    let tests = coef_tests(&coef, &vcov, white.dof_tstat(model.df)).unwrap();

    assert_eq!(tests.len(), 3);
    for t in &tests {
        approx::assert_relative_eq!(t.t_stat, t.estimate / t.std_error, epsilon = 1e-12);
        assert!((0.0..=1.0).contains(&t.p_value));
    }
    assert!(tests[1].p_value < 0.05, "trend slope should be significant: {tests:?}");
}

#[test]
// Purpose
// -------
// Restricting the estimation sample recompacts cluster codes, so counts
// reflect retained rows only and the estimator runs on the subset.
fn prepare_subset_tracks_retained_clusters() {
    let table = panel_table();
    let esample: Vec<bool> = (0..N).map(|i| i >= 8).collect();
    let method = VcovMethod::cluster(["firm", "year"]);

    let prepared = VcovMethodData::prepare_subset(&method, &table, &esample).unwrap();
    let cluster = prepared.as_cluster().unwrap();

    assert_eq!(cluster.cardinality("firm"), Some(4));
    assert_eq!(cluster.cardinality("year"), Some(3));
    assert_eq!(cluster.min_cardinality(), 3);

    let (x, y) = design();
    let x_sub = x.select(Axis(0), &(8..N).collect::<Vec<_>>());
    let y_sub = y.select(Axis(0), &(8..N).collect::<Vec<_>>());
    let (_, resid, bread) = fit(&x_sub, &y_sub.insert_axis(Axis(1)));
    let data = VcovData::new(bread, x_sub, resid.column(0).to_owned(), N - 8 - 3).unwrap();
    let vcov = prepared.vcov(data).unwrap();
    assert_symmetric(&vcov);
}

#[test]
// Purpose
// -------
// With matrix residuals and a block-diagonal bread, each diagonal block of
// the White covariance equals the single-response White covariance of
// that equation.
fn multi_response_white_blocks_match_single_equations() {
    let (x, y) = design();
    let y2 =
        Array2::from_shape_fn((N, 2), |(i, j)| if j == 0 { y[i] } else { y[i] * 0.5 + x[[i, 2]] });
    let (coef, resid, bread) = fit(&x, &y2);
    let mut block_bread = Array2::<f64>::zeros((6, 6));
    block_bread.slice_mut(ndarray::s![0..3, 0..3]).assign(&bread);
    block_bread.slice_mut(ndarray::s![3..6, 3..6]).assign(&bread);
    let multi = OlsFit { coef, bread: block_bread, x: x.clone(), resid, df: N - 3 };
    let white = VcovMethodData::prepare(&VcovMethod::robust(), &DataTable::new()).unwrap();

    let joint = white.vcov(VcovData::from_model(&multi).unwrap()).unwrap();

    for l in 0..2 {
        let single = OlsFit {
            coef: multi.coef.column(l).to_owned().insert_axis(Axis(1)),
            bread: bread.clone(),
            x: x.clone(),
            resid: multi.resid.column(l).to_owned(),
            df: N - 3,
        };
        let own = white.vcov(VcovData::from_model(&single).unwrap()).unwrap();
        let block = joint.slice(ndarray::s![l * 3..(l + 1) * 3, l * 3..(l + 1) * 3]);
        for (a, b) in block.iter().zip(own.iter()) {
            approx::assert_relative_eq!(*a, *b, epsilon = 1e-10, max_relative = 1e-10);
        }
    }
}

#[test]
// Purpose
// -------
// A strong first stage is detected by the rank test under every method,
// and one prepared cluster method serves repeated tests.
//
// Given
// -----
// - Endogenous x = 2·z₁ + 0.5·z₂ + small noise, two instruments.
//
// Expect
// ------
// - Simple p-value below 1%; all statistics finite with p in [0, 1].
fn rank_test_on_strong_first_stage() {
    let z = Array2::from_shape_fn((N, 2), |(i, j)| match j {
        0 => (i as f64 / 3.0).sin() + 1.5,
        _ => ((i * 5) % 7) as f64 - 3.0,
    });
    let x = Array2::from_shape_fn((N, 1), |(i, _)| {
        2.0 * z[[i, 0]] + 0.5 * z[[i, 1]] + 0.05 * (((i * 11) % 5) as f64 - 2.0)
    });
    let (pi, _, _) = fit(&z, &x);
    let table = panel_table();
    let opts = RankTestOptions::default();

    let simple = VcovMethodData::prepare(&VcovMethod::simple(), &table).unwrap();
    let outcome = RankTestOutcome::kleibergen_paap(&x, &z, &pi, &simple, &opts).unwrap();
    assert!(outcome.p_value() < 0.01, "{outcome:?}");
    assert_eq!(outcome.df(), 2);

    let cluster = VcovMethodData::prepare(&VcovMethod::cluster(["firm"]), &table).unwrap();
    let white = VcovMethodData::prepare(&VcovMethod::robust(), &table).unwrap();
    for method in [white, cluster.clone()] {
        let outcome = RankTestOutcome::kleibergen_paap(&x, &z, &pi, &method, &opts).unwrap();
        assert!(outcome.wald().is_finite() && outcome.wald() >= 0.0);
        assert!((0.0..=1.0).contains(&outcome.p_value()));
    }

    let weaker = &pi * 0.5;
    let first = RankTestOutcome::kleibergen_paap(&x, &z, &pi, &cluster, &opts).unwrap();
    let second = RankTestOutcome::kleibergen_paap(&x, &z, &weaker, &cluster, &opts).unwrap();
    approx::assert_relative_eq!(
        second.wald(),
        first.wald() * 0.25,
        epsilon = 1e-8,
        max_relative = 1e-8
    );
}
