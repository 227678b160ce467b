//! covariance::method — method specifications, prepared method data, and
//! the shared estimator interface.
//!
//! Purpose
//! -------
//! Separate *what* covariance is requested ([`VcovMethod`], pure
//! configuration) from the dataset-bound state needed to compute it
//! ([`VcovMethodData`], built once per dataset), and dispatch `shat`/`vcov`
//! over the closed set of estimators through [`CovarianceEstimator`].
//!
//! Key behaviors
//! -------------
//! - [`VcovMethod`] is constructed directly (`simple()`, `robust()`,
//!   `cluster(..)`) or parsed from text (`"simple"`, `"robust"`,
//!   `"cluster(firm, year)"`).
//! - [`VcovMethod::allvars`] lists the table columns a method needs.
//! - [`VcovMethodData::prepare`] materializes group codes for cluster
//!   methods; `Simple` and `White` carry no state.
//!
//! Conventions
//! -----------
//! - Dispatch is a `match` over a fixed enum; estimators implement the
//!   trait with generic methods, so there is no dynamic dispatch.
//! - `vcov` consumes its [`VcovData`]; the returned matrix is the former
//!   bread buffer (Simple) or a fresh sandwich (White, Cluster).
use crate::{
    covariance::{
        cluster::ClusterData,
        data::{ResidualRank, VcovData},
        errors::{VcovError, VcovResult},
        simple::SimpleCovariance,
        white::WhiteCovariance,
    },
    grouping::ColumnSource,
};
use ndarray::Array2;
use std::{fmt, str::FromStr};

/// Shared two-operation interface of every covariance estimator.
pub trait CovarianceEstimator {
    /// The "meat" matrix `S` of the sandwich, of side `K·L`.
    fn shat<D: ResidualRank>(&self, data: &VcovData<D>) -> VcovResult<Array2<f64>>;

    /// The final covariance estimate. Consumes `data`.
    fn vcov<D: ResidualRank>(&self, data: VcovData<D>) -> VcovResult<Array2<f64>>;
}

/// VcovMethod — requested covariance estimator.
///
/// Variants
/// --------
/// - `Simple`: homoskedastic errors.
/// - `White`: heteroskedasticity-robust.
/// - `Cluster(names)`: one- or multi-way cluster-robust on the named
///   grouping variables (non-empty, in declaration order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcovMethod {
    Simple,
    White,
    Cluster(Vec<String>),
}

impl VcovMethod {
    pub fn simple() -> VcovMethod {
        VcovMethod::Simple
    }

    pub fn robust() -> VcovMethod {
        VcovMethod::White
    }

    /// Cluster on the given grouping variables.
    ///
    /// ```rust
    /// # use robust_vcov::covariance::VcovMethod;
    /// let m = VcovMethod::cluster(["firm", "year"]);
    /// assert_eq!(m.allvars(), vec!["firm", "year"]);
    /// ```
    pub fn cluster<I, S>(names: I) -> VcovMethod
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VcovMethod::Cluster(names.into_iter().map(Into::into).collect())
    }

    /// Table columns that must be materialized before preparation.
    pub fn allvars(&self) -> Vec<&str> {
        match self {
            VcovMethod::Simple | VcovMethod::White => Vec::new(),
            VcovMethod::Cluster(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for VcovMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcovMethod::Simple => write!(f, "simple"),
            VcovMethod::White => write!(f, "robust"),
            VcovMethod::Cluster(names) => write!(f, "cluster({})", names.join(", ")),
        }
    }
}

impl FromStr for VcovMethod {
    type Err = VcovError;

    /// Parse `"simple"`, `"robust"` / `"white"`, or `"cluster(a, b, …)"`
    /// (case-insensitive keyword, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "simple" | "iid" => return Ok(VcovMethod::Simple),
            "robust" | "white" => return Ok(VcovMethod::White),
            _ => {}
        }
        let inner = lower
            .strip_prefix("cluster")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| {
                VcovError::InvalidClusterSpec(format!("unrecognized method `{trimmed}`"))
            })?;
        // Keep the caller's spelling of variable names.
        let start = trimmed.len() - inner.len() - 1;
        let names: Vec<String> = trimmed[start..trimmed.len() - 1]
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            let msg = "cluster() needs at least one variable";
            return Err(VcovError::InvalidClusterSpec(msg.into()));
        }
        Ok(VcovMethod::Cluster(names))
    }
}

/// VcovMethodData — a method bound to a dataset.
///
/// Built once per dataset with [`prepare`](Self::prepare) and then reused
/// read-only for any number of `shat`/`vcov` calls (e.g. for several
/// coefficient subsets or repeated rank tests).
#[derive(Debug, Clone, PartialEq)]
pub enum VcovMethodData {
    Simple(SimpleCovariance),
    White(WhiteCovariance),
    Cluster(ClusterData),
}

impl VcovMethodData {
    /// Materialize a method against a column source.
    ///
    /// Parameters
    /// ----------
    /// - `method`: `&VcovMethod`
    ///   Requested estimator.
    /// - `source`: `&T`
    ///   Table providing group codes for `method.allvars()`.
    ///
    /// Returns
    /// -------
    /// `VcovResult<VcovMethodData>`
    ///   Prepared data; stateless for `Simple` and `White`.
    ///
    /// Errors
    /// ------
    /// - `VcovError::Grouping` if a declared variable is missing or not
    ///   grouping-coded.
    /// - `VcovError::InvalidClusterSpec` for empty or duplicated variables.
    pub fn prepare<T: ColumnSource + ?Sized>(
        method: &VcovMethod, source: &T,
    ) -> VcovResult<VcovMethodData> {
        Ok(match method {
            VcovMethod::Simple => VcovMethodData::Simple(SimpleCovariance),
            VcovMethod::White => VcovMethodData::White(WhiteCovariance),
            VcovMethod::Cluster(names) => {
                VcovMethodData::Cluster(ClusterData::from_source(names, source)?)
            }
        })
    }

    /// Like [`prepare`](Self::prepare) restricted to rows with
    /// `esample[i] == true`; cluster cardinalities count only those rows.
    pub fn prepare_subset<T: ColumnSource + ?Sized>(
        method: &VcovMethod, source: &T, esample: &[bool],
    ) -> VcovResult<VcovMethodData> {
        Ok(match method {
            VcovMethod::Cluster(names) => {
                VcovMethodData::Cluster(ClusterData::from_source_subset(names, source, esample)?)
            }
            other => VcovMethodData::prepare(other, source)?,
        })
    }

    /// The method specification this data was prepared from.
    pub fn method(&self) -> VcovMethod {
        match self {
            VcovMethodData::Simple(_) => VcovMethod::Simple,
            VcovMethodData::White(_) => VcovMethod::White,
            VcovMethodData::Cluster(c) => VcovMethod::Cluster(c.names().to_vec()),
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, VcovMethodData::Simple(_))
    }

    pub fn as_cluster(&self) -> Option<&ClusterData> {
        match self {
            VcovMethodData::Cluster(c) => Some(c),
            _ => None,
        }
    }

    /// Degrees of freedom for t-statistics: `min cardinality − 1` under
    /// clustering, `df_residual` otherwise.
    pub fn dof_tstat(&self, df_residual: usize) -> usize {
        match self {
            VcovMethodData::Cluster(c) => c.min_cardinality().saturating_sub(1),
            _ => df_residual,
        }
    }
}

impl CovarianceEstimator for VcovMethodData {
    fn shat<D: ResidualRank>(&self, data: &VcovData<D>) -> VcovResult<Array2<f64>> {
        match self {
            VcovMethodData::Simple(e) => e.shat(data),
            VcovMethodData::White(e) => e.shat(data),
            VcovMethodData::Cluster(e) => e.shat(data),
        }
    }

    fn vcov<D: ResidualRank>(&self, data: VcovData<D>) -> VcovResult<Array2<f64>> {
        match self {
            VcovMethodData::Simple(e) => e.vcov(data),
            VcovMethodData::White(e) => e.vcov(data),
            VcovMethodData::Cluster(e) => e.vcov(data),
        }
    }
}
