//! covariance::cluster — one- and multi-way cluster-robust covariance.
//!
//! Purpose
//! -------
//! Implement the Cameron–Gelbach–Miller multi-way cluster estimator. For
//! grouping variables `{c₁,…,c_m}` the meat is the signed sum over every
//! non-empty subset `c` of
//!
//! ```text
//! S(c) = G_c/(G_c − 1) · A_cᵀ A_c,     A_c[g, :] = Σ_{i ∈ g} kron_i,
//! S    = Σ_{c ≠ ∅} (−1)^{|c|+1} S(c),
//! ```
//!
//! where `G_c` is the number of groups in the intersection of the variables
//! in `c`. Two-way clustering thus reads `S(c₁) + S(c₂) − S(c₁∩c₂)`.
//!
//! Key behaviors
//! -------------
//! - [`ClusterData`] is the prepared, dataset-bound state: one dense code
//!   column per declared variable plus its cardinality. It is built once and
//!   shared read-only across any number of `shat`/`vcov` calls.
//! - [`inclusion_exclusion_terms`] enumerates the `2^m − 1` subsets with
//!   explicit signs.
//! - When a subset's grouping has one row per group the term collapses to
//!   the White meat `Σ kron_i kron_iᵀ` with no finite-sample factor
//!   (Petersen 2009; Thompson 2011).
//! - `vcov` scales the meat by `(n − 1) / df_residual` before the sandwich
//!   (White uses `n / df_residual`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every code column has exactly `nobs` entries for the data it is
//!   applied to; otherwise [`VcovError::GroupLengthMismatch`] is returned.
//! - Aggregated terms need `G_c ≥ 2`; a single-group term that is not also
//!   the singleton case returns [`VcovError::InsufficientClusters`].
//!
//! Testing notes
//! -------------
//! - Unit tests check the subset enumeration and signs, the singleton
//!   degeneracy against White, and the two-way inclusion–exclusion identity.
use crate::{
    covariance::{
        data::{ResidualRank, VcovData},
        errors::{VcovError, VcovResult},
        method::CovarianceEstimator,
        sandwich::{sandwich, score_matrix},
    },
    grouping::{ColumnSource, GroupCodes},
};
use log::{debug, warn};
use ndarray::Array2;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashSet},
};

/// Largest number of grouping variables; subsets are enumerated as `u32`
/// bitmasks.
pub const MAX_CLUSTER_VARIABLES: usize = 31;

/// One term of the inclusion–exclusion sum over grouping variables.
///
/// Fields
/// ------
/// - `members`: indices (into the declared variable list) forming the
///   intersection, in increasing order.
/// - `sign`: `+1.0` for odd `|members|`, `−1.0` for even.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSubset {
    pub members: Vec<usize>,
    pub sign: f64,
}

/// Enumerate all non-empty subsets of `0..m` with their inclusion–exclusion
/// signs `(−1)^{|c|+1}`.
///
/// Subsets are ordered by size, then lexicographically, so single-variable
/// terms come first.
///
/// Examples
/// --------
/// ```rust
/// # use robust_vcov::covariance::inclusion_exclusion_terms;
/// let terms = inclusion_exclusion_terms(2);
/// let signs: Vec<f64> = terms.iter().map(|t| t.sign).collect();
/// assert_eq!(terms[2].members, vec![0, 1]);
/// assert_eq!(signs, vec![1.0, 1.0, -1.0]);
/// ```
///
/// Panics
/// ------
/// - If `m > MAX_CLUSTER_VARIABLES`. [`ClusterData::new`] enforces the same
///   bound and reports it as an error.
pub fn inclusion_exclusion_terms(m: usize) -> Vec<ClusterSubset> {
    assert!(
        m <= MAX_CLUSTER_VARIABLES,
        "at most {MAX_CLUSTER_VARIABLES} grouping variables are supported, got {m}"
    );
    let mut masks: Vec<u32> = (1..(1u32 << m)).collect();
    masks.sort_by_key(|mask| (mask.count_ones(), Reverse(mask.reverse_bits())));
    masks
        .into_iter()
        .map(|mask| {
            let members: Vec<usize> = (0..m).filter(|&i| mask & (1 << i) != 0).collect();
            let sign = if members.len() % 2 == 1 { 1.0 } else { -1.0 };
            ClusterSubset { members, sign }
        })
        .collect()
}

/// ClusterData — prepared grouping state for the cluster estimator.
///
/// Fields
/// ------
/// - `names`: declared grouping variables, in declaration order.
/// - `groups`: dense codes for each variable (same order as `names`).
///
/// Invariants
/// ----------
/// - `names` is non-empty and free of duplicates.
/// - All code columns have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterData {
    names: Vec<String>,
    groups: Vec<GroupCodes>,
}

impl ClusterData {
    /// Assemble cluster data from already materialized code columns.
    ///
    /// Errors
    /// ------
    /// - `VcovError::InvalidClusterSpec` if the list is empty, names repeat,
    ///   more than [`MAX_CLUSTER_VARIABLES`] are declared, or the number of
    ///   names and code columns differ.
    /// - `VcovError::GroupLengthMismatch` if code columns differ in length.
    pub fn new(names: Vec<String>, groups: Vec<GroupCodes>) -> VcovResult<ClusterData> {
        validate_names(&names)?;
        if names.len() != groups.len() {
            return Err(VcovError::InvalidClusterSpec(format!(
                "{} names for {} code columns",
                names.len(),
                groups.len()
            )));
        }
        let n = groups[0].len();
        if let Some((name, codes)) = names.iter().zip(&groups).find(|(_, g)| g.len() != n) {
            return Err(VcovError::GroupLengthMismatch {
                name: name.clone(),
                expected: n,
                found: codes.len(),
            });
        }
        for (name, codes) in names.iter().zip(&groups) {
            if codes.ngroups() < 2 {
                warn!("cluster variable `{name}` has {} group(s)", codes.ngroups());
            }
        }
        Ok(ClusterData { names, groups })
    }

    /// Materialize codes for `names` from a column source.
    ///
    /// Errors
    /// ------
    /// - `VcovError::Grouping` when a column is missing or is not
    ///   grouping-coded.
    pub fn from_source<T: ColumnSource + ?Sized>(
        names: &[String], source: &T,
    ) -> VcovResult<ClusterData> {
        let groups = names
            .iter()
            .map(|name| source.group_codes(name).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        ClusterData::new(names.to_vec(), groups)
    }

    /// Like [`from_source`](Self::from_source) but keep only rows where
    /// `esample` is `true`, recompacting codes so cardinalities count only
    /// retained rows.
    pub fn from_source_subset<T: ColumnSource + ?Sized>(
        names: &[String], source: &T, esample: &[bool],
    ) -> VcovResult<ClusterData> {
        let groups = names
            .iter()
            .map(|name| source.group_codes(name).and_then(|codes| codes.subset(esample)))
            .collect::<Result<Vec<_>, _>>()?;
        ClusterData::new(names.to_vec(), groups)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn groups(&self) -> &[GroupCodes] {
        &self.groups
    }

    /// Cardinality of a declared grouping variable.
    pub fn cardinality(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name).map(|i| self.groups[i].ngroups())
    }

    /// Cardinality of every declared grouping variable, keyed by name.
    pub fn nclusters(&self) -> BTreeMap<&str, usize> {
        let counts = self.groups.iter().map(GroupCodes::ngroups);
        self.names.iter().map(String::as_str).zip(counts).collect()
    }

    /// Smallest cardinality across declared grouping variables.
    pub fn min_cardinality(&self) -> usize {
        self.groups.iter().map(GroupCodes::ngroups).min().unwrap_or(0)
    }

    fn check_rows(&self, nobs: usize) -> VcovResult<()> {
        match self.names.iter().zip(&self.groups).find(|(_, g)| g.len() != nobs) {
            Some((name, codes)) => Err(VcovError::GroupLengthMismatch {
                name: name.clone(),
                expected: nobs,
                found: codes.len(),
            }),
            None => Ok(()),
        }
    }

    /// Grouping for one inclusion–exclusion term. Single-variable terms
    /// reuse the prepared codes.
    fn subset_grouping(&self, subset: &ClusterSubset) -> (String, GroupCodes) {
        let label =
            subset.members.iter().map(|&i| self.names[i].as_str()).collect::<Vec<_>>().join("&");
        let grouping = match subset.members.as_slice() {
            [single] => self.groups[*single].clone(),
            members => {
                let parts: Vec<&GroupCodes> = members.iter().map(|&i| &self.groups[i]).collect();
                GroupCodes::combine(&parts)
            }
        };
        (label, grouping)
    }
}

impl CovarianceEstimator for ClusterData {
    /// Signed inclusion–exclusion sum of per-subset cluster meats.
    ///
    /// Errors
    /// ------
    /// - `VcovError::GroupLengthMismatch` if codes do not match `nobs`.
    /// - `VcovError::InsufficientClusters` if an aggregated term has a single
    ///   group.
    fn shat<D: ResidualRank>(&self, data: &VcovData<D>) -> VcovResult<Array2<f64>> {
        let nobs = data.nobs();
        self.check_rows(nobs)?;
        let scores = score_matrix(data.regressors(), data.residual_columns());
        let p = scores.ncols();

        let mut meat = Array2::<f64>::zeros((p, p));
        for subset in inclusion_exclusion_terms(self.names.len()) {
            let (label, grouping) = self.subset_grouping(&subset);
            debug!(
                "cluster term `{label}`: {} groups, sign {:+}",
                grouping.ngroups(),
                subset.sign
            );
            let term = helper_cluster(&scores, &grouping, &label)?;
            meat.scaled_add(subset.sign, &term);
        }
        Ok(meat)
    }

    fn vcov<D: ResidualRank>(&self, data: VcovData<D>) -> VcovResult<Array2<f64>> {
        let mut meat = self.shat(&data)?;
        meat *= (data.nobs() - 1) as f64 / data.df_residual() as f64;
        Ok(sandwich(data.invcrossmatrix(), &meat))
    }
}

// ---- Helper methods ----

fn validate_names(names: &[String]) -> VcovResult<()> {
    if names.is_empty() {
        return Err(VcovError::InvalidClusterSpec("no grouping variables declared".into()));
    }
    if names.len() > MAX_CLUSTER_VARIABLES {
        return Err(VcovError::InvalidClusterSpec(format!(
            "{} grouping variables declared, at most {MAX_CLUSTER_VARIABLES} are supported",
            names.len()
        )));
    }
    let mut seen = HashSet::with_capacity(names.len());
    if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(VcovError::InvalidClusterSpec(format!("`{dup}` is declared twice")));
    }
    Ok(())
}

/// Meat contribution of a single grouping.
///
/// - One row per group: return the White meat `scoresᵀ scores`.
/// - Otherwise: sum score rows within each group into `A` (`G×p`) and
///   return `G/(G−1) · AᵀA`.
fn helper_cluster(
    scores: &Array2<f64>, grouping: &GroupCodes, label: &str,
) -> VcovResult<Array2<f64>> {
    let ngroups = grouping.ngroups();
    if ngroups == scores.nrows() {
        warn!("clustering on `{label}` has one observation per group; using the White meat");
        return Ok(scores.t().dot(scores));
    }
    if ngroups < 2 {
        return Err(VcovError::InsufficientClusters { name: label.to_string(), found: ngroups });
    }

    let mut aggregated = Array2::<f64>::zeros((ngroups, scores.ncols()));
    for (row, &code) in scores.rows().into_iter().zip(grouping.codes()) {
        let mut target = aggregated.row_mut(code as usize);
        target += &row;
    }
    let correction = ngroups as f64 / (ngroups - 1) as f64;
    Ok(aggregated.t().dot(&aggregated) * correction)
}
