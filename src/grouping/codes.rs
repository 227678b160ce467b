//! grouping::codes — dense integer group codes and combined-key grouping.
//!
//! Purpose
//! -------
//! Represent a categorical column as one integer code per row together with
//! the number of distinct groups, and provide the pure operations the
//! cluster estimator needs on top of that representation: pooling raw
//! labels into codes, intersecting several code columns into a single
//! combined grouping, and restricting codes to a subset of rows.
//!
//! Invariants & assumptions
//! ------------------------
//! - Codes are **dense**: every code lies in `0..ngroups` and every value in
//!   that range occurs at least once. Cardinality therefore always reflects
//!   the rows actually present.
//! - Code assignment follows first-seen order, so two runs on the same input
//!   produce identical codes.
//!
//! Conventions
//! -----------
//! - Codes are `u32`; row indices are `usize`.
//! - Combined groupings are recomputed on demand. No cache is shared between
//!   calls since each intersection is independent and linear in `n`.
use crate::grouping::errors::{GroupingError, GroupingResult};
use std::{collections::HashMap, hash::Hash};

/// GroupCodes — dense per-row group codes with their cardinality.
///
/// Fields
/// ------
/// - `codes`: `Vec<u32>`
///   One code per row, each in `0..ngroups`.
/// - `ngroups`: `usize`
///   Number of distinct groups among `codes`.
///
/// Invariants
/// ----------
/// - `codes.iter().max() + 1 == ngroups` whenever `codes` is non-empty, and
///   every code below `ngroups` occurs at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCodes {
    codes: Vec<u32>,
    ngroups: usize,
}

impl GroupCodes {
    /// Build group codes from arbitrary integer codes, relabelling them
    /// densely in first-seen order.
    ///
    /// Parameters
    /// ----------
    /// - `raw`: `&[u32]`
    ///   Per-row codes as produced by an upstream grouping step. Gaps in the
    ///   code range (e.g. after subsetting) are allowed.
    ///
    /// Returns
    /// -------
    /// `GroupCodes`
    ///   Dense codes whose cardinality equals the number of distinct inputs.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use robust_vcov::grouping::GroupCodes;
    /// let g = GroupCodes::new(&[7, 7, 3, 9, 3]);
    /// assert_eq!(g.codes(), &[0, 0, 1, 2, 1]);
    /// assert_eq!(g.ngroups(), 3);
    /// ```
    pub fn new(raw: &[u32]) -> GroupCodes {
        GroupCodes::from_labels(raw)
    }

    /// Pool hashable labels (strings, integers, tuples) into dense codes.
    ///
    /// Labels are numbered in order of first appearance.
    pub fn from_labels<T: Hash + Eq>(labels: &[T]) -> GroupCodes {
        let mut seen: HashMap<&T, u32> = HashMap::with_capacity(labels.len().min(1024));
        let mut codes = Vec::with_capacity(labels.len());
        for label in labels {
            let next = seen.len() as u32;
            codes.push(*seen.entry(label).or_insert(next));
        }
        GroupCodes { ngroups: seen.len(), codes }
    }

    /// Intersect several groupings into one combined grouping.
    ///
    /// Parameters
    /// ----------
    /// - `parts`: `&[&GroupCodes]`
    ///   Groupings over the same rows. Must be non-empty and of equal length.
    ///
    /// Returns
    /// -------
    /// `GroupCodes`
    ///   Codes identifying each distinct tuple `(parts[0][i], parts[1][i], …)`;
    ///   the cardinality is the number of distinct tuples present.
    ///
    /// Panics
    /// ------
    /// - If `parts` is empty or the parts differ in length; callers in this
    ///   crate validate lengths before combining.
    pub fn combine(parts: &[&GroupCodes]) -> GroupCodes {
        assert!(!parts.is_empty(), "combine needs at least one grouping");
        if parts.len() == 1 {
            return parts[0].clone();
        }
        let n = parts[0].len();
        assert!(parts.iter().all(|p| p.len() == n), "groupings must share the row count");

        let keys: Vec<Vec<u32>> =
            (0..n).map(|i| parts.iter().map(|p| p.codes[i]).collect()).collect();
        GroupCodes::from_labels(&keys)
    }

    /// Restrict codes to the rows where `mask` is `true` and recompact them.
    ///
    /// Errors
    /// ------
    /// - `GroupingError::MaskLength` if `mask.len() != self.len()`.
    pub fn subset(&self, mask: &[bool]) -> GroupingResult<GroupCodes> {
        if mask.len() != self.len() {
            return Err(GroupingError::MaskLength { expected: self.len(), found: mask.len() });
        }
        let kept: Vec<u32> =
            self.codes.iter().zip(mask).filter(|(_, keep)| **keep).map(|(c, _)| *c).collect();
        Ok(GroupCodes::new(&kept))
    }

    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Number of distinct groups.
    pub fn ngroups(&self) -> usize {
        self.ngroups
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
