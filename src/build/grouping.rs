//! Grouping of unsorted tuples by their final index
//!
//! The build engine does not sort. It consumes tuples already arranged so
//! that all tuples sharing an index are adjacent, with every tuple after the
//! first of its group marked [`DUPLICATE`]. [`TupleGrouping`] produces that
//! arrangement with a stable sort, so duplicates keep their input order and
//! the assembled value is the left-to-right fold of the group.
//!
//! Slices handed to the build engine must not cut a group in two: a group
//! belongs to the slice holding its head and must end inside it.
//! [`TupleGrouping::slices`] cuts slices that respect this, and
//! [`check_slices`] verifies it for any partition.

use rayon::prelude::*;

use crate::error::{ReduceError, Result};
use crate::partition::{partition_point, TaskPartition};

/// Marker in `index_work` for a tuple that repeats the previous tuple's index
pub const DUPLICATE: i64 = -1;

/// Largest tuple index a grouping can hold; `index_work` stores indices as `i64`
pub const MAX_INDEX: usize = i64::MAX as usize;

/// Borrowed dedup map: the grouped index array and the permutation into
/// the input value array
#[derive(Debug, Clone, Copy)]
pub struct DedupMap<'a> {
    /// Final index of each group head, [`DUPLICATE`] for the rest (`I_work`)
    pub index_work: &'a [i64],
    /// Input position of the tuple at each sorted position (`K_work`);
    /// `None` when the input was already in order
    pub key_work: Option<&'a [usize]>,
}

impl DedupMap<'_> {
    /// Input position of the tuple at sorted position `t`
    #[inline]
    pub fn key(&self, t: usize) -> usize {
        match self.key_work {
            Some(keys) => keys[t],
            None => t,
        }
    }

    #[inline]
    pub fn is_head(&self, t: usize) -> bool {
        self.index_work[t] >= 0
    }

    /// Number of duplicate markers
    pub fn count_duplicates(&self) -> usize {
        self.index_work.iter().filter(|&&i| i < 0).count()
    }
}

/// Owned dedup map produced from a list of tuple indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleGrouping {
    index_work: Vec<i64>,
    key_work: Option<Vec<usize>>,
    ndupl: usize,
}

impl TupleGrouping {
    /// Groups tuples by index with a stable sort
    ///
    /// The permutation is skipped entirely when `indices` is already
    /// non-decreasing.
    ///
    /// # Panics
    ///
    /// Panics if any index exceeds [`MAX_INDEX`].
    pub fn from_indices(indices: &[usize]) -> Self {
        if let Some(&i) = indices.iter().find(|&&i| i64::try_from(i).is_err()) {
            panic!("tuple index {} exceeds the largest groupable index {}", i, MAX_INDEX);
        }
        let sorted = indices.windows(2).all(|w| w[0] <= w[1]);

        let key_work = if sorted {
            None
        } else {
            let mut keys: Vec<usize> = (0..indices.len()).collect();
            keys.par_sort_by_key(|&k| indices[k]);
            Some(keys)
        };

        let sorted_index = |t: usize| match &key_work {
            Some(keys) => indices[keys[t]],
            None => indices[t],
        };

        let mut index_work = Vec::with_capacity(indices.len());
        let mut ndupl = 0;
        for t in 0..indices.len() {
            let i = sorted_index(t);
            if t > 0 && sorted_index(t - 1) == i {
                index_work.push(DUPLICATE);
                ndupl += 1;
            } else {
                index_work.push(i as i64);
            }
        }

        tracing::debug!(nvals = indices.len(), ndupl, presorted = sorted, "grouped tuples");
        Self {
            index_work,
            key_work,
            ndupl,
        }
    }

    pub fn as_map(&self) -> DedupMap<'_> {
        DedupMap {
            index_work: &self.index_work,
            key_work: self.key_work.as_deref(),
        }
    }

    /// Number of input tuples
    pub fn nvals(&self) -> usize {
        self.index_work.len()
    }

    /// Number of tuples that repeat an earlier index
    pub fn ndupl(&self) -> usize {
        self.ndupl
    }

    /// Number of distinct indices
    pub fn n_unique(&self) -> usize {
        self.nvals() - self.ndupl
    }

    pub fn index_work(&self) -> &[i64] {
        &self.index_work
    }

    pub fn key_work(&self) -> Option<&[usize]> {
        self.key_work.as_deref()
    }

    /// Cuts `ntasks` slices of roughly equal size, each boundary moved
    /// forward to the next group head
    pub fn slices(&self, ntasks: usize) -> TaskPartition {
        let n = self.nvals();
        let ntasks = ntasks.max(1);
        let mut bounds = Vec::with_capacity(ntasks + 1);
        bounds.push(0);
        for tid in 1..ntasks {
            let mut b = partition_point(tid, n, ntasks).max(bounds[tid - 1]);
            while b < n && self.index_work[b] < 0 {
                b += 1;
            }
            bounds.push(b);
        }
        bounds.push(n);

        // bounds start at 0, end at n and never decrease
        TaskPartition::from_bounds_unchecked(&bounds)
    }

    /// Checks that no slice of `partition` cuts a group
    pub fn validate(&self, partition: &TaskPartition) -> Result<()> {
        check_slices(self.as_map(), partition)
    }
}

/// Checks that `partition` covers the tuples of `map` and that every group
/// ends inside the slice holding its head
pub fn check_slices(map: DedupMap<'_>, partition: &TaskPartition) -> Result<()> {
    let n = map.index_work.len();
    if partition.len() != n {
        return Err(ReduceError::InvalidPartition {
            reason: format!("partition covers {} tuples, map has {}", partition.len(), n),
        });
    }

    for boundary in partition.starts().iter().copied().filter(|&b| b > 0 && b < n) {
        if !map.is_head(boundary) {
            let head = (0..boundary).rev().find(|&t| map.is_head(t)).unwrap_or(0);
            return Err(ReduceError::GroupingViolation { head, boundary });
        }
    }
    Ok(())
}
