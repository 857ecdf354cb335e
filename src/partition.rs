//! Task partitions over a stored-entry or tuple index range
//!
//! A [`TaskPartition`] splits `0..n` into ordered, disjoint, contiguous
//! slices that together cover the range exactly once. Both engines take one:
//! the reduction engine gives each slice its own workspace slot, the build
//! engine gives each slice its own output region.

use std::ops::Range;

use crate::config::ReduceConfig;
use crate::error::{ReduceError, Result};

/// Start of task `tid`'s slice in an even split of `n` items over `ntasks` tasks
#[inline]
pub fn partition_point(tid: usize, n: usize, ntasks: usize) -> usize {
    ((tid as u128 * n as u128) / ntasks as u128) as usize
}

/// Ordered `(start, length)` slices covering `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPartition {
    starts: Vec<usize>,
    lengths: Vec<usize>,
    n: usize,
}

impl TaskPartition {
    /// Splits `0..n` into `ntasks` slices whose lengths differ by at most one
    ///
    /// Task `t` starts at `floor(t * n / ntasks)`. A request for zero tasks
    /// is treated as one.
    pub fn even(n: usize, ntasks: usize) -> Self {
        let ntasks = ntasks.max(1);
        let bounds: Vec<usize> = (0..=ntasks).map(|t| partition_point(t, n, ntasks)).collect();
        Self::from_bounds_unchecked(&bounds)
    }

    /// Builds a partition from explicit slices, checking that they cover
    /// `0..n` exactly once and in order
    pub fn from_slices(starts: Vec<usize>, lengths: Vec<usize>, n: usize) -> Result<Self> {
        if starts.is_empty() || starts.len() != lengths.len() {
            return Err(ReduceError::InvalidPartition {
                reason: format!(
                    "{} starts and {} lengths; need the same non-zero count",
                    starts.len(),
                    lengths.len()
                ),
            });
        }

        let mut expected = 0;
        for (k, (&start, &len)) in starts.iter().zip(&lengths).enumerate() {
            if start != expected {
                return Err(ReduceError::InvalidPartition {
                    reason: format!("slice {} starts at {}, expected {}", k, start, expected),
                });
            }
            expected = start + len;
        }
        if expected != n {
            return Err(ReduceError::InvalidPartition {
                reason: format!("slices end at {}, range has {} items", expected, n),
            });
        }

        Ok(Self { starts, lengths, n })
    }

    /// Builds a partition from `ntasks + 1` non-decreasing boundaries
    /// `[0, b1, ..., n]`
    pub fn from_bounds(bounds: &[usize]) -> Result<Self> {
        if bounds.len() < 2 || bounds[0] != 0 {
            return Err(ReduceError::InvalidPartition {
                reason: "boundaries must start at 0 and name at least one slice".to_string(),
            });
        }
        if let Some(w) = bounds.windows(2).find(|w| w[1] < w[0]) {
            return Err(ReduceError::InvalidPartition {
                reason: format!("boundary {} follows {}", w[1], w[0]),
            });
        }
        Ok(Self::from_bounds_unchecked(bounds))
    }

    /// Builds a partition from boundaries already known to start at 0 and
    /// never decrease
    pub(crate) fn from_bounds_unchecked(bounds: &[usize]) -> Self {
        debug_assert!(bounds.len() >= 2 && bounds[0] == 0);
        debug_assert!(bounds.windows(2).all(|w| w[0] <= w[1]));
        let starts = bounds[..bounds.len() - 1].to_vec();
        let lengths = bounds.windows(2).map(|w| w[1] - w[0]).collect();
        Self {
            starts,
            lengths,
            n: bounds[bounds.len() - 1],
        }
    }

    pub fn ntasks(&self) -> usize {
        self.starts.len()
    }

    /// Size of the covered range
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn range(&self, tid: usize) -> Range<usize> {
        self.starts[tid]..self.starts[tid] + self.lengths[tid]
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.ntasks()).map(move |tid| self.range(tid))
    }

    /// The `ntasks + 1` slice boundaries
    pub fn bounds(&self) -> Vec<usize> {
        let mut bounds = self.starts.clone();
        bounds.push(self.n);
        bounds
    }
}

/// How many tasks and threads a call should use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub ntasks: usize,
    pub nthreads: usize,
}

/// Chooses `ntasks` and `nthreads` for `work` items
///
/// One thread per `config.chunk` items, capped at the configured thread
/// count; with more than one thread, `tasks_per_thread` tasks per thread
/// (never more tasks than items) so uneven early exits balance out.
pub fn plan(work: usize, config: &ReduceConfig) -> Plan {
    let max_threads = config.system_params.n_threads.max(1);
    let nthreads = (work / config.chunk.max(1)).clamp(1, max_threads);
    let ntasks = if nthreads == 1 {
        1
    } else {
        (config.tasks_per_thread.max(1) * nthreads).min(work).max(1)
    };
    tracing::debug!(work, ntasks, nthreads, "planned task partition");
    Plan { ntasks, nthreads }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_partition_covers() {
        let p = TaskPartition::even(10, 3);
        assert_eq!(p.starts(), &[0, 3, 6]);
        assert_eq!(p.lengths(), &[3, 3, 4]);
        assert_eq!(p.bounds(), vec![0, 3, 6, 10]);
        assert_eq!(p.ranges().map(|r| r.len()).sum::<usize>(), 10);
    }

    #[test]
    fn test_even_more_tasks_than_items() {
        let p = TaskPartition::even(2, 4);
        assert_eq!(p.ntasks(), 4);
        assert_eq!(p.lengths().iter().sum::<usize>(), 2);
        assert!(p.lengths().iter().any(|&l| l == 0));
    }

    #[test]
    fn test_even_zero_tasks() {
        let p = TaskPartition::even(5, 0);
        assert_eq!(p.ntasks(), 1);
        assert_eq!(p.range(0), 0..5);
    }

    #[test]
    fn test_from_slices_validates() {
        assert!(TaskPartition::from_slices(vec![0, 3], vec![3, 2], 5).is_ok());
        assert!(TaskPartition::from_slices(vec![0, 2], vec![3, 2], 5).is_err());
        assert!(TaskPartition::from_slices(vec![0, 3], vec![3, 1], 5).is_err());
        assert!(TaskPartition::from_slices(vec![], vec![], 0).is_err());
    }

    #[test]
    fn test_from_bounds() {
        let p = TaskPartition::from_bounds(&[0, 0, 4, 9]).unwrap();
        assert_eq!(p.lengths(), &[0, 4, 5]);
        assert!(TaskPartition::from_bounds(&[0, 5, 4]).is_err());
        assert!(TaskPartition::from_bounds(&[1, 5]).is_err());
    }

    #[test]
    fn test_plan() {
        let mut config = ReduceConfig::with_threads(4);
        config.chunk = 100;

        assert_eq!(plan(50, &config), Plan { ntasks: 1, nthreads: 1 });
        assert_eq!(plan(250, &config), Plan { ntasks: 128, nthreads: 2 });
        assert_eq!(plan(1_000_000, &config), Plan { ntasks: 256, nthreads: 4 });
    }
}
