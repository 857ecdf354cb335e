//! Reduction of a matrix's entries to a single scalar
//!
//! Each task reduces its slice of the stored-entry range into its own
//! workspace slot. Two per-task methods exist:
//!
//! - **presence-aware** ([`scalar`]): used when the matrix has zombies or is
//!   a bitmap; dead positions are skipped one by one.
//! - **panel** ([`panel`]): used when every stored position is live; the
//!   slice is folded through a panel of independent accumulators.
//!
//! After all tasks finish, their partials are folded into the caller's
//! running value in task order. That sequential merge is the only
//! synchronization point.

pub mod panel;
pub mod scalar;
pub mod terminal;

use rayon::prelude::*;

use crate::config::ReduceConfig;
use crate::error::Result;
use crate::matrix::{Entries, Matrix};
use crate::monoid::Monoid;
use crate::partition::TaskPartition;
use crate::types::Scalar;
use crate::workspace::Workspace;

use terminal::EarlyExit;

/// Tuning knobs of the scalar reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Panel path tests for a terminal value once every this many panels
    pub terminal_check_panels: usize,
    /// Let one task's terminal partial stop the other tasks
    pub cross_task_exit: bool,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            terminal_check_panels: 1,
            cross_task_exit: true,
        }
    }
}

impl From<&ReduceConfig> for ReduceOptions {
    fn from(config: &ReduceConfig) -> Self {
        Self {
            terminal_check_panels: config.terminal_check_panels.max(1),
            cross_task_exit: config.cross_task_exit,
        }
    }
}

/// Folds every live entry of `matrix` into `result`
///
/// On entry `result` holds the caller's running value; on success it holds
/// `result ⊕ (all live entries)`. The stored-entry range is split evenly
/// into `ntasks` tasks run on up to `nthreads` threads of the current rayon
/// pool.
///
/// Returns `NotSupported` without touching `result` or `workspace` if the
/// monoid is disabled.
///
/// # Panics
///
/// Panics if `workspace` has fewer than `ntasks` slots.
///
/// # Examples
///
/// ```
/// use spreduce::{reduce_to_scalar, FullMatrix, Matrix, Monoid, Workspace};
///
/// let a = Matrix::from(FullMatrix::column(vec![1u64, 2, 3, 4, 5]));
/// let plus = Monoid::<u64>::plus();
/// let mut ws = Workspace::new(2, 0);
///
/// let mut s = plus.identity();
/// reduce_to_scalar(&mut s, &a, &plus, &mut ws, 2, 1).unwrap();
/// assert_eq!(s, 15);
/// ```
pub fn reduce_to_scalar<T: Scalar>(
    result: &mut T,
    matrix: &Matrix<T>,
    monoid: &Monoid<T>,
    workspace: &mut Workspace<T>,
    ntasks: usize,
    nthreads: usize,
) -> Result<()> {
    let entries = matrix.entries();
    let partition = TaskPartition::even(entries.len(), ntasks);
    reduce_partitioned(
        result,
        entries,
        monoid,
        workspace,
        &partition,
        nthreads,
        &ReduceOptions::default(),
    )
}

/// [`reduce_to_scalar`] over an explicit entry view and task partition
///
/// # Panics
///
/// Panics if `partition` does not cover `entries`, or if `workspace` has
/// fewer slots than `partition` has tasks.
pub fn reduce_partitioned<T: Scalar>(
    result: &mut T,
    entries: Entries<'_, T>,
    monoid: &Monoid<T>,
    workspace: &mut Workspace<T>,
    partition: &TaskPartition,
    nthreads: usize,
    options: &ReduceOptions,
) -> Result<()> {
    monoid.check_enabled()?;
    assert_eq!(
        partition.len(),
        entries.len(),
        "partition must cover every stored entry"
    );

    let ntasks = partition.ntasks();
    let (partials, found) = workspace.split(ntasks);
    let exit = EarlyExit::new(options.cross_task_exit && monoid.has_terminal());
    let presence_aware = entries.needs_presence_check();

    tracing::debug!(
        monoid = %monoid.full_name(),
        path = if presence_aware { "presence" } else { "panel" },
        entries = entries.len(),
        ntasks,
        nthreads,
        "reducing to scalar"
    );

    let run_task = |tid: usize, partial: &mut T, has_value: &mut bool| {
        let range = partition.range(tid);
        let t = if presence_aware {
            scalar::reduce_slice(&entries, range, monoid, &exit)
        } else {
            panel::reduce_slice(
                &entries.values[range],
                monoid,
                options.terminal_check_panels,
                &exit,
            )
        };
        *has_value = t.is_some();
        if let Some(t) = t {
            *partial = t;
        }
    };

    if nthreads <= 1 || ntasks <= 1 {
        for (tid, (w, f)) in partials.iter_mut().zip(found.iter_mut()).enumerate() {
            run_task(tid, w, f);
        }
    } else {
        let min_len = ntasks.div_ceil(nthreads);
        partials
            .par_iter_mut()
            .zip(found.par_iter_mut())
            .enumerate()
            .with_min_len(min_len)
            .for_each(|(tid, (w, f))| run_task(tid, w, f));
    }

    *result = merge(*result, partials, found, monoid);
    Ok(())
}

/// Folds the partials of the tasks that found something into `seed`, in task order
///
/// Stops as soon as the running value is terminal.
pub fn merge<T: Scalar>(seed: T, partials: &[T], found: &[bool], monoid: &Monoid<T>) -> T {
    let mut s = seed;
    for (&w, _) in partials.iter().zip(found).filter(|&(_, &f)| f) {
        monoid.combine_into(&mut s, w);
        if monoid.is_terminal(s) {
            break;
        }
    }
    s
}
