//! Deduplicating assembly of grouped tuples
//!
//! Given tuples grouped by a [`DedupMap`] and a partition of the sorted tuple
//! range, each task walks its slice and emits one output tuple per group
//! head, folding the group's values in input order. A group's value is
//! seeded with its first contribution rather than the identity.
//!
//! Output regions are disjoint per task: task `tid` writes starting at the
//! number of group heads in all earlier slices. The engine splits the output
//! buffers into those regions up front, so no two tasks can touch the same
//! slot.

pub mod grouping;

use std::ops::Range;

use rayon::prelude::*;

use crate::error::Result;
use crate::monoid::Monoid;
use crate::partition::TaskPartition;
use crate::reduce::terminal::fold_and_test;
use crate::types::Scalar;
use crate::utils::exclusive_scan;

pub use grouping::{check_slices, DedupMap, TupleGrouping, DUPLICATE, MAX_INDEX};

/// Assembles one `(index, value)` output tuple per group of `map`
///
/// `in_values` is indexed through `map.key_work`; `nvals` is the number of
/// tuples and `ndupl` the number of [`DUPLICATE`] markers. Returns the
/// number of output tuples, `nvals - ndupl`, written to the front of
/// `out_values`/`out_indices`.
///
/// Returns `NotSupported` without writing anything if the monoid is
/// disabled.
///
/// # Panics
///
/// Panics if `map` does not hold `nvals` tuples, if `partition` does not
/// cover them, if `ndupl` disagrees with the map, or if an output buffer is
/// shorter than `nvals - ndupl`. Debug builds also check that no slice cuts
/// a group.
#[allow(clippy::too_many_arguments)]
pub fn build_with_dedup<T: Scalar>(
    out_values: &mut [T],
    out_indices: &mut [usize],
    in_values: &[T],
    nvals: usize,
    ndupl: usize,
    map: DedupMap<'_>,
    partition: &TaskPartition,
    monoid: &Monoid<T>,
    nthreads: usize,
) -> Result<usize> {
    monoid.check_enabled()?;

    assert_eq!(map.index_work.len(), nvals, "dedup map must hold nvals tuples");
    assert_eq!(partition.len(), nvals, "partition must cover every tuple");
    assert!(ndupl <= nvals, "ndupl {} exceeds nvals {}", ndupl, nvals);
    let nout = nvals - ndupl;
    assert!(
        out_values.len() >= nout && out_indices.len() >= nout,
        "output buffers must hold {} tuples",
        nout
    );
    debug_assert_eq!(map.count_duplicates(), ndupl, "ndupl disagrees with the dedup map");
    debug_assert!(
        check_slices(map, partition).is_ok(),
        "a slice boundary cuts a duplicate group"
    );

    let ntasks = partition.ntasks();
    let parallel = nthreads > 1 && ntasks > 1;
    let min_len = ntasks.div_ceil(nthreads.max(1));

    tracing::debug!(
        monoid = %monoid.full_name(),
        nvals,
        ndupl,
        ntasks,
        nthreads,
        "assembling tuples"
    );

    if ndupl == 0 {
        permute(
            &mut out_values[..nout],
            &mut out_indices[..nout],
            in_values,
            map,
            parallel,
        );
        return Ok(nout);
    }

    let count_heads = |range: Range<usize>| range.filter(|&t| map.is_head(t)).count();
    let heads: Vec<usize> = if parallel {
        (0..ntasks)
            .into_par_iter()
            .with_min_len(min_len)
            .map(|tid| count_heads(partition.range(tid)))
            .collect()
    } else {
        partition.ranges().map(count_heads).collect()
    };
    let offsets = exclusive_scan(&heads);
    assert_eq!(
        offsets[ntasks], nout,
        "ndupl does not match the number of duplicate markers"
    );

    let value_regions = split_by_counts(&mut out_values[..nout], &heads);
    let index_regions = split_by_counts(&mut out_indices[..nout], &heads);

    let run_task = |tid: usize, values: &mut [T], indices: &mut [usize]| {
        assemble_slice(partition.range(tid), map, in_values, monoid, values, indices);
    };

    if parallel {
        value_regions
            .into_par_iter()
            .zip(index_regions)
            .enumerate()
            .with_min_len(min_len)
            .for_each(|(tid, (values, indices))| run_task(tid, values, indices));
    } else {
        for (tid, (values, indices)) in value_regions.into_iter().zip(index_regions).enumerate() {
            run_task(tid, values, indices);
        }
    }

    Ok(nout)
}

/// Emits the groups whose heads lie in `range`
///
/// Leading duplicates belong to a group headed in an earlier slice and are
/// skipped; the last group is followed past the end of `range` until the
/// next head. Once a group's value is terminal its remaining duplicates are
/// skipped without being folded.
fn assemble_slice<T: Scalar>(
    range: Range<usize>,
    map: DedupMap<'_>,
    in_values: &[T],
    monoid: &Monoid<T>,
    out_values: &mut [T],
    out_indices: &mut [usize],
) {
    let nvals = map.index_work.len();
    let mut t = range.start;
    while t < range.end && !map.is_head(t) {
        t += 1;
    }

    let mut out = 0;
    while t < range.end {
        let index = map.index_work[t] as usize;
        let mut acc = in_values[map.key(t)];
        let mut terminal = monoid.is_terminal(acc);
        t += 1;
        while t < nvals && !map.is_head(t) {
            if !terminal {
                terminal = fold_and_test(monoid, &mut acc, in_values[map.key(t)]);
            }
            t += 1;
        }
        out_values[out] = acc;
        out_indices[out] = index;
        out += 1;
    }
    debug_assert_eq!(out, out_values.len());
}

/// The duplicate-free case: every tuple is its own group
fn permute<T: Scalar>(
    out_values: &mut [T],
    out_indices: &mut [usize],
    in_values: &[T],
    map: DedupMap<'_>,
    parallel: bool,
) {
    let emit = |t: usize, v: &mut T, i: &mut usize| {
        *v = in_values[map.key(t)];
        *i = map.index_work[t] as usize;
    };
    if parallel {
        out_values
            .par_iter_mut()
            .zip(out_indices.par_iter_mut())
            .enumerate()
            .for_each(|(t, (v, i))| emit(t, v, i));
    } else {
        for (t, (v, i)) in out_values.iter_mut().zip(out_indices.iter_mut()).enumerate() {
            emit(t, v, i);
        }
    }
}

/// Cuts `buf` into consecutive disjoint regions of the given lengths
fn split_by_counts<'a, U>(mut buf: &'a mut [U], counts: &[usize]) -> Vec<&'a mut [U]> {
    let mut regions = Vec::with_capacity(counts.len());
    for &count in counts {
        let (head, tail) = std::mem::take(&mut buf).split_at_mut(count);
        regions.push(head);
        buf = tail;
    }
    regions
}

/// Groups `indices`, then assembles one tuple per distinct index
///
/// Allocates the outputs and cuts `ntasks` group-aligned slices. The result
/// is sorted by index.
///
/// # Panics
///
/// Panics if the two slices differ in length or an index exceeds
/// [`MAX_INDEX`].
///
/// # Examples
///
/// ```
/// use spreduce::{build, Monoid};
///
/// let plus = Monoid::<i32>::plus();
/// let (indices, values) = build(&[2, 0, 2, 1], &[10, 1, 5, 7], &plus, 2, 1).unwrap();
/// assert_eq!(indices, vec![0, 1, 2]);
/// assert_eq!(values, vec![1, 7, 15]);
/// ```
pub fn build<T: Scalar>(
    indices: &[usize],
    values: &[T],
    monoid: &Monoid<T>,
    ntasks: usize,
    nthreads: usize,
) -> Result<(Vec<usize>, Vec<T>)> {
    monoid.check_enabled()?;
    assert_eq!(indices.len(), values.len(), "indices.len() must equal values.len()");

    let grouping = TupleGrouping::from_indices(indices);
    let partition = grouping.slices(ntasks);
    let nout = grouping.n_unique();

    let mut out_values = vec![monoid.identity(); nout];
    let mut out_indices = vec![0usize; nout];
    build_with_dedup(
        &mut out_values,
        &mut out_indices,
        values,
        grouping.nvals(),
        grouping.ndupl(),
        grouping.as_map(),
        &partition,
        monoid,
        nthreads,
    )?;
    Ok((out_indices, out_values))
}
