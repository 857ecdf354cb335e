//! Panel reduction of one task's slice of a dense value array
//!
//! The slice is cut into panels of the monoid's panel width `w`. Slot `k`
//! of a `w`-wide accumulator folds in element `k` of every panel, so the
//! `w` folds are independent and the inner loop vectorizes. The terminal
//! test looks at the accumulator once every `check_every` panels rather
//! than after each element.

use crate::monoid::{Monoid, MAX_PANEL};
use crate::reduce::terminal::EarlyExit;
use crate::types::Scalar;

/// Reduces `values` with the panel method
///
/// Returns `None` for an empty slice, or when the task was abandoned before
/// it started because another task already reached a terminal value.
pub fn reduce_slice<T: Scalar>(
    values: &[T],
    monoid: &Monoid<T>,
    check_every: usize,
    exit: &EarlyExit,
) -> Option<T> {
    if values.is_empty() || exit.is_set() {
        return None;
    }

    let width = monoid.panel().clamp(1, MAX_PANEL).min(values.len());
    let check_every = check_every.max(1);
    let has_terminal = monoid.has_terminal();

    let mut panel = [monoid.identity(); MAX_PANEL];
    let acc = &mut panel[..width];

    let mut chunks = values.chunks(width);
    if let Some(first) = chunks.next() {
        acc.copy_from_slice(first);
    }

    let mut until_check = 1;
    let mut hit_terminal = false;
    loop {
        if has_terminal {
            until_check -= 1;
            if until_check == 0 {
                until_check = check_every;
                if acc.iter().any(|&v| monoid.is_terminal(v)) {
                    hit_terminal = true;
                    break;
                }
                if exit.is_set() {
                    break;
                }
            }
        }

        match chunks.next() {
            Some(chunk) => {
                for (a, &x) in acc.iter_mut().zip(chunk) {
                    *a = monoid.combine(*a, x);
                }
            }
            None => break,
        }
    }

    let t = acc[1..]
        .iter()
        .fold(acc[0], |s, &v| monoid.combine(s, v));

    if hit_terminal || monoid.is_terminal(t) {
        tracing::trace!(len = values.len(), "terminal value reached in panel");
        exit.signal();
    }
    Some(t)
}
