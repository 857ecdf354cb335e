//! Presence-aware reduction of one task's slice
//!
//! Used when some stored positions are dead (zombies, or bitmap slots
//! without their presence flag). Positions are visited in order, dead ones
//! are skipped, and the terminal test runs after every fold.

use std::ops::Range;

use crate::matrix::Entries;
use crate::monoid::Monoid;
use crate::reduce::terminal::{fold_and_test, EarlyExit, EXIT_POLL_INTERVAL};
use crate::types::Scalar;

/// Reduces the live entries in `range`, starting from the identity
///
/// Returns `None` if the slice holds no live entry or the task was
/// abandoned because another task already reached a terminal value.
pub fn reduce_slice<T: Scalar>(
    entries: &Entries<'_, T>,
    range: Range<usize>,
    monoid: &Monoid<T>,
    exit: &EarlyExit,
) -> Option<T> {
    if exit.is_set() {
        return None;
    }

    let mut t = monoid.identity();
    let mut found = false;
    let start = range.start;

    for p in range {
        if (p - start) % EXIT_POLL_INTERVAL == EXIT_POLL_INTERVAL - 1 && exit.is_set() {
            break;
        }
        if !entries.liveness.is_live(p) {
            continue;
        }
        found = true;
        if fold_and_test(monoid, &mut t, entries.values[p]) {
            tracing::trace!(position = p, "terminal value reached");
            exit.signal();
            break;
        }
    }

    found.then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Liveness;

    #[test]
    fn test_skips_dead_positions() {
        let values = [5u32, 100, 7];
        let present = [true, false, true];
        let entries = Entries {
            values: &values,
            liveness: Liveness::Bitmap(&present),
            n_zombies: 0,
        };
        let m = Monoid::<u32>::plus();
        assert_eq!(reduce_slice(&entries, 0..3, &m, &EarlyExit::disabled()), Some(12));
        assert_eq!(reduce_slice(&entries, 1..2, &m, &EarlyExit::disabled()), None);
    }

    #[test]
    fn test_stops_at_terminal() {
        let values = [1i64, 2, i64::MIN, 4];
        let indices = [0i64, -3, 2, 3];
        let entries = Entries {
            values: &values,
            liveness: Liveness::Zombies(&indices),
            n_zombies: 1,
        };
        let m = Monoid::<i64>::min();
        let exit = EarlyExit::new(true);
        assert_eq!(reduce_slice(&entries, 0..4, &m, &exit), Some(i64::MIN));
        assert!(exit.is_set());
        // a second task sees the flag and gives up
        assert_eq!(reduce_slice(&entries, 3..4, &m, &exit), None);
    }
}
