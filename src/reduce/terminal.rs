//! Early-termination control shared by the reduction and build engines
//!
//! Within a task the rule is simple: once the running value is terminal,
//! nothing folded into it afterwards can change it, so the scan stops.
//!
//! Across tasks, a task that produced a terminal partial raises an
//! [`EarlyExit`] flag so that tasks not yet finished can give up. This is
//! only sound because the merge is unconditional: the terminal partial is
//! always folded into the result, and it absorbs whatever the abandoned
//! tasks would have contributed.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::monoid::Monoid;
use crate::types::Scalar;

/// Number of positions the presence-aware path scans between polls of the
/// shared exit flag
pub const EXIT_POLL_INTERVAL: usize = 256;

/// A relaxed, monotonic "some task reached a terminal value" flag
#[derive(Debug, Default)]
pub struct EarlyExit {
    enabled: bool,
    flag: AtomicBool,
}

impl EarlyExit {
    /// A flag that is only ever raised when `enabled`
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            flag: AtomicBool::new(false),
        }
    }

    /// A flag that is never raised
    pub fn disabled() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn signal(&self) {
        if self.enabled {
            self.flag.store(true, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.enabled && self.flag.load(Ordering::Relaxed)
    }
}

/// Folds `x` into `acc` and reports whether `acc` is now terminal
#[inline]
pub fn fold_and_test<T: Scalar>(monoid: &Monoid<T>, acc: &mut T, x: T) -> bool {
    monoid.combine_into(acc, x);
    monoid.is_terminal(*acc)
}
