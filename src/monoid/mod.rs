//! Operator descriptors for the reduction and build engines
//!
//! A [`Monoid`] describes one associative combine operation over one element
//! type: its identity, its combine function, an optional terminal (absorbing)
//! value that licenses early exit, and the panel width used by the
//! vectorized reduction path. One generic engine is driven by these values,
//! so adding an operator means constructing a descriptor, not writing a new
//! kernel.
//!
//! Descriptors can be disabled once at configuration time (see
//! [`crate::config::ReduceConfig::apply`]). A disabled descriptor never
//! executes: both engine operations return
//! [`ReduceError::NotSupported`](crate::ReduceError::NotSupported) before
//! touching any buffer.

pub mod builtin;

use crate::error::{ReduceError, Result};
use crate::types::Scalar;

/// Largest panel width the panel reduction path supports
pub const MAX_PANEL: usize = 64;

/// The absorbing element of a monoid, if it has one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terminal<T> {
    /// No absorbing value; scans always run to the end of their slice
    None,
    /// `combine(t, x) == t` for every `x`
    Value(T),
    /// Every value is terminal (the ANY monoid): the first live entry ends the scan
    Any,
}

/// An associative combine operation with an identity over element type `T`
#[derive(Debug, Clone, Copy)]
pub struct Monoid<T> {
    name: &'static str,
    identity: T,
    combine: fn(T, T) -> T,
    terminal: Terminal<T>,
    panel: usize,
    enabled: bool,
}

impl<T: Scalar> Monoid<T> {
    /// Creates an enabled monoid without a terminal value
    ///
    /// `combine` must be associative and `identity` must satisfy
    /// `combine(identity, x) == x`. The panel width defaults to 64 for
    /// one-byte types and 32 otherwise.
    ///
    /// The panel path of the scalar reduction folds slot `k` of a panel
    /// with elements `k, k + w, ...`, so reducing a dense matrix also needs
    /// `combine` to be commutative. The build engine folds each group in
    /// input order and has no such requirement. A non-commutative operator
    /// can still be reduced in storage order by setting its panel width to 1
    /// with [`Monoid::with_panel`].
    pub fn new(name: &'static str, identity: T, combine: fn(T, T) -> T) -> Self {
        Self {
            name,
            identity,
            combine,
            terminal: Terminal::None,
            panel: default_panel::<T>(),
            enabled: true,
        }
    }

    /// Declares `value` as the absorbing element
    pub fn with_terminal(mut self, value: T) -> Self {
        self.terminal = Terminal::Value(value);
        self
    }

    /// Declares every value absorbing (ANY semantics)
    pub fn with_any_terminal(mut self) -> Self {
        self.terminal = Terminal::Any;
        self
    }

    /// Sets the panel width
    ///
    /// # Panics
    ///
    /// Panics unless `panel` is a power of two no larger than [`MAX_PANEL`].
    pub fn with_panel(mut self, panel: usize) -> Self {
        assert!(
            panel.is_power_of_two() && panel <= MAX_PANEL,
            "panel width {} must be a power of two <= {}",
            panel,
            MAX_PANEL
        );
        self.panel = panel;
        self
    }

    /// Marks the descriptor enabled or disabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns a disabled copy of this descriptor
    pub fn disabled(self) -> Self {
        self.with_enabled(false)
    }

    /// Operator name, e.g. `plus`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Element type name, e.g. `uint64`
    pub fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    /// Operator and type, e.g. `plus_uint64`
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.name, T::TYPE_NAME)
    }

    pub fn identity(&self) -> T {
        self.identity
    }

    pub fn panel(&self) -> usize {
        self.panel
    }

    pub fn terminal(&self) -> Terminal<T> {
        self.terminal
    }

    pub fn has_terminal(&self) -> bool {
        !matches!(self.terminal, Terminal::None)
    }

    /// The absorbing value, when it is a single value
    pub fn terminal_value(&self) -> Option<T> {
        match self.terminal {
            Terminal::Value(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True if `value` absorbs everything combined into it
    #[inline]
    pub fn is_terminal(&self, value: T) -> bool {
        match self.terminal {
            Terminal::None => false,
            Terminal::Value(t) => value == t,
            Terminal::Any => true,
        }
    }

    /// `combine(a, b)`
    #[inline]
    pub fn combine(&self, a: T, b: T) -> T {
        (self.combine)(a, b)
    }

    /// `acc = combine(acc, x)`
    #[inline]
    pub fn combine_into(&self, acc: &mut T, x: T) {
        *acc = (self.combine)(*acc, x);
    }

    /// Left-to-right fold of `values` starting from `seed`, with no early exit
    pub fn fold(&self, seed: T, values: &[T]) -> T {
        values.iter().fold(seed, |acc, &x| (self.combine)(acc, x))
    }

    /// Fails with `NotSupported` if the descriptor is disabled
    pub(crate) fn check_enabled(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(ReduceError::NotSupported {
                monoid: self.name,
                type_name: T::TYPE_NAME,
            })
        }
    }
}

/// Panel width used when a descriptor does not choose one
pub fn default_panel<T>() -> usize {
    if std::mem::size_of::<T>() <= 1 {
        64
    } else {
        32
    }
}
