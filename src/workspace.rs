//! Caller-owned workspace for the scalar reduction
//!
//! One partial-result slot and one presence flag per task. Task `tid`
//! writes only slot `tid`, so tasks never share a memory location; the
//! merge then reads the slots in task order.

use aligned_vec::AVec;

use crate::types::Scalar;

/// Alignment of the partial-result slots, in bytes
pub const WORKSPACE_ALIGN: usize = 64;

/// Per-task partials (`W`) and presence flags (`F`)
pub struct Workspace<T> {
    partials: AVec<T>,
    found: Vec<bool>,
}

impl<T: Scalar> Workspace<T> {
    /// Allocates `ntasks` slots, each initialised to `fill`
    pub fn new(ntasks: usize, fill: T) -> Self {
        Self {
            partials: AVec::from_iter(WORKSPACE_ALIGN, (0..ntasks).map(|_| fill)),
            found: vec![false; ntasks],
        }
    }

    /// Number of task slots
    pub fn capacity(&self) -> usize {
        self.found.len()
    }

    pub fn partials(&self) -> &[T] {
        &self.partials
    }

    pub fn found(&self) -> &[bool] {
        &self.found
    }

    /// Mutable views of the first `ntasks` partial slots and presence flags
    ///
    /// # Panics
    ///
    /// Panics if the workspace has fewer than `ntasks` slots.
    pub(crate) fn split(&mut self, ntasks: usize) -> (&mut [T], &mut [bool]) {
        assert!(
            ntasks <= self.capacity(),
            "workspace has {} slots, {} tasks requested",
            self.capacity(),
            ntasks
        );
        (&mut self.partials[..ntasks], &mut self.found[..ntasks])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_alignment() {
        let ws = Workspace::<u64>::new(8, 0);
        assert_eq!(ws.capacity(), 8);
        assert_eq!(ws.partials().as_ptr() as usize % WORKSPACE_ALIGN, 0);
        assert!(ws.found().iter().all(|&f| !f));
    }

    #[test]
    #[should_panic(expected = "workspace has 2 slots")]
    fn test_split_too_small() {
        let mut ws = Workspace::<u8>::new(2, 0);
        let _ = ws.split(3);
    }
}
