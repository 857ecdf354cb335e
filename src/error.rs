//! Error types for spreduce

use thiserror::Error;

/// Result type alias using spreduce's error
pub type Result<T> = std::result::Result<T, ReduceError>;

/// Errors that can occur in spreduce operations
#[derive(Error, Debug)]
pub enum ReduceError {
    /// The (monoid, element type) combination was disabled at configuration time.
    ///
    /// Callers are expected to fall back to a generic implementation.
    #[error("monoid '{monoid}' over {type_name} is disabled in this configuration")]
    NotSupported {
        /// Monoid name, e.g. `times`
        monoid: &'static str,
        /// Element type name, e.g. `int8`
        type_name: &'static str,
    },

    /// A duplicate group is not contained in the slice that owns its head.
    #[error("duplicate group headed at tuple {head} crosses the slice boundary at {boundary}")]
    GroupingViolation {
        /// Position of the group head in sorted tuple order
        head: usize,
        /// First position past the owning slice
        boundary: usize,
    },

    /// Slices do not cover the index range exactly once, in order.
    #[error("invalid task partition: {reason}")]
    InvalidPartition {
        /// What is wrong with the slices
        reason: String,
    },

    /// The worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A configuration value could not be parsed
    #[error("invalid value {value:?} for {key}")]
    Config {
        /// Environment key
        key: &'static str,
        /// Offending value
        value: String,
    },
}

impl ReduceError {
    /// True for the error a caller should answer with a generic fallback
    pub fn is_not_supported(&self) -> bool {
        matches!(self, ReduceError::NotSupported { .. })
    }
}
