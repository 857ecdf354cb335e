//! # spreduce: parallel monoid reductions over sparse and dense matrices
//!
//! spreduce folds the stored entries of a matrix into one scalar under a
//! monoid, and assembles deduplicated `(index, value)` tuples by folding the
//! values of repeated indices. Both engines split their input into tasks and
//! run them on a Rayon pool.
//!
//! ## Overview
//!
//! - **Monoids** ([`Monoid`]): an associative operator with an identity, an
//!   optional terminal value, and a panel width. Built-ins cover `plus`,
//!   `times`, `min`, `max`, `any`, the logical operators and the bitwise
//!   operators.
//! - **Reduction** ([`reduce_to_scalar`]): a presence-aware path for matrices
//!   with zombies or bitmap flags, a panel path for dense value arrays, and a
//!   sequential merge of the per-task partials.
//! - **Build** ([`build_with_dedup`]): one output tuple per group of tuples
//!   sharing an index, each group seeded with its first value.
//!
//! ## Usage
//!
//! ```
//! use spreduce::{Engine, FullMatrix, Matrix, Monoid, ReduceConfig};
//!
//! let engine = Engine::new(ReduceConfig::with_threads(2)).unwrap();
//!
//! let a = Matrix::from(FullMatrix::column(vec![1u64, 2, 3, 4, 5]));
//! assert_eq!(engine.reduce(&a, &Monoid::plus()).unwrap(), 15);
//!
//! let (indices, values) = engine
//!     .build(&[2, 0, 2, 1], &[10i32, 1, 5, 7], &Monoid::plus())
//!     .unwrap();
//! assert_eq!(indices, vec![0, 1, 2]);
//! assert_eq!(values, vec![1, 7, 15]);
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod matrix;
pub mod monoid;
pub mod parallel;
pub mod partition;
pub mod reduce;
pub mod types;
pub mod utils;
pub mod workspace;

// Re-export primary components
pub use build::{build, build_with_dedup, check_slices, DedupMap, TupleGrouping, DUPLICATE, MAX_INDEX};
pub use config::{ReduceConfig, SystemParameters};
pub use error::{ReduceError, Result};
pub use matrix::{BitmapMatrix, Entries, Format, FullMatrix, Liveness, Matrix, SparseMatrixCSR};
pub use monoid::{Monoid, Terminal};
pub use parallel::Engine;
pub use partition::{plan, Plan, TaskPartition};
pub use reduce::{reduce_partitioned, reduce_to_scalar, ReduceOptions};
pub use types::{Arithmetic, Scalar};
pub use utils::formats::{from_ndarray, from_ndarray_masked, from_sprs_csr, to_ndarray, to_sprs_csr};
pub use workspace::Workspace;

/// Version information for the spreduce library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
