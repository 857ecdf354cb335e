//! # Parallel execution of the reduction and build engines
//!
//! An [`Engine`] owns a configuration and a Rayon thread pool sized from it.
//! Every call runs inside that pool, so the thread count is a property of the
//! engine rather than of the process-wide Rayon pool.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::build::{self, DedupMap, TupleGrouping};
use crate::config::ReduceConfig;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::monoid::Monoid;
use crate::partition::{plan, TaskPartition};
use crate::reduce::{self, ReduceOptions};
use crate::types::Scalar;
use crate::workspace::Workspace;

/// A configured reduction engine with its own worker pool
pub struct Engine {
    config: ReduceConfig,
    pool: Option<ThreadPool>,
}

impl Engine {
    /// Creates an engine, building a worker pool when more than one thread
    /// is configured
    pub fn new(config: ReduceConfig) -> Result<Self> {
        let n_threads = config.system_params.n_threads.max(1);
        let pool = if n_threads > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(n_threads)
                    .thread_name(|i| format!("spreduce-{}", i))
                    .build()?,
            )
        } else {
            None
        };
        tracing::debug!(n_threads, "engine created");
        Ok(Self { config, pool })
    }

    /// An engine configured from the environment (see [`ReduceConfig::from_env`])
    pub fn from_env() -> Result<Self> {
        Self::new(ReduceConfig::from_env()?)
    }

    pub fn config(&self) -> &ReduceConfig {
        &self.config
    }

    pub fn n_threads(&self) -> usize {
        self.pool.as_ref().map_or(1, |p| p.current_num_threads())
    }

    /// Applies this engine's disable list to `monoid`
    pub fn monoid<T: Scalar>(&self, monoid: Monoid<T>) -> Monoid<T> {
        self.config.apply(monoid)
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Folds every live entry of `matrix` into `result` using `ntasks` tasks
    ///
    /// See [`reduce::reduce_to_scalar`]; the terminal-check granularity and
    /// cross-task exit come from the engine's configuration, and the
    /// configured disable list is applied to `monoid`.
    pub fn reduce_to_scalar<T: Scalar>(
        &self,
        result: &mut T,
        matrix: &Matrix<T>,
        monoid: &Monoid<T>,
        workspace: &mut Workspace<T>,
        ntasks: usize,
    ) -> Result<()> {
        let entries = matrix.entries();
        let partition = TaskPartition::even(entries.len(), ntasks);
        self.reduce_partitioned(result, matrix, monoid, workspace, &partition)
    }

    /// Folds every live entry of `matrix` into `result` using an explicit
    /// task partition
    pub fn reduce_partitioned<T: Scalar>(
        &self,
        result: &mut T,
        matrix: &Matrix<T>,
        monoid: &Monoid<T>,
        workspace: &mut Workspace<T>,
        partition: &TaskPartition,
    ) -> Result<()> {
        let monoid = self.monoid(*monoid);
        let options = ReduceOptions::from(&self.config);
        let nthreads = self.n_threads();
        self.install(|| {
            reduce::reduce_partitioned(
                result,
                matrix.entries(),
                &monoid,
                workspace,
                partition,
                nthreads,
                &options,
            )
        })
    }

    /// Reduces `matrix` to a scalar, starting from the identity
    ///
    /// Plans the task count from the number of stored entries and allocates
    /// the workspace.
    ///
    /// # Examples
    ///
    /// ```
    /// use spreduce::{Engine, FullMatrix, Matrix, Monoid, ReduceConfig};
    ///
    /// let engine = Engine::new(ReduceConfig::with_threads(2)).unwrap();
    /// let a = Matrix::from(FullMatrix::column(vec![3i8, 5, 0, 7]));
    /// assert_eq!(engine.reduce(&a, &Monoid::times()).unwrap(), 0);
    /// ```
    pub fn reduce<T: Scalar>(&self, matrix: &Matrix<T>, monoid: &Monoid<T>) -> Result<T> {
        let work = matrix.n_entries();
        let p = plan(work, &self.config);
        let mut workspace = Workspace::new(p.ntasks, monoid.identity());
        let mut result = monoid.identity();
        self.reduce_to_scalar(&mut result, matrix, monoid, &mut workspace, p.ntasks)?;
        Ok(result)
    }

    /// Assembles grouped tuples; see [`build::build_with_dedup`]
    #[allow(clippy::too_many_arguments)]
    pub fn build_with_dedup<T: Scalar>(
        &self,
        out_values: &mut [T],
        out_indices: &mut [usize],
        in_values: &[T],
        nvals: usize,
        ndupl: usize,
        map: DedupMap<'_>,
        partition: &TaskPartition,
        monoid: &Monoid<T>,
    ) -> Result<usize> {
        let monoid = self.monoid(*monoid);
        let nthreads = self.n_threads();
        self.install(|| {
            build::build_with_dedup(
                out_values,
                out_indices,
                in_values,
                nvals,
                ndupl,
                map,
                partition,
                &monoid,
                nthreads,
            )
        })
    }

    /// Groups unsorted `(index, value)` tuples and assembles one tuple per
    /// distinct index, sorted by index
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length or an index exceeds
    /// [`MAX_INDEX`](crate::build::MAX_INDEX).
    pub fn build<T: Scalar>(
        &self,
        indices: &[usize],
        values: &[T],
        monoid: &Monoid<T>,
    ) -> Result<(Vec<usize>, Vec<T>)> {
        let monoid = self.monoid(*monoid);
        monoid.check_enabled()?;
        assert_eq!(indices.len(), values.len(), "indices.len() must equal values.len()");

        let p = plan(indices.len(), &self.config);
        let grouping = self.install(|| TupleGrouping::from_indices(indices));
        let partition = grouping.slices(p.nthreads);

        let nout = grouping.n_unique();
        let mut out_values = vec![monoid.identity(); nout];
        let mut out_indices = vec![0usize; nout];
        self.build_with_dedup(
            &mut out_values,
            &mut out_indices,
            values,
            grouping.nvals(),
            grouping.ndupl(),
            grouping.as_map(),
            &partition,
            &monoid,
        )?;
        Ok((out_indices, out_values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::FullMatrix;

    #[test]
    fn test_single_thread_engine_has_no_pool() {
        let engine = Engine::new(ReduceConfig::with_threads(1)).unwrap();
        assert_eq!(engine.n_threads(), 1);
        let a = Matrix::from(FullMatrix::column(vec![1u64, 2, 3, 4, 5]));
        assert_eq!(engine.reduce(&a, &Monoid::plus()).unwrap(), 15);
    }

    #[test]
    fn test_engine_applies_disable_list() {
        let config = ReduceConfig::with_threads(2).disable("times_int8");
        let engine = Engine::new(config).unwrap();
        let a = Matrix::from(FullMatrix::column(vec![3i8, 5, 0, 7]));

        let err = engine.reduce(&a, &Monoid::times()).unwrap_err();
        assert!(err.is_not_supported());
        assert_eq!(engine.reduce(&a, &Monoid::plus()).unwrap(), 15);
    }

    #[test]
    fn test_engine_build() {
        let engine = Engine::new(ReduceConfig::with_threads(3)).unwrap();
        let (idx, vals) = engine
            .build(&[4, 1, 4, 4, 0], &[1u8, 2, 3, 4, 5], &Monoid::max())
            .unwrap();
        assert_eq!(idx, vec![0, 1, 4]);
        assert_eq!(vals, vec![5, 2, 4]);
    }
}
