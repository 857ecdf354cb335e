//! Configuration and system parameters for spreduce

use std::str::FromStr;

use crate::error::{ReduceError, Result};
use crate::monoid::Monoid;
use crate::types::Scalar;

/// Default minimum number of entries worth giving to one thread
pub const DEFAULT_CHUNK: usize = 64 * 1024;

/// Default number of tasks carved out per thread
pub const DEFAULT_TASKS_PER_THREAD: usize = 64;

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Size of cache line in bytes
    pub cache_line_size: usize,
    /// Number of threads to use
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            cache_line_size: 64,
            n_threads: num_cpus::get(),
        }
    }
}

/// Configuration for the reduction and build engines
#[derive(Debug, Clone)]
pub struct ReduceConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Minimum work (entries) per thread before another thread is used
    pub chunk: usize,

    /// Number of reduction tasks per thread when more than one thread runs
    pub tasks_per_thread: usize,

    /// Panel path checks for a terminal value once every this many panels
    pub terminal_check_panels: usize,

    /// Let a task that reaches a terminal value stop the other tasks
    pub cross_task_exit: bool,

    /// Disabled specializations: an operator (`times`), a type (`int8`) or
    /// a pair (`times_int8`)
    pub disabled: Vec<String>,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            chunk: DEFAULT_CHUNK,
            tasks_per_thread: DEFAULT_TASKS_PER_THREAD,
            terminal_check_panels: 1,
            cross_task_exit: true,
            disabled: Vec::new(),
        }
    }
}

impl ReduceConfig {
    /// Create a config that uses exactly `n_threads` threads
    pub fn with_threads(n_threads: usize) -> Self {
        Self {
            system_params: SystemParameters {
                n_threads: n_threads.max(1),
                ..SystemParameters::default()
            },
            ..Self::default()
        }
    }

    /// Builds a config from the defaults overridden by environment variables
    ///
    /// - `SPREDUCE_NUM_THREADS`: worker thread count
    /// - `SPREDUCE_CHUNK`: minimum entries per thread
    /// - `SPREDUCE_TERMINAL_CHECK`: panels between terminal checks
    /// - `SPREDUCE_DISABLE`: comma-separated disabled specializations
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(n) = parse_env::<usize>("SPREDUCE_NUM_THREADS")? {
            config.system_params.n_threads = n.max(1);
        }
        if let Some(chunk) = parse_env::<usize>("SPREDUCE_CHUNK")? {
            config.chunk = chunk.max(1);
        }
        if let Some(panels) = parse_env::<usize>("SPREDUCE_TERMINAL_CHECK")? {
            config.terminal_check_panels = panels.max(1);
        }
        if let Ok(list) = std::env::var("SPREDUCE_DISABLE") {
            config.disabled = parse_disable_list(&list);
        }

        tracing::debug!(
            n_threads = config.system_params.n_threads,
            chunk = config.chunk,
            terminal_check_panels = config.terminal_check_panels,
            disabled = ?config.disabled,
            "configuration loaded from environment"
        );
        Ok(config)
    }

    /// Adds a disabled specialization
    pub fn disable(mut self, name: &str) -> Self {
        self.disabled.push(name.trim().to_ascii_lowercase());
        self
    }

    /// True if `monoid` over `type_name` is switched off
    ///
    /// Names are compared case-insensitively.
    pub fn is_disabled(&self, monoid: &str, type_name: &str) -> bool {
        let monoid = monoid.to_ascii_lowercase();
        let type_name = type_name.to_ascii_lowercase();
        let pair = format!("{}_{}", monoid, type_name);
        [monoid, type_name, pair]
            .iter()
            .any(|name| self.disabled.contains(name))
    }

    /// Returns `monoid` with its enabled flag set from this configuration
    pub fn apply<T: Scalar>(&self, monoid: Monoid<T>) -> Monoid<T> {
        let enabled = monoid.is_enabled() && !self.is_disabled(monoid.name(), monoid.type_name());
        monoid.with_enabled(enabled)
    }
}

fn parse_env<T: FromStr>(key: &'static str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReduceError::Config { key, value }),
        Err(_) => Ok(None),
    }
}

fn parse_disable_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
