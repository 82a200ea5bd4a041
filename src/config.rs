//! Ingestion settings.
//!
//! ```
//! use clickstream::{ExecMode, IngestConfig, ReservePolicy};
//!
//! let config = IngestConfig::default()
//!     .with_capacity_hint(1_000_000)
//!     .with_reserve_policy(ReservePolicy::GrowIncrementally)
//!     .with_exec_mode(ExecMode::Parallel { threads: None, chunks: None });
//! assert_eq!(config.capacity_hint, 1_000_000);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Records reserved up front when no hint is given. Sized for a monthly export
/// of the public e-commerce behaviour dataset.
pub const DEFAULT_CAPACITY_HINT: usize = 70_000_000;

/// What to do when the up-front reservation cannot be satisfied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservePolicy {
    /// Refuse to start the session.
    #[default]
    Fail,
    /// Log a warning and let the store grow as records arrive.
    GrowIncrementally,
}

/// How lines are parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecMode {
    /// One thread, line after line.
    #[default]
    Sequential,
    /// Newline-aligned chunks parsed on the rayon pool. Store order still
    /// follows file order.
    ///
    /// Each chunk is parsed into its own vector, sized from the chunk's
    /// newline count, and then moved into the reserved store. Peak memory
    /// therefore briefly holds the records of one pass twice.
    Parallel {
        /// Size of a dedicated pool; `None` uses the global rayon pool.
        threads: Option<usize>,
        /// Number of chunks; `None` means `2 * num_cpus`.
        chunks: Option<usize>,
    },
}

/// Settings for a [`ParseSession`](crate::ParseSession).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Records to reserve in the store before parsing starts.
    pub capacity_hint: usize,
    /// Behaviour when `capacity_hint` records cannot be reserved.
    pub reserve_policy: ReservePolicy,
    pub exec_mode: ExecMode,
    /// Rejected lines to keep as samples in the session's
    /// [`RejectLog`](crate::RejectLog). Counters are always kept.
    pub reject_samples: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            capacity_hint: DEFAULT_CAPACITY_HINT,
            reserve_policy: ReservePolicy::Fail,
            exec_mode: ExecMode::Sequential,
            reject_samples: 0,
        }
    }
}

impl IngestConfig {
    /// Set [`capacity_hint`](Self::capacity_hint).
    #[must_use]
    pub fn with_capacity_hint(mut self, records: usize) -> Self {
        self.capacity_hint = records;
        self
    }

    /// Set [`reserve_policy`](Self::reserve_policy).
    #[must_use]
    pub fn with_reserve_policy(mut self, policy: ReservePolicy) -> Self {
        self.reserve_policy = policy;
        self
    }

    /// Set [`exec_mode`](Self::exec_mode).
    #[must_use]
    pub fn with_exec_mode(mut self, mode: ExecMode) -> Self {
        self.exec_mode = mode;
        self
    }

    /// Set [`reject_samples`](Self::reject_samples).
    #[must_use]
    pub fn with_reject_samples(mut self, samples: usize) -> Self {
        self.reject_samples = samples;
        self
    }

    /// Load settings from a JSON file. Missing keys take their default value.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this type.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse ingest config {}", path.display()))
    }
}
