//! Parsing sessions.
//!
//! A [`ParseSession`] owns the [`EventStore`] for one batch run and borrows
//! every input buffer it ingests. The borrow is what keeps a mapping alive for
//! as long as any record parsed from it:
//!
//! ```no_run
//! use clickstream::{IngestConfig, MappedFile, ParseSession};
//!
//! # fn main() -> anyhow::Result<()> {
//! let file = MappedFile::open("2019-Nov.csv")?;
//! let mut session = ParseSession::new(IngestConfig::default().with_capacity_hint(1 << 20))?;
//! let stats = session.ingest_file(&file);
//! println!("{} of {} lines kept", stats.accepted, stats.lines);
//! // `file` cannot be dropped while `session` (or its store) is in use.
//! # Ok(())
//! # }
//! ```
//!
//! [`scan_file`] wraps the mapping, the session and a consumer in one scope.

use crate::config::{ExecMode, IngestConfig};
use crate::event::{Event, RejectReason};
use crate::lines::{data_start, line_aligned_chunks, line_capacity, Lines, MappedFile};
use crate::parser::{parse_bytes, LineOutcome};
use crate::store::EventStore;
use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Rejected-line counters, one per [`RejectReason`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectCounts {
    pub invalid_price: u64,
    pub unrecognized_kind: u64,
    pub missing_product_id: u64,
    pub missing_user_id: u64,
    pub invalid_utf8: u64,
}

impl RejectCounts {
    /// Count one rejection.
    pub fn record(&mut self, reason: RejectReason) {
        *self.slot(reason) += 1;
    }

    /// Rejections counted for `reason`.
    #[must_use]
    pub fn get(&self, reason: RejectReason) -> u64 {
        match reason {
            RejectReason::InvalidPrice => self.invalid_price,
            RejectReason::UnrecognizedKind => self.unrecognized_kind,
            RejectReason::MissingProductId => self.missing_product_id,
            RejectReason::MissingUserId => self.missing_user_id,
            RejectReason::InvalidUtf8 => self.invalid_utf8,
        }
    }

    /// Rejections over all reasons.
    #[must_use]
    pub fn total(&self) -> u64 {
        RejectReason::ALL.iter().map(|r| self.get(*r)).sum()
    }

    /// Add `other`'s counters to these.
    pub fn merge(&mut self, other: &RejectCounts) {
        for reason in RejectReason::ALL {
            *self.slot(reason) += other.get(reason);
        }
    }

    fn slot(&mut self, reason: RejectReason) -> &mut u64 {
        match reason {
            RejectReason::InvalidPrice => &mut self.invalid_price,
            RejectReason::UnrecognizedKind => &mut self.unrecognized_kind,
            RejectReason::MissingProductId => &mut self.missing_product_id,
            RejectReason::MissingUserId => &mut self.missing_user_id,
            RejectReason::InvalidUtf8 => &mut self.invalid_utf8,
        }
    }
}

/// Line counters for one or more ingest passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Non-empty data lines seen (header excluded).
    pub lines: u64,
    pub accepted: u64,
    pub rejected: RejectCounts,
}

impl IngestStats {
    /// Add `other`'s counters to these.
    pub fn merge(&mut self, other: &IngestStats) {
        self.lines += other.lines;
        self.accepted += other.accepted;
        self.rejected.merge(&other.rejected);
    }
}

/// A rejected line, identified by the byte offset of its first character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLine {
    pub offset: usize,
    pub reason: RejectReason,
}

/// Bounded sample of rejected lines.
///
/// Holds at most `limit` entries, in file order. A limit of zero keeps nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RejectLog {
    limit: usize,
    samples: Vec<RejectedLine>,
}

impl RejectLog {
    /// An empty log keeping at most `limit` samples.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { limit, samples: Vec::new() }
    }

    /// Keep the rejection at `offset` unless the log is full.
    pub fn record(&mut self, offset: usize, reason: RejectReason) {
        if self.samples.len() < self.limit {
            self.samples.push(RejectedLine { offset, reason });
        }
    }

    /// The kept samples, in file order.
    #[must_use]
    pub fn samples(&self) -> &[RejectedLine] {
        &self.samples
    }

    /// `true` once `limit` samples are held.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.limit
    }

    fn absorb(&mut self, other: RejectLog) {
        let room = self.limit.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.into_iter().take(room));
    }

    /// Export the samples as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.samples)
    }

    /// Write the samples to `path` as JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Everything a finished session produced.
#[derive(Clone, Debug)]
pub struct Ingested<'a> {
    pub events: EventStore<'a>,
    pub stats: IngestStats,
    pub rejects: RejectLog,
}

/// One batch run: a reserved store plus the buffers it borrows from.
pub struct ParseSession<'a> {
    config: IngestConfig,
    store: EventStore<'a>,
    stats: IngestStats,
    rejects: RejectLog,
}

impl<'a> ParseSession<'a> {
    /// Start a session, reserving the store according to `config`.
    ///
    /// # Errors
    /// Returns a [`ReserveError`](crate::ReserveError) when the reservation
    /// fails under [`ReservePolicy::Fail`](crate::ReservePolicy::Fail).
    pub fn new(config: IngestConfig) -> Result<Self> {
        let store = EventStore::with_reservation(config.capacity_hint, config.reserve_policy)?;
        let rejects = RejectLog::with_limit(config.reject_samples);
        Ok(Self { config, store, stats: IngestStats::default(), rejects })
    }

    /// Settings this session was started with.
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Parse every data line of a mapped file into the store.
    pub fn ingest_file(&mut self, file: &'a MappedFile) -> IngestStats {
        let started = Instant::now();
        let stats = self.ingest_bytes(file.as_bytes());
        info!(
            path = %file.path().display(),
            lines = stats.lines,
            accepted = stats.accepted,
            rejected = stats.rejected.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ingested file"
        );
        stats
    }

    /// Parse every data line of `buf` (header skipped) into the store.
    ///
    /// Returns the counters for this pass; [`stats`](Self::stats) holds the
    /// running total.
    pub fn ingest_bytes(&mut self, buf: &'a [u8]) -> IngestStats {
        let started = Instant::now();
        let stats = match self.config.exec_mode {
            ExecMode::Sequential => self.ingest_sequential(buf),
            ExecMode::Parallel { threads, chunks } => self.ingest_parallel(buf, threads, chunks),
        };
        self.stats.merge(&stats);
        debug!(
            bytes = buf.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            stored = self.store.len(),
            "ingest pass complete"
        );
        stats
    }

    fn ingest_sequential(&mut self, buf: &'a [u8]) -> IngestStats {
        let store = &mut self.store;
        parse_range(buf, data_start(buf), buf.len(), &mut self.rejects, |ev| store.push(ev))
    }

    fn ingest_parallel(
        &mut self,
        buf: &'a [u8],
        threads: Option<usize>,
        chunks: Option<usize>,
    ) -> IngestStats {
        let parts = chunks.unwrap_or_else(|| 2 * num_cpus::get().max(1)).max(1);
        let ranges = line_aligned_chunks(buf, data_start(buf), parts);
        debug!(chunks = ranges.len(), "parallel chunk plan");

        let limit = self.config.reject_samples;
        let work = || {
            ranges
                .par_iter()
                .map(|&(start, end)| {
                    let mut events = Vec::with_capacity(line_capacity(&buf[start..end]));
                    let mut rejects = RejectLog::with_limit(limit);
                    let stats = parse_range(buf, start, end, &mut rejects, |ev| events.push(ev));
                    (events, stats, rejects)
                })
                .collect::<Vec<_>>()
        };
        let results = match threads {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(work),
                Err(e) => {
                    warn!(error = %e, threads = n, "cannot build thread pool; using the global pool");
                    work()
                }
            },
            None => work(),
        };

        // Chunks come back in file order.
        let mut stats = IngestStats::default();
        for (events, chunk_stats, rejects) in results {
            self.store.extend_from_vec(events);
            stats.merge(&chunk_stats);
            self.rejects.absorb(rejects);
        }
        stats
    }

    /// Records accepted so far.
    #[must_use]
    pub fn events(&self) -> &[Event<'a>] {
        &self.store
    }

    /// The store being filled.
    #[must_use]
    pub fn store(&self) -> &EventStore<'a> {
        &self.store
    }

    /// Counters accumulated over every pass of this session.
    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Rejected-line samples kept so far.
    #[must_use]
    pub fn rejects(&self) -> &RejectLog {
        &self.rejects
    }

    /// End the session. The store is read-only from here on.
    #[must_use]
    pub fn finish(self) -> Ingested<'a> {
        Ingested { events: self.store, stats: self.stats, rejects: self.rejects }
    }
}

/// Parse the lines of `buf[start..end]`, passing accepted events to `sink`.
fn parse_range<'a>(
    buf: &'a [u8],
    start: usize,
    end: usize,
    rejects: &mut RejectLog,
    mut sink: impl FnMut(Event<'a>),
) -> IngestStats {
    let mut stats = IngestStats::default();
    for (offset, line) in Lines::range(buf, start, end) {
        stats.lines += 1;
        match parse_bytes(line) {
            LineOutcome::Accepted(ev) => {
                stats.accepted += 1;
                sink(ev);
            }
            LineOutcome::Rejected(reason) => {
                trace!(offset, %reason, "rejected line");
                stats.rejected.record(reason);
                rejects.record(offset, reason);
            }
        }
    }
    stats
}

/// Map `path`, ingest it, and hand the result to `consume` inside one scope.
///
/// The records cannot escape `consume`, so they never outlive the mapping.
///
/// ```no_run
/// use clickstream::{scan_file, summarize, IngestConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// let summary = scan_file("2019-Nov.csv", IngestConfig::default(), |done| summarize(&done.events))?;
/// println!("revenue: {:.2}", summary.total_revenue);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns an error if the store cannot be reserved or the file cannot be
/// mapped.
pub fn scan_file<R>(
    path: impl AsRef<Path>,
    config: IngestConfig,
    consume: impl FnOnce(&Ingested<'_>) -> R,
) -> Result<R> {
    let mut session = ParseSession::new(config)?;
    let file = MappedFile::open(path)?;
    session.ingest_file(&file);
    let done = session.finish();
    Ok(consume(&done))
}
