//! # Clickstream
//!
//! A **zero-copy batch parser** for e-commerce interaction exports: one header
//! line followed by millions of comma-separated event lines such as
//!
//! ```text
//! 2019-11-01 00:00:00 UTC,view,1003461,2053013555631882655,electronics.smartphone,xiaomi,489.07,520088904,4d3b30da-...
//! ```
//!
//! The input file is memory-mapped, split into lines and fields without
//! copying, decoded into fixed-shape [`Event`] records, validated, and
//! appended to a pre-sized [`EventStore`]. A small set of aggregations
//! ([`summarize`], [`product_stats`], [`top_by_conversion`]) runs over the
//! result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clickstream::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let file = MappedFile::open("2019-Nov.csv")?;
//! let mut session = ParseSession::new(IngestConfig::default())?;
//! session.ingest_file(&file);
//!
//! let summary = summarize(session.events());
//! let top = top_by_conversion(&product_stats(session.events()), 10, ConversionFilter::default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Borrowed records
//!
//! Text fields of an [`Event`] (brand, session, category levels) are `&str`
//! views into the mapped file. The `'a` lifetime on [`Event`], [`EventStore`]
//! and [`ParseSession`] ties all of them to the [`MappedFile`], so the compiler
//! rejects any attempt to drop the mapping while records are still in use.
//! [`scan_file`] packs mapping, session and consumer into one call.
//!
//! ### Tolerant decoding
//!
//! Field decoders never fail: malformed numbers decode to zero, unknown event
//! types to [`EventKind::Unrecognized`], missing columns to empty text. A
//! record is kept only when its price is non-negative, its kind is recognized,
//! and both product and user ids are non-zero. Dropped lines are counted per
//! [`RejectReason`] in [`IngestStats`] and can be sampled into a [`RejectLog`].
//!
//! ### Up-front reservation
//!
//! A session reserves [`IngestConfig::capacity_hint`] records before parsing
//! so the hot loop never reallocates. If that reservation fails, the
//! [`ReservePolicy`] decides between refusing to start ([`ReserveError`]) and
//! growing incrementally.
//!
//! ### Execution modes
//!
//! - [`ExecMode::Sequential`] parses line after line on the calling thread.
//! - [`ExecMode::Parallel`] parses newline-aligned chunks on the rayon pool;
//!   records still land in file order.
//!
//! ## Module Overview
//!
//! - [`event`] - record types and the validity predicate
//! - [`decode`] - typed field decoders
//! - [`tokenizer`] - comma splitting
//! - [`lines`] - memory mapping and line splitting
//! - [`parser`] - one line to one [`LineOutcome`]
//! - [`store`] - the pre-sized record buffer
//! - [`session`] - ingest passes, counters and reject samples
//! - [`aggregate`] - summary statistics
//! - [`config`] - ingestion settings
//! - [`testing`] - fixtures for tests and benchmarks

pub mod aggregate;
pub mod config;
pub mod decode;
pub mod event;
pub mod lines;
pub mod parser;
pub mod session;
pub mod store;
pub mod testing;
pub mod tokenizer;

pub use aggregate::{
    product_stats, summarize, summarize_par, top_by_conversion, ConversionFilter, ProductRank,
    ProductStats, Summary,
};
pub use config::{ExecMode, IngestConfig, ReservePolicy, DEFAULT_CAPACITY_HINT};
pub use event::{CategoryCode, Event, EventKind, RejectReason, Timestamp};
pub use lines::{Lines, MappedFile};
pub use parser::{parse_line, LineOutcome};
pub use session::{
    scan_file, IngestStats, Ingested, ParseSession, RejectCounts, RejectLog, RejectedLine,
};
pub use store::{EventStore, ReserveError};
