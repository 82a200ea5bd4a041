//! The pre-sized, append-only record buffer.

use crate::config::ReservePolicy;
use crate::event::Event;
use anyhow::Result;
use std::fmt;
use std::mem::size_of;
use std::ops::Deref;
use tracing::{info, warn};

/// The up-front reservation for the event store could not be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveError {
    /// Records requested.
    pub requested: usize,
    /// Size of one record in bytes.
    pub record_size: usize,
}

impl ReserveError {
    /// Requested size in MiB, saturating.
    #[must_use]
    pub fn requested_mib(&self) -> usize {
        self.requested.saturating_mul(self.record_size) / (1024 * 1024)
    }
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot reserve {} records ({} MiB) for the event store; \
             not enough addressable memory",
            self.requested,
            self.requested_mib()
        )
    }
}

impl std::error::Error for ReserveError {}

/// Contiguous storage for accepted events.
///
/// Records are only appended by a [`ParseSession`](crate::ParseSession)
/// while it ingests. The store dereferences to `[Event]`, which is the
/// read-only view handed to consumers; a finished store cannot grow:
///
/// ```compile_fail
/// use clickstream::testing::{fixture_bytes, well_formed_lines};
/// use clickstream::{IngestConfig, ParseSession};
///
/// let data = fixture_bytes(&well_formed_lines(2));
/// let mut session = ParseSession::new(IngestConfig::default().with_capacity_hint(4)).unwrap();
/// session.ingest_bytes(&data);
/// let mut done = session.finish();
/// let first = done.events[0];
/// done.events.push(first);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EventStore<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> EventStore<'a> {
    /// Reserve room for `records` events up front.
    ///
    /// # Errors
    /// With [`ReservePolicy::Fail`], returns a [`ReserveError`] when the
    /// allocation cannot be made. With [`ReservePolicy::GrowIncrementally`]
    /// this never fails; the store starts empty and grows on demand.
    pub fn with_reservation(records: usize, policy: ReservePolicy) -> Result<Self> {
        let mut events: Vec<Event<'a>> = Vec::new();
        match events.try_reserve_exact(records) {
            Ok(()) => {
                info!(
                    records,
                    mib = records.saturating_mul(size_of::<Event<'_>>()) / (1024 * 1024),
                    "reserved event store"
                );
            }
            Err(_) => {
                let err = ReserveError { requested: records, record_size: size_of::<Event<'_>>() };
                match policy {
                    ReservePolicy::Fail => return Err(err.into()),
                    ReservePolicy::GrowIncrementally => {
                        warn!(%err, "falling back to incremental growth");
                    }
                }
            }
        }
        Ok(Self { events })
    }

    /// Append one accepted event.
    #[inline]
    pub(crate) fn push(&mut self, event: Event<'a>) {
        self.events.push(event);
    }

    pub(crate) fn extend_from_vec(&mut self, mut batch: Vec<Event<'a>>) {
        self.events.append(&mut batch);
    }

    /// Records the store can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// The stored records, in file order.
    #[must_use]
    pub fn as_slice(&self) -> &[Event<'a>] {
        &self.events
    }
}

impl<'a> Deref for EventStore<'a> {
    type Target = [Event<'a>];

    fn deref(&self) -> &Self::Target {
        &self.events
    }
}

impl<'s, 'a> IntoIterator for &'s EventStore<'a> {
    type Item = &'s Event<'a>;
    type IntoIter = std::slice::Iter<'s, Event<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
