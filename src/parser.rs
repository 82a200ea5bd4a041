//! Record parsing: one line in, one outcome out.

use crate::decode::{decode_category, decode_kind, decode_number, decode_timestamp};
use crate::event::{Event, RejectReason};
use crate::tokenizer::{column, split_fields, COLUMNS};

/// Result of parsing one data line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineOutcome<'a> {
    Accepted(Event<'a>),
    Rejected(RejectReason),
}

impl<'a> LineOutcome<'a> {
    /// The accepted event, if any.
    #[must_use]
    pub fn accepted(self) -> Option<Event<'a>> {
        match self {
            Self::Accepted(ev) => Some(ev),
            Self::Rejected(_) => None,
        }
    }
}

/// Decode a line into an [`Event`] without checking validity.
///
/// Missing columns decode as empty, numeric columns that fail to parse as zero.
#[must_use]
pub fn decode_line(line: &str) -> Event<'_> {
    let f = split_fields::<COLUMNS>(line);
    Event {
        time: decode_timestamp(f[column::EVENT_TIME]),
        kind: decode_kind(f[column::EVENT_TYPE]),
        product_id: decode_number(f[column::PRODUCT_ID]),
        category_id: decode_number(f[column::CATEGORY_ID]),
        category_code: decode_category(f[column::CATEGORY_CODE]),
        brand: f[column::BRAND],
        price: decode_number(f[column::PRICE]),
        user_id: decode_number(f[column::USER_ID]),
        session: f[column::USER_SESSION],
    }
}

/// Decode and validate a text line.
#[must_use]
pub fn parse_line(line: &str) -> LineOutcome<'_> {
    let event = decode_line(line);
    match event.validate() {
        Ok(()) => LineOutcome::Accepted(event),
        Err(reason) => LineOutcome::Rejected(reason),
    }
}

/// Decode and validate a raw line from the mapped buffer.
///
/// Lines that are not valid UTF-8 are rejected with
/// [`RejectReason::InvalidUtf8`].
#[inline]
#[must_use]
pub fn parse_bytes(line: &[u8]) -> LineOutcome<'_> {
    match std::str::from_utf8(line) {
        Ok(text) => parse_line(text),
        Err(_) => LineOutcome::Rejected(RejectReason::InvalidUtf8),
    }
}
