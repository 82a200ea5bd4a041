//! Typed field decoders.
//!
//! Every decoder is total: malformed input produces a default value (zero,
//! [`EventKind::Unrecognized`], an empty category) instead of an error. The
//! validity predicate on [`Event`](crate::Event) decides afterwards whether the
//! record survives.

use crate::event::{CategoryCode, EventKind, Timestamp};
use std::str::FromStr;

/// Minimum length of a `YYYY-MM-DD HH:MM:SS` prefix.
pub const TIMESTAMP_LEN: usize = 19;

/// Decode a number, yielding zero on empty or malformed input.
///
/// The whole field must be numeric: trailing garbage (`"12x"`), overflow and
/// an explicit `+` sign all decode to zero. Parsing goes through
/// [`FromStr`], which is locale independent and does not allocate.
///
/// ```
/// use clickstream::decode::decode_number;
///
/// assert_eq!(decode_number::<u64>("42"), 42);
/// assert_eq!(decode_number::<u64>("12x"), 0);
/// assert_eq!(decode_number::<f64>(""), 0.0);
/// ```
#[inline]
#[must_use]
pub fn decode_number<T>(field: &str) -> T
where
    T: FromStr + Default,
{
    if field.starts_with('+') {
        return T::default();
    }
    field.parse().unwrap_or_default()
}

/// Decode an event-type token. Matching is exact and case sensitive.
#[inline]
#[must_use]
pub fn decode_kind(field: &str) -> EventKind {
    match field {
        "view" => EventKind::View,
        "cart" => EventKind::AddToCart,
        "remove_from_cart" => EventKind::RemoveFromCart,
        "purchase" => EventKind::Purchase,
        _ => EventKind::Unrecognized,
    }
}

/// Decode a `YYYY-MM-DD HH:MM:SS` prefix; anything after the 19th byte is ignored.
///
/// Input shorter than 19 bytes yields the all-zero timestamp. A component whose
/// range does not fall on a character boundary decodes to zero.
#[must_use]
pub fn decode_timestamp(field: &str) -> Timestamp {
    if field.len() < TIMESTAMP_LEN {
        return Timestamp::default();
    }
    let part = |start: usize, width: usize| field.get(start..start + width).unwrap_or("");
    Timestamp {
        year: decode_number(part(0, 4)),
        month: decode_number(part(5, 2)),
        day: decode_number(part(8, 2)),
        hour: decode_number(part(11, 2)),
        minute: decode_number(part(14, 2)),
        second: decode_number(part(17, 2)),
    }
}

/// Split a dotted category code into at most three levels.
///
/// Levels past the third are dropped.
#[must_use]
pub fn decode_category(field: &str) -> CategoryCode<'_> {
    let mut code = CategoryCode::default();
    if field.is_empty() {
        return code;
    }
    let mut parts = field.split('.');
    code.top = parts.next().unwrap_or("");
    code.sub = parts.next().unwrap_or("");
    code.secondary = parts.next().unwrap_or("");
    code
}
