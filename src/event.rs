//! The event record and its validity predicate.
//!
//! An [`Event`] is the fixed-shape form of one data line. Every text-bearing
//! field borrows from the input buffer, so an `Event<'a>` can never outlive the
//! mapping it was parsed from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock timestamp as written in the export (no timezone).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    /// Build a timestamp from its six components.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self { year, month, day, hour, minute, second }
    }

    /// `true` for the all-zero value produced by an unparseable timestamp.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Kind of user interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "view")]
    View,
    #[serde(rename = "cart")]
    AddToCart,
    #[serde(rename = "remove_from_cart")]
    RemoveFromCart,
    #[serde(rename = "purchase")]
    Purchase,
    #[serde(rename = "unknown")]
    Unrecognized,
}

impl EventKind {
    /// The token this kind is written as in the export.
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::AddToCart => "cart",
            Self::RemoveFromCart => "remove_from_cart",
            Self::Purchase => "purchase",
            Self::Unrecognized => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Up to three levels of a dotted taxonomy code, e.g. `electronics.smartphone.apple`.
///
/// Missing levels are empty strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryCode<'a> {
    pub top: &'a str,
    pub sub: &'a str,
    pub secondary: &'a str,
}

impl<'a> CategoryCode<'a> {
    /// Non-empty levels, top first.
    pub fn levels(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        [self.top, self.sub, self.secondary]
            .into_iter()
            .filter(|s| !s.is_empty())
    }

    /// `true` when no level is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.sub.is_empty() && self.secondary.is_empty()
    }
}

/// One parsed interaction line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Event<'a> {
    pub time: Timestamp,
    pub kind: EventKind,
    pub product_id: u64,
    pub category_id: u64,
    pub category_code: CategoryCode<'a>,
    pub brand: &'a str,
    pub price: f64,
    pub user_id: u64,
    pub session: &'a str,
}

impl Event<'_> {
    /// Check the retention predicate.
    ///
    /// Conditions are checked in a fixed order (price, kind, product, user) and
    /// the first failing one is reported.
    ///
    /// # Errors
    /// Returns the [`RejectReason`] of the first failing condition.
    pub fn validate(&self) -> Result<(), RejectReason> {
        // NaN prices fail this comparison too.
        if !(self.price >= 0.0) {
            return Err(RejectReason::InvalidPrice);
        }
        if self.kind == EventKind::Unrecognized {
            return Err(RejectReason::UnrecognizedKind);
        }
        if self.product_id == 0 {
            return Err(RejectReason::MissingProductId);
        }
        if self.user_id == 0 {
            return Err(RejectReason::MissingUserId);
        }
        Ok(())
    }

    /// `true` if [`validate`](Self::validate) passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Why a data line did not make it into the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Price is negative or not a number.
    InvalidPrice,
    UnrecognizedKind,
    /// Product id is zero or failed to parse.
    MissingProductId,
    /// User id is zero or failed to parse.
    MissingUserId,
    /// The line is not valid UTF-8, so its text fields cannot be borrowed.
    InvalidUtf8,
}

impl RejectReason {
    pub const ALL: [RejectReason; 5] = [
        RejectReason::InvalidPrice,
        RejectReason::UnrecognizedKind,
        RejectReason::MissingProductId,
        RejectReason::MissingUserId,
        RejectReason::InvalidUtf8,
    ];
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidPrice => "price is negative or not a number",
            Self::UnrecognizedKind => "unrecognized event type",
            Self::MissingProductId => "product id is zero or malformed",
            Self::MissingUserId => "user id is zero or malformed",
            Self::InvalidUtf8 => "line is not valid UTF-8",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RejectReason {}
