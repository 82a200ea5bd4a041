//! Comma splitting for a single data line.

use memchr::memchr;

/// Number of columns in an export line.
pub const COLUMNS: usize = 9;

/// Column positions, in file order.
pub mod column {
    pub const EVENT_TIME: usize = 0;
    pub const EVENT_TYPE: usize = 1;
    pub const PRODUCT_ID: usize = 2;
    pub const CATEGORY_ID: usize = 3;
    pub const CATEGORY_CODE: usize = 4;
    pub const BRAND: usize = 5;
    pub const PRICE: usize = 6;
    pub const USER_ID: usize = 7;
    pub const USER_SESSION: usize = 8;
}

/// Split `line` on `,` into exactly `N` borrowed fields.
///
/// Fields past the end of the data stay empty. When the line has more than
/// `N` fields, the last slot holds the `N`th field only and the remainder of
/// the line is ignored. No quoting is recognized.
///
/// ```
/// use clickstream::tokenizer::split_fields;
///
/// let f = split_fields::<4>("a,b");
/// assert_eq!(f, ["a", "b", "", ""]);
/// ```
#[inline]
#[must_use]
pub fn split_fields<const N: usize>(line: &str) -> [&str; N] {
    let mut fields = [""; N];
    let mut rest = line;
    for slot in &mut fields {
        if rest.is_empty() {
            break;
        }
        match memchr(b',', rest.as_bytes()) {
            Some(comma) => {
                *slot = &rest[..comma];
                rest = &rest[comma + 1..];
            }
            None => {
                *slot = rest;
                rest = "";
            }
        }
    }
    fields
}
