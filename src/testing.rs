//! Fixtures for tests and benchmarks.
//!
//! ```
//! use clickstream::testing::*;
//! use clickstream::{IngestConfig, MappedFile, ParseSession};
//!
//! # fn main() -> anyhow::Result<()> {
//! let fixture = write_fixture(&well_formed_lines(3))?;
//! let file = MappedFile::open(fixture.path())?;
//! let mut session = ParseSession::new(IngestConfig::default().with_capacity_hint(16))?;
//! assert_eq!(session.ingest_file(&file).accepted, 3);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

/// Header line of the export format.
pub const HEADER: &str =
    "event_time,event_type,product_id,category_id,category_code,brand,price,user_id,user_session";

/// Builds one data line with sensible defaults for every column.
///
/// ```
/// use clickstream::testing::EventLineBuilder;
///
/// let line = EventLineBuilder::new().kind("purchase").price("-1").build();
/// assert!(line.contains(",purchase,"));
/// assert!(line.contains(",-1,"));
/// ```
#[derive(Clone, Debug)]
pub struct EventLineBuilder {
    time: String,
    kind: String,
    product_id: String,
    category_id: String,
    category_code: String,
    brand: String,
    price: String,
    user_id: String,
    session: String,
}

impl Default for EventLineBuilder {
    fn default() -> Self {
        Self {
            time: "2019-11-01 00:00:00 UTC".into(),
            kind: "view".into(),
            product_id: "1003461".into(),
            category_id: "2053013555631882655".into(),
            category_code: "electronics.smartphone".into(),
            brand: "xiaomi".into(),
            price: "489.07".into(),
            user_id: "520088904".into(),
            session: "4d3b30da-a5e4-49df-b1a8-ba5943f1dd33".into(),
        }
    }
}

macro_rules! setters {
    ($($name:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $name(mut self, value: impl Into<String>) -> Self {
                self.$name = value.into();
                self
            }
        )*
    };
}

impl EventLineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    setters!(time, kind, product_id, category_id, category_code, brand, price, user_id, session);

    /// The line, without terminator.
    #[must_use]
    pub fn build(&self) -> String {
        [
            self.time.as_str(),
            self.kind.as_str(),
            self.product_id.as_str(),
            self.category_id.as_str(),
            self.category_code.as_str(),
            self.brand.as_str(),
            self.price.as_str(),
            self.user_id.as_str(),
            self.session.as_str(),
        ]
        .join(",")
    }
}

/// `n` distinct lines that all pass validation, cycling through the four event
/// kinds.
#[must_use]
pub fn well_formed_lines(n: usize) -> Vec<String> {
    const KINDS: [&str; 4] = ["view", "cart", "remove_from_cart", "purchase"];
    (0..n)
        .map(|i| {
            EventLineBuilder::new()
                .time(format!("2019-11-{:02} {:02}:{:02}:{:02} UTC", i % 28 + 1, i % 24, i % 60, (i * 7) % 60))
                .kind(KINDS[i % KINDS.len()])
                .product_id((1000 + i % 97).to_string())
                .price(format!("{}.{:02}", i % 500, i % 100))
                .user_id((500_000 + i).to_string())
                .session(format!("session-{i}"))
                .build()
        })
        .collect()
}

/// File contents: header plus `lines`, each terminated with `\n`.
#[must_use]
pub fn fixture_bytes<S: AsRef<str>>(lines: &[S]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER.len() + 1 + lines.len() * 128);
    out.extend_from_slice(HEADER.as_bytes());
    out.push(b'\n');
    for line in lines {
        out.extend_from_slice(line.as_ref().as_bytes());
        out.push(b'\n');
    }
    out
}

/// Write [`fixture_bytes`] to a temporary file that is deleted on drop.
///
/// # Errors
/// Returns an error if the temporary file cannot be created or written.
pub fn write_fixture<S: AsRef<str>>(lines: &[S]) -> Result<NamedTempFile> {
    write_raw_fixture(&fixture_bytes(lines))
}

/// Write `contents` verbatim to a temporary file.
///
/// # Errors
/// Returns an error if the temporary file cannot be created or written.
pub fn write_raw_fixture(contents: &[u8]) -> Result<NamedTempFile> {
    let mut f = NamedTempFile::new()?;
    f.write_all(contents)?;
    f.flush()?;
    Ok(f)
}
