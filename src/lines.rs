//! Memory-mapped input and newline splitting.
//!
//! [`MappedFile`] owns the read-only mapping; every line, field and
//! [`Event`](crate::Event) handed out later borrows from it. [`Lines`] walks
//! the mapped bytes lazily with `memchr`, skipping the header and blank lines
//! and stripping a `\r` before each `\n`.

use anyhow::{Context, Result};
use memchr::{memchr, memchr_iter};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A read-only memory mapping of one input file.
///
/// Zero-length files are not mapped (an empty mapping is not portable); they
/// expose an empty byte slice instead.
#[derive(Debug)]
pub struct MappedFile {
    path: PathBuf,
    map: Option<Mmap>,
}

impl MappedFile {
    /// Open and map `path` read-only.
    ///
    /// The file must not be truncated or rewritten by another process while the
    /// mapping is alive.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, inspected or mapped. The
    /// failure is also logged at `error` level.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::map_path(path).inspect_err(|e| error!(path = %path.display(), error = %e, "cannot map input"))
    }

    fn map_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        let map = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and lives as long as `self`; all
            // borrowed views are tied to `&self`.
            let map = unsafe { Mmap::map(&file) }.with_context(|| format!("map {}", path.display()))?;
            Some(map)
        };
        debug!(path = %path.display(), bytes = len, "mapped input");
        Ok(Self { path: path.to_path_buf(), map })
    }

    /// The mapped bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    /// Mapped length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// `true` for a zero-length file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The path the file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data lines of the file, header skipped.
    #[must_use]
    pub fn lines(&self) -> Lines<'_> {
        Lines::after_header(self.as_bytes())
    }
}

/// Offset of the first byte after the header line.
///
/// If the buffer has no newline at all, the whole buffer is the header.
#[must_use]
pub fn data_start(buf: &[u8]) -> usize {
    memchr(b'\n', buf).map_or(buf.len(), |nl| nl + 1)
}

/// Lazy iterator over the non-empty lines of a byte range.
///
/// Yields `(offset, line)` where `offset` is the position of the line's first
/// byte in the underlying buffer. Line terminators (`\n` or `\r\n`) are not
/// part of `line`; the last line needs no terminator.
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Lines<'a> {
    /// Every line in `buf`, including the first.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::range(buf, 0, buf.len())
    }

    /// Every line in `buf` after the header line.
    #[must_use]
    pub fn after_header(buf: &'a [u8]) -> Self {
        Self::range(buf, data_start(buf), buf.len())
    }

    /// Lines starting in `buf[start..end]`. `start` must be a line start.
    #[must_use]
    pub fn range(buf: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(buf.len());
        Self { buf, pos: start.min(end), end }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.end {
            let start = self.pos;
            let rest = &self.buf[start..self.end];
            let (mut line, advance) = match memchr(b'\n', rest) {
                Some(nl) => (&rest[..nl], nl + 1),
                None => (rest, rest.len()),
            };
            self.pos += advance;
            if let [head @ .., b'\r'] = line {
                line = head;
            }
            if !line.is_empty() {
                return Some((start, line));
            }
        }
        None
    }
}

/// Upper bound on the number of lines in `bytes`.
#[must_use]
pub fn line_capacity(bytes: &[u8]) -> usize {
    memchr_iter(b'\n', bytes).count() + 1
}

/// Cut `buf[start..]` into at most `parts` contiguous ranges whose boundaries
/// fall right after a newline, so that no line straddles two ranges.
///
/// Ranges are `(start, end)` byte offsets, non-empty, in file order, and
/// together cover `start..buf.len()` exactly. `parts` is clamped to the
/// number of bytes in the region.
#[must_use]
pub fn line_aligned_chunks(buf: &[u8], start: usize, parts: usize) -> Vec<(usize, usize)> {
    let len = buf.len();
    if start >= len {
        return Vec::new();
    }
    let parts = parts.clamp(1, len - start);
    let step = (len - start).div_ceil(parts);

    let mut out = Vec::with_capacity(parts);
    let mut prev = start;
    for i in 1..parts {
        let cut = start + i * step;
        if cut >= len {
            break;
        }
        if cut <= prev {
            continue;
        }
        let aligned = memchr(b'\n', &buf[cut..]).map_or(len, |nl| cut + nl + 1);
        if aligned > prev {
            out.push((prev, aligned));
            prev = aligned;
        }
        if prev >= len {
            break;
        }
    }
    if prev < len {
        out.push((prev, len));
    }
    out
}
