//! Immutable source text, optionally nested inside a larger document.
//!
//! A [`SourceBuffer`] extracted from a parent with [`SourceBuffer::nested`]
//! remembers the byte offset at which it starts, so positions reached while
//! scanning the slice can still be reported as true line/column numbers of
//! the outermost document.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::ScanError;

/// One-based line and column. Columns count characters, not bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl Location {
    pub const START: Location = Location { line: 1, col: 1 };

    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Link from a nested buffer to the buffer it was extracted from.
#[derive(Clone, Debug)]
struct Origin {
    parent: Arc<SourceBuffer>,
    /// Byte offset of this buffer's first byte within `parent`.
    offset: u32,
}

/// Immutable text scanned by a [`Scanner`](crate::Scanner).
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    text: Box<str>,
    /// Length of `text` in bytes, saturated to `u32::MAX`.
    len: u32,
    origin: Option<Origin>,
}

impl SourceBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            len: saturating_len(text),
            text: text.into(),
            origin: None,
        }
    }

    /// Extract `range` of `parent` as a buffer of its own.
    ///
    /// Locations inside the returned buffer resolve back to `parent` through
    /// [`absolute_location`](Self::absolute_location).
    pub fn nested(parent: &Arc<SourceBuffer>, range: Range<u32>) -> Result<Self, ScanError> {
        let Some(text) = parent.text.get(range.start as usize..range.end as usize) else {
            return Err(ScanError::OutOfRangeEnd {
                end: range.end,
                len: parent.len,
            });
        };
        Ok(Self {
            len: saturating_len(text),
            text: text.into(),
            origin: Some(Origin {
                parent: Arc::clone(parent),
                offset: range.start,
            }),
        })
    }

    /// Wrap already-extracted `text` that starts at `offset` inside `parent`.
    pub fn with_parent(text: &str, parent: Arc<SourceBuffer>, offset: u32) -> Self {
        Self {
            len: saturating_len(text),
            text: text.into(),
            origin: Some(Origin { parent, offset }),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The buffer this one was extracted from, if any.
    pub fn parent(&self) -> Option<&Arc<SourceBuffer>> {
        self.origin.as_ref().map(|o| &o.parent)
    }

    /// Offset of this buffer within its parent (0 for a root buffer).
    pub fn nested_offset(&self) -> u32 {
        self.origin.as_ref().map_or(0, |o| o.offset)
    }

    /// Returns `true` if `offset` is within the buffer and on a character
    /// boundary.
    pub fn is_boundary(&self, offset: u32) -> bool {
        self.text.is_char_boundary(offset as usize)
    }

    /// Line and column of `offset` within this buffer.
    ///
    /// A `\n` escaped by a backslash continues the current line. Offsets
    /// past the end are clamped to the end.
    pub fn location(&self, offset: u32) -> Location {
        let offset = offset.min(self.len) as usize;
        let before = &self.as_bytes()[..offset];
        let line = line_breaks(before).saturating_add(1);
        let sol = line_start(before);
        let line_text = &self.text[sol..floor_boundary(&self.text, offset)];
        Location {
            line,
            col: char_count(line_text).saturating_add(1),
        }
    }

    /// Line and column of `offset` in the outermost parent buffer.
    pub fn absolute_location(&self, offset: u32) -> Location {
        match &self.origin {
            Some(origin) => origin
                .parent
                .absolute_location(origin.offset.saturating_add(offset)),
            None => self.location(offset),
        }
    }

    /// The buffer's lines without their terminators.
    pub fn lines(&self) -> Vec<&str> {
        crate::split_lines(&self.text)
    }
}

impl From<&str> for SourceBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceBuffer {
    fn from(text: String) -> Self {
        Self {
            len: saturating_len(&text),
            text: text.into_boxed_str(),
            origin: None,
        }
    }
}

fn saturating_len(text: &str) -> u32 {
    u32::try_from(text.len()).unwrap_or(u32::MAX)
}

/// Number of unescaped `\n` bytes in `bytes`, saturated to `u32::MAX`.
pub(crate) fn line_breaks(bytes: &[u8]) -> u32 {
    let breaks = memchr::memchr_iter(b'\n', bytes)
        .filter(|&nl| !ends_with_escape(&bytes[..nl]))
        .count();
    u32::try_from(breaks).unwrap_or(u32::MAX)
}

/// Offset just past the last unescaped `\n` in `bytes`, or 0.
pub(crate) fn line_start(bytes: &[u8]) -> usize {
    memchr::memrchr_iter(b'\n', bytes)
        .find(|&nl| !ends_with_escape(&bytes[..nl]))
        .map_or(0, |nl| nl + 1)
}

/// `true` if `bytes` ends in an odd run of backslashes, so the next
/// character is escaped.
pub(crate) fn ends_with_escape(bytes: &[u8]) -> bool {
    bytes.iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

pub(crate) fn char_count(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

/// Largest character boundary at or below `offset`.
fn floor_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
