//! Byte-offset access to the text behind swc spans.

use std::ops::Range;
use swc_common::{BytePos, Span};

/// The source text of one file together with the position swc assigned to its
/// first byte.
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    text: &'a str,
    start: BytePos,
}

impl<'a> SourceText<'a> {
    /// Wraps `text`, whose first byte sits at `start` in the swc source map.
    pub fn new(text: &'a str, start: BytePos) -> Self {
        Self { text, start }
    }

    /// The full text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Converts a source-map position to a byte offset, clamped to the text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.start.0) as usize).min(self.text.len())
    }

    /// Converts a span to a byte range.
    pub fn range(&self, span: Span) -> Range<usize> {
        let start = self.offset(span.lo);
        let end = self.offset(span.hi).max(start);
        start..end
    }

    /// The text covered by `span`; empty for dummy spans.
    pub fn slice(&self, span: Span) -> &'a str {
        if span.lo.0 == 0 && span.hi.0 == 0 {
            return "";
        }
        self.text.get(self.range(span)).unwrap_or_default()
    }
}
