pub mod span;

use xi_rope::Rope;

pub use span::Span;

/// A slice request referenced bytes past the end of the buffer.
///
/// This is programmer misuse, not a stream condition: the buffer fails
/// fast rather than clamping the range.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("slice [{start}, {end}) out of range: buffered_to = {buffered_to}")]
pub struct RangeError {
    pub start: usize,
    pub end: usize,
    pub buffered_to: usize,
}

/// Append-only store for incoming fragments with a finalize frontier.
///
/// Fragments are concatenated into a single logical text stream. Two
/// offsets partition it: bytes before `finalized_to` have been emitted and
/// are never reinterpreted; bytes in `[finalized_to, buffered_to)` are the
/// tentative region, still subject to reclassification as more input
/// arrives.
#[derive(Debug, Clone)]
pub struct ChunkBuffer {
    text: Rope,
    finalized_to: usize,
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        Self {
            text: Rope::from(""),
            finalized_to: 0,
        }
    }
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and returns the new `buffered_to`.
    ///
    /// Empty fragments are accepted as a no-op append.
    pub fn append(&mut self, fragment: &str) -> usize {
        if !fragment.is_empty() {
            let end = self.text.len();
            self.text.edit(end..end, fragment);
        }
        self.text.len()
    }

    /// Total bytes appended so far.
    pub fn buffered_to(&self) -> usize {
        self.text.len()
    }

    /// Offset of the emit frontier. Only ever increases.
    pub fn finalized_to(&self) -> usize {
        self.finalized_to
    }

    /// Extracts the text for a span as an owned String.
    pub fn slice(&self, sp: Span) -> Result<String, RangeError> {
        if sp.end > self.text.len() || sp.start > sp.end {
            return Err(RangeError {
                start: sp.start,
                end: sp.end,
                buffered_to: self.text.len(),
            });
        }
        Ok(self.text.slice_to_cow(sp.start..sp.end).into_owned())
    }

    /// The tentative region `[finalized_to, buffered_to)` as a String.
    pub fn tentative(&self) -> String {
        self.text
            .slice_to_cow(self.finalized_to..self.text.len())
            .into_owned()
    }

    /// Whether the frontier currently sits at the start of a line.
    ///
    /// True at offset zero and directly after a line terminator; drives
    /// line-start-only constructs (fences, heading markers). Inspects the
    /// raw byte, since the frontier may sit inside a multi-byte character's
    /// neighborhood where a str slice would be rejected.
    pub fn frontier_at_line_start(&self) -> bool {
        self.finalized_to == 0 || self.text.byte_at(self.finalized_to - 1) == b'\n'
    }

    /// Advances the emit frontier. Monotone by contract.
    pub fn advance_finalized(&mut self, to: usize) {
        debug_assert!(to >= self.finalized_to, "frontier must not move back");
        debug_assert!(to <= self.text.len(), "frontier past buffered_to");
        self.finalized_to = to;
    }
}
