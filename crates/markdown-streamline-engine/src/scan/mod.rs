pub mod kinds;
mod pending;

use crate::buffer::Span;
use crate::state::FenceState;

use kinds::{CodeFence, CodeSpan, Heading};
pub use pending::PendingMarker;

/// A resolved piece of the tentative region.
///
/// Marker pieces cover structural delimiter text (backtick runs, fence
/// opener lines): their bytes tile the buffer like any other piece, but
/// they contribute no rendered text to the segment they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPiece {
    /// Byte span relative to the start of the scanned region.
    pub span: Span,
    /// The state active for this span.
    pub state: FenceState,
    /// Structural delimiter text, excluded from rendered output.
    pub marker: bool,
}

/// Result of one scan over the tentative region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Length of the resolved prefix; nothing beyond it may be finalized.
    /// Zero is valid when the whole region is one ambiguous construct.
    pub consumed: usize,
    /// Resolved pieces, in order, exactly tiling `[0, consumed)`.
    pub pieces: Vec<ScanPiece>,
    /// The state in effect after the resolved prefix.
    pub end_state: FenceState,
    /// The ambiguous construct that stopped the scan, if any.
    pub pending: Option<PendingMarker>,
}

/// Finds the largest prefix of the tentative region whose interpretation
/// can no longer change, whatever arrives next.
///
/// `start` is the state in effect at the region's first byte and
/// `at_line_start` whether that byte begins a line. With `eos` set, every
/// pending construct is force-resolved: accumulating backtick runs,
/// unterminated opener lines, and bare `#` runs flush as plain text, while
/// a complete three-backtick closer run still closes its fence.
///
/// The scanner never fails; on malformed or incomplete structure it
/// degrades to plain-text classification.
pub fn scan(s: &str, start: &FenceState, at_line_start: bool, eos: bool) -> ScanOutcome {
    Scanner {
        s,
        bytes: s.as_bytes(),
        at_line_start,
        eos,
        i: 0,
        seg_start: 0,
        state: start.clone(),
        pieces: Vec::new(),
        pending: None,
    }
    .run()
}

struct Scanner<'a> {
    s: &'a str,
    bytes: &'a [u8],
    at_line_start: bool,
    eos: bool,
    i: usize,
    seg_start: usize,
    state: FenceState,
    pieces: Vec<ScanPiece>,
    pending: Option<PendingMarker>,
}

impl Scanner<'_> {
    fn run(mut self) -> ScanOutcome {
        while self.i < self.bytes.len() && self.pending.is_none() {
            // Each arm advances, changes state, or records a pending marker.
            match self.state.clone() {
                FenceState::Plain => self.scan_plain(),
                FenceState::InlineCode { ticks } => self.scan_inline(ticks),
                FenceState::InFence { lang } => self.scan_fence(&lang),
            }
        }
        let end = self.i;
        self.flush(end);
        ScanOutcome {
            consumed: self.i,
            pieces: self.pieces,
            end_state: self.state,
            pending: self.pending,
        }
    }

    fn line_start(&self, i: usize) -> bool {
        if i == 0 {
            self.at_line_start
        } else {
            self.bytes[i - 1] == b'\n'
        }
    }

    fn run_end(&self, from: usize, b: u8) -> usize {
        let mut j = from;
        while j < self.bytes.len() && self.bytes[j] == b {
            j += 1;
        }
        j
    }

    fn find_newline(&self, from: usize) -> Option<usize> {
        self.bytes[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|rel| from + rel)
    }

    /// Emits the content accumulated since the last piece boundary.
    fn flush(&mut self, end: usize) {
        if end > self.seg_start {
            self.pieces.push(ScanPiece {
                span: Span {
                    start: self.seg_start,
                    end,
                },
                state: self.state.clone(),
                marker: false,
            });
            self.seg_start = end;
        }
    }

    fn push_marker(&mut self, span: Span, state: FenceState) {
        self.pieces.push(ScanPiece {
            span,
            state,
            marker: true,
        });
        self.seg_start = span.end;
    }

    fn scan_plain(&mut self) {
        while self.i < self.bytes.len() {
            let b = self.bytes[self.i];
            if b == CodeSpan::TICK {
                let at = self.i;
                let run_end = self.run_end(at, CodeSpan::TICK);
                let run_len = run_end - at;
                if run_end == self.bytes.len() && !self.eos && run_len <= CodeFence::TICKS {
                    // Still accumulating; could yet become an opener.
                    self.pending = Some(PendingMarker::Ticks { len: run_len });
                    return;
                }
                if CodeFence::run_matches(run_len) {
                    match self.find_newline(run_end) {
                        Some(nl) => {
                            let lang = CodeFence::lang_tag(&self.s[run_end..nl]);
                            self.flush(at);
                            let state = FenceState::InFence { lang };
                            self.push_marker(
                                Span {
                                    start: at,
                                    end: nl + 1,
                                },
                                state.clone(),
                            );
                            self.state = state;
                            self.i = nl + 1;
                            return;
                        }
                        None if self.eos => {
                            // Unterminated opener line flushes as plain text.
                            self.i = self.bytes.len();
                            return;
                        }
                        None => {
                            self.pending = Some(PendingMarker::FenceOpen);
                            return;
                        }
                    }
                }
                if CodeSpan::opens(run_len)
                    && run_end < self.bytes.len()
                    && self.bytes[run_end] != b'\n'
                {
                    self.flush(at);
                    let state = FenceState::InlineCode { ticks: run_len };
                    self.push_marker(
                        Span {
                            start: at,
                            end: run_end,
                        },
                        state.clone(),
                    );
                    self.state = state;
                    self.i = run_end;
                    return;
                }
                // Literal backticks.
                self.i = run_end;
            } else if b == Heading::HASH && self.line_start(self.i) {
                let run_end = self.run_end(self.i, Heading::HASH);
                let run_len = run_end - self.i;
                if run_end == self.bytes.len() && !self.eos && run_len <= Heading::MAX_LEVEL {
                    self.pending = Some(PendingMarker::Hashes { len: run_len });
                    return;
                }
                // Heading or not, the marker stays plain text.
                self.i = run_end;
            } else {
                self.i += 1;
            }
        }
    }

    fn scan_inline(&mut self, ticks: usize) {
        while self.i < self.bytes.len() {
            let b = self.bytes[self.i];
            if b == CodeSpan::TICK {
                let at = self.i;
                let run_end = self.run_end(at, CodeSpan::TICK);
                let run_len = run_end - at;
                if run_end == self.bytes.len() && !self.eos && run_len <= ticks {
                    self.pending = Some(PendingMarker::Ticks { len: run_len });
                    return;
                }
                if run_len == ticks {
                    self.flush(at);
                    self.push_marker(
                        Span {
                            start: at,
                            end: run_end,
                        },
                        FenceState::InlineCode { ticks },
                    );
                    self.state = FenceState::Plain;
                    self.i = run_end;
                    return;
                }
                // A run of the wrong length is literal span content.
                self.i = run_end;
            } else if b == b'\n' {
                // Spans are line-scoped: an unclosed span ends at the
                // terminator, which itself is plain text.
                let at = self.i;
                self.flush(at);
                self.state = FenceState::Plain;
                return;
            } else {
                self.i += 1;
            }
        }
    }

    fn scan_fence(&mut self, lang: &Option<String>) {
        while self.i < self.bytes.len() {
            let at = self.i;
            if self.line_start(at) && self.bytes[at] == CodeSpan::TICK {
                let run_end = self.run_end(at, CodeSpan::TICK);
                let run_len = run_end - at;
                if run_end == self.bytes.len() && !self.eos && run_len <= CodeFence::TICKS {
                    self.pending = Some(PendingMarker::FenceClose);
                    return;
                }
                if CodeFence::run_matches(run_len) {
                    self.flush(at);
                    self.push_marker(
                        Span {
                            start: at,
                            end: run_end,
                        },
                        FenceState::InFence { lang: lang.clone() },
                    );
                    self.state = FenceState::Plain;
                    self.i = run_end;
                    return;
                }
                self.i = run_end;
            } else {
                // The rest of this line is opaque content.
                match self.find_newline(at) {
                    Some(nl) => self.i = nl + 1,
                    None => {
                        self.i = self.bytes.len();
                        return;
                    }
                }
            }
        }
    }
}
