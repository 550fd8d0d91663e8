use crate::buffer::{ChunkBuffer, RangeError, Span};
use crate::scan::{ScanOutcome, scan};
use crate::state::{FenceMachine, FenceState, Transition};

/// A finalized range of the stream handed to the renderer.
///
/// `span` covers the raw bytes consumed, delimiters included: concatenating
/// the spans of all segments in order tiles the input exactly. `text` is
/// the rendered content with structural delimiters (backtick runs, fence
/// opener lines) stripped.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EmitSegment {
    pub state: FenceState,
    pub span: Span,
    pub text: String,
}

/// Driver for one incremental stream.
///
/// Owns the chunk buffer and the fence state machine; instantiate one per
/// independent stream. Fragments are processed strictly in arrival order
/// and all work per fragment is bounded by the unresolved suffix, since the
/// emit frontier always advances to the start of the oldest ambiguous
/// construct.
#[derive(Debug, Clone, Default)]
pub struct StreamSession {
    buffer: ChunkBuffer,
    machine: FenceMachine,
    finished: bool,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and returns the newly finalized segments.
    ///
    /// One segment is emitted per contiguous run of uniform state. An empty
    /// fragment is a no-op append and yields no segments beyond whatever
    /// the rescan resolves.
    pub fn push(&mut self, fragment: &str) -> Result<Vec<EmitSegment>, RangeError> {
        self.buffer.append(fragment);
        self.drive(false)
    }

    /// Signals end-of-stream and emits the remainder of the buffer.
    ///
    /// Any still-ambiguous construct is force-resolved: accumulating
    /// backtick runs, unterminated opener lines, and bare `#` runs flush as
    /// plain text; a complete closer run closes its fence; an open fence or
    /// span is implicitly closed, its content keeping the open tag.
    /// Idempotent: a second call emits nothing.
    pub fn finish(&mut self) -> Result<Vec<EmitSegment>, RangeError> {
        if self.finished {
            return Ok(Vec::new());
        }
        self.finished = true;
        self.drive(true)
    }

    /// Offset of the emit frontier.
    pub fn finalized_to(&self) -> usize {
        self.buffer.finalized_to()
    }

    /// Total bytes buffered so far.
    pub fn buffered_to(&self) -> usize {
        self.buffer.buffered_to()
    }

    /// The state in effect at the emit frontier.
    pub fn state(&self) -> &FenceState {
        self.machine.current()
    }

    fn drive(&mut self, eos: bool) -> Result<Vec<EmitSegment>, RangeError> {
        let base = self.buffer.finalized_to();
        let region = self.buffer.tentative();
        if region.is_empty() {
            return Ok(Vec::new());
        }

        let outcome = scan(
            &region,
            self.machine.current(),
            self.buffer.frontier_at_line_start(),
            eos,
        );

        let transitions = derive_transitions(self.machine.current(), &outcome, base);
        let segments = self.collect_segments(&outcome, base)?;

        self.machine.apply(&transitions);
        self.buffer.advance_finalized(base + outcome.consumed);
        Ok(segments)
    }

    /// Coalesces contiguous same-state pieces into segments, dropping the
    /// text of marker pieces while keeping their spans.
    fn collect_segments(
        &self,
        outcome: &ScanOutcome,
        base: usize,
    ) -> Result<Vec<EmitSegment>, RangeError> {
        let mut segments: Vec<EmitSegment> = Vec::new();
        for piece in &outcome.pieces {
            let span = Span {
                start: base + piece.span.start,
                end: base + piece.span.end,
            };
            let text = if piece.marker {
                String::new()
            } else {
                self.buffer.slice(span)?
            };
            match segments.last_mut() {
                Some(seg) if seg.state == piece.state => {
                    seg.span.end = span.end;
                    seg.text.push_str(&text);
                }
                _ => segments.push(EmitSegment {
                    state: piece.state.clone(),
                    span,
                    text,
                }),
            }
        }
        Ok(segments)
    }
}

/// Derives the ordered state transitions resolved by a scan.
fn derive_transitions(current: &FenceState, outcome: &ScanOutcome, base: usize) -> Vec<Transition> {
    let mut out = Vec::new();
    let mut cur = current.clone();
    for piece in &outcome.pieces {
        if piece.state != cur {
            cur = piece.state.clone();
            out.push(Transition {
                at: base + piece.span.start,
                to: cur.clone(),
            });
        }
    }
    if outcome.end_state != cur {
        out.push(Transition {
            at: base + outcome.consumed,
            to: outcome.end_state.clone(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects all output for one fragmentation, coalescing adjacent
    /// same-state segments so results are comparable across splits.
    fn run_fragments(fragments: &[&str]) -> Vec<(FenceState, String)> {
        let mut session = StreamSession::new();
        let mut all = Vec::new();
        for f in fragments {
            all.extend(session.push(f).unwrap());
        }
        all.extend(session.finish().unwrap());
        coalesce(all)
    }

    fn coalesce(segments: Vec<EmitSegment>) -> Vec<(FenceState, String)> {
        let mut out: Vec<(FenceState, String)> = Vec::new();
        for seg in segments {
            match out.last_mut() {
                Some((state, text)) if *state == seg.state => text.push_str(&seg.text),
                _ => out.push((seg.state, seg.text)),
            }
        }
        out
    }

    #[test]
    fn plain_stream_passes_through() {
        let out = run_fragments(&["hel", "lo ", "world"]);
        assert_eq!(out, vec![(FenceState::Plain, "hello world".to_string())]);
    }

    #[test]
    fn fence_scenario_single_fragment() {
        let out = run_fragments(&["plain ```rust\ncode\n``` more"]);
        assert_eq!(
            out,
            vec![
                (FenceState::Plain, "plain ".to_string()),
                (
                    FenceState::InFence {
                        lang: Some("rust".to_string())
                    },
                    "code\n".to_string()
                ),
                (FenceState::Plain, " more".to_string()),
            ]
        );
    }

    #[test]
    fn inline_code_split_between_ticks() {
        let out = run_fragments(&["a `b", "` c"]);
        assert_eq!(
            out,
            vec![
                (FenceState::Plain, "a ".to_string()),
                (FenceState::InlineCode { ticks: 1 }, "b".to_string()),
                (FenceState::Plain, " c".to_string()),
            ]
        );
    }

    #[test]
    fn trailing_ticks_flush_as_plain() {
        let out = run_fragments(&["text ```"]);
        assert_eq!(out, vec![(FenceState::Plain, "text ```".to_string())]);
    }

    #[test]
    fn unterminated_fence_keeps_open_tag() {
        let out = run_fragments(&["```py\nprint()"]);
        assert_eq!(
            out,
            vec![(
                FenceState::InFence {
                    lang: Some("py".to_string())
                },
                "print()".to_string()
            )]
        );
    }

    #[test]
    fn opener_line_not_finalized_early() {
        let mut session = StreamSession::new();
        session.push("```ru").unwrap();
        assert_eq!(session.finalized_to(), 0);
        session.push("st").unwrap();
        assert_eq!(session.finalized_to(), 0);
        session.push("\n").unwrap();
        assert_eq!(session.finalized_to(), 8);
    }

    #[test]
    fn finalized_to_is_monotone() {
        let mut session = StreamSession::new();
        let mut last = 0;
        for f in ["a`", "`b", "``", " #", "# t\n", "```", "x\n", "y"] {
            session.push(f).unwrap();
            assert!(session.finalized_to() >= last);
            last = session.finalized_to();
        }
    }

    #[test]
    fn fragment_boundary_after_multibyte_character() {
        let out = run_fragments(&["é", "x"]);
        assert_eq!(out, vec![(FenceState::Plain, "éx".to_string())]);

        let out = run_fragments(&["汉`字", "`\n```", "rs\ncode\n", "```\n"]);
        assert_eq!(
            out,
            vec![
                (FenceState::Plain, "汉".to_string()),
                (FenceState::InlineCode { ticks: 1 }, "字".to_string()),
                (FenceState::Plain, "\n".to_string()),
                (
                    FenceState::InFence {
                        lang: Some("rs".to_string())
                    },
                    "code\n".to_string()
                ),
                (FenceState::Plain, "\n".to_string()),
            ]
        );
    }

    #[test]
    fn finish_is_idempotent() {
        let mut session = StreamSession::new();
        session.push("tail `").unwrap();
        let first = session.finish().unwrap();
        assert!(!first.is_empty());
        assert!(session.finish().unwrap().is_empty());
    }

    #[test]
    fn empty_fragment_is_a_noop() {
        let mut session = StreamSession::new();
        session.push("a `").unwrap();
        let before = session.finalized_to();
        let out = session.push("").unwrap();
        assert!(out.is_empty());
        assert_eq!(session.finalized_to(), before);
    }

    #[test]
    fn spans_tile_the_input() {
        let mut session = StreamSession::new();
        let mut segments = Vec::new();
        for f in ["plain ``", "`rust\nco", "de\n```", " more"] {
            segments.extend(session.push(f).unwrap());
        }
        segments.extend(session.finish().unwrap());

        let mut at = 0;
        for seg in &segments {
            assert_eq!(seg.span.start, at);
            at = seg.span.end;
        }
        assert_eq!(at, session.buffered_to());
    }

    #[test]
    fn state_reflects_open_constructs() {
        let mut session = StreamSession::new();
        session.push("```rust\n").unwrap();
        assert_eq!(
            session.state(),
            &FenceState::InFence {
                lang: Some("rust".to_string())
            }
        );
        session.push("fn main() {}\n```").unwrap();
        session.push("\n").unwrap();
        assert_eq!(session.state(), &FenceState::Plain);
    }
}
