/// The kind of region the writer is currently inside.
///
/// Exactly one value is active at any buffer position. Transitions are only
/// applied once the boundary scanner has fully resolved them, so the state
/// recorded for a finalized offset is never retroactively corrected.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum FenceState {
    /// Ordinary prose, including heading lines.
    Plain,
    /// Inside an inline code span opened by a run of `ticks` backticks.
    InlineCode { ticks: usize },
    /// Inside a fenced code block, with its language tag if one was given.
    InFence { lang: Option<String> },
}

impl Default for FenceState {
    fn default() -> Self {
        FenceState::Plain
    }
}

/// A resolved state change at an absolute buffer offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Byte offset at which the new state takes effect.
    pub at: usize,
    pub to: FenceState,
}

/// Holds the single current [`FenceState`] for one stream.
///
/// Owned by the driver and passed by reference where needed, so each
/// independent stream gets its own machine (no module-level state).
#[derive(Debug, Clone, Default)]
pub struct FenceMachine {
    state: FenceState,
    applied_to: usize,
}

impl FenceMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &FenceState {
        &self.state
    }

    /// Replays scanner-resolved transitions in order.
    ///
    /// Offsets must be monotone with the buffer; the scanner guarantees it
    /// reports a transition only once fully resolved.
    pub fn apply(&mut self, transitions: &[Transition]) {
        for t in transitions {
            debug_assert!(t.at >= self.applied_to, "transition offsets must be monotone");
            self.applied_to = t.at;
            self.state = t.to.clone();
        }
    }
}
