/// A candidate structural token still accumulating at the end of the
/// tentative region.
///
/// While one of these is pending, the characters it covers must not be
/// finalized: more input could still change their meaning. The scanner
/// recomputes the pending marker on every pass, so zero progress is a valid
/// outcome when the whole region is one ambiguous construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMarker {
    /// A backtick run whose final length is unknown.
    Ticks { len: usize },
    /// A three-backtick opener whose language tag awaits its terminator.
    FenceOpen,
    /// A line-start backtick run inside a fence that could become a closer.
    FenceClose,
    /// A `#` run at line start awaiting its disambiguating character.
    Hashes { len: usize },
}
