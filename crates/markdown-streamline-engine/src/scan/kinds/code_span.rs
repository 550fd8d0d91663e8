/// Inline code span delimiter knowledge.
///
/// Code spans are raw zones: no other construct is recognized inside them.
/// Opening runs are one or two backticks; the closing run must have exactly
/// the same count.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Longest backtick run that can open an inline span. Three backticks
    /// at line start belong to the fence rule instead.
    pub const MAX_OPENER: usize = 2;

    /// Whether a resolved backtick run of this length can open a span.
    pub fn opens(run_len: usize) -> bool {
        (1..=Self::MAX_OPENER).contains(&run_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_two_ticks_open() {
        assert!(CodeSpan::opens(1));
        assert!(CodeSpan::opens(2));
    }

    #[test]
    fn longer_runs_do_not_open() {
        assert!(!CodeSpan::opens(0));
        assert!(!CodeSpan::opens(3));
        assert!(!CodeSpan::opens(4));
    }
}
