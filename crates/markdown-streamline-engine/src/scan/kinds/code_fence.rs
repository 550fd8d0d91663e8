/// Fenced code block delimiter knowledge.
///
/// A fence opens on a run of exactly three backticks in plain text; the
/// rest of that line is the language tag, so the opener is ambiguous until
/// its line terminator arrives. Inside a fence, a run of exactly three
/// backticks at line start closes it; everything else is opaque content.
pub struct CodeFence;

impl CodeFence {
    /// Backtick count of opening and closing runs.
    pub const TICKS: usize = 3;

    /// Whether a resolved backtick run delimits a fence.
    pub fn run_matches(run_len: usize) -> bool {
        run_len == Self::TICKS
    }

    /// Extracts the language tag from the text between the opening run and
    /// the line terminator. Whitespace is trimmed; empty means no tag.
    pub fn lang_tag(tail: &str) -> Option<String> {
        let tag = tail.trim_end_matches(['\r', '\n']).trim();
        if tag.is_empty() {
            None
        } else {
            Some(tag.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_three_ticks_delimit() {
        assert!(CodeFence::run_matches(3));
        assert!(!CodeFence::run_matches(2));
        assert!(!CodeFence::run_matches(4));
    }

    #[test]
    fn lang_tag_trimmed() {
        assert_eq!(CodeFence::lang_tag("rust"), Some("rust".to_string()));
        assert_eq!(CodeFence::lang_tag(" rust \r"), Some("rust".to_string()));
    }

    #[test]
    fn empty_lang_tag_is_none() {
        assert_eq!(CodeFence::lang_tag(""), None);
        assert_eq!(CodeFence::lang_tag("  \r"), None);
    }
}
