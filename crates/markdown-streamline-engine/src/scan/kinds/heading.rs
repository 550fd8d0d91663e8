/// Heading marker knowledge.
///
/// Headings stay `Plain` for emission purposes; the marker only matters to
/// the scanner because a bare `#` run at the end of the tentative region
/// must not be finalized until the next character disambiguates it, keeping
/// the marker intact for the renderer.
pub struct Heading;

impl Heading {
    pub const HASH: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Parses a heading marker at the start of a line.
    ///
    /// Returns the level when the line begins with one to six `#` followed
    /// by a space; `None` otherwise.
    pub fn level(line: &str) -> Option<u8> {
        let bytes = line.as_bytes();
        let run = bytes.iter().take_while(|&&b| b == Self::HASH).count();
        if (1..=Self::MAX_LEVEL).contains(&run) && bytes.get(run) == Some(&b' ') {
            Some(run as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_one_through_six() {
        assert_eq!(Heading::level("# one"), Some(1));
        assert_eq!(Heading::level("### three"), Some(3));
        assert_eq!(Heading::level("###### six"), Some(6));
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        assert_eq!(Heading::level("####### seven"), None);
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(Heading::level("#hashtag"), None);
        assert_eq!(Heading::level("#"), None);
    }
}
