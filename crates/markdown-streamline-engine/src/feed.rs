use std::fs;
use std::path::{Path, PathBuf};

/// Default separator token for fragment fixtures.
///
/// Fixture documents are split into fragments wherever this token appears;
/// the cuts deliberately land mid-word, mid-delimiter, and mid-tag, since
/// fragment boundaries carry no semantic meaning.
pub const DEFAULT_SEPARATOR: &str = "<<SPLIT>>";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Fixture not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An ordered sequence of text fragments replayed from a fixture document.
///
/// Preserves fragment order and never merges fragments; a fragment may be
/// a single character or many. Empty fragments (adjacent separators) are
/// kept, since the engine accepts them as no-op appends.
#[derive(Debug, Clone)]
pub struct FragmentFeed {
    fragments: Vec<String>,
    next: usize,
}

impl FragmentFeed {
    /// Splits a fixture document on the separator token.
    pub fn from_fixture(text: &str, separator: &str) -> Self {
        let fragments = if separator.is_empty() {
            vec![text.to_string()]
        } else {
            text.split(separator).map(str::to_string).collect()
        };
        Self { fragments, next: 0 }
    }

    /// Loads a fixture file and splits it on the separator token.
    pub fn from_file(path: &Path, separator: &str) -> Result<Self, FeedError> {
        if !path.exists() {
            return Err(FeedError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(FeedError::Io)?;
        Ok(Self::from_fixture(&text, separator))
    }

    /// Number of fragments remaining.
    pub fn remaining(&self) -> usize {
        self.fragments.len().saturating_sub(self.next)
    }
}

impl Iterator for FragmentFeed {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let fragment = self.fragments.get(self.next)?.clone();
        self.next += 1;
        Some(fragment)
    }
}
