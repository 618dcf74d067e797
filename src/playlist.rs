//! Playlist parsing
//!
//! A playlist is a plain UTF-8 text file with one title per line. Blank lines
//! and lines whose first non-whitespace character is `#` are ignored.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a playlist
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Playlist file could not be opened or decoded
    #[error("Cannot read playlist {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One playlist entry and its position among the kept entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    /// Zero-based position; skipped lines do not consume a position
    pub position: usize,
    /// Line text as written in the playlist
    pub text: String,
}

impl Title {
    #[must_use]
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self { position, text: text.into() }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Check whether a playlist line carries no title
fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse playlist text into ordered titles
///
/// Titles keep their surrounding whitespace trimmed; repeated titles are kept.
#[must_use]
pub fn parse_playlist(text: &str) -> Vec<Title> {
    text.lines()
        .filter(|line| !is_skipped(line))
        .enumerate()
        .map(|(position, line)| Title::new(position, line.trim()))
        .collect()
}

/// Read and parse the playlist at `path`
///
/// # Errors
///
/// Returns `PlaylistError::Read` if the file does not exist or cannot be
/// read. Invalid UTF-8 is replaced, not rejected.
pub fn read_playlist(path: &Path) -> Result<Vec<Title>, PlaylistError> {
    let bytes = fs::read(path).map_err(|source| PlaylistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let titles = parse_playlist(&String::from_utf8_lossy(&bytes));
    tracing::debug!(path = %path.display(), count = titles.len(), "read playlist");
    Ok(titles)
}
