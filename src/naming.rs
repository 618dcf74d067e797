//! Project and context names derived from a playlist name
//!
//! Playlists are named `<Project>-<Context>[-...].txt`. The project selects the
//! folder holding the project's files, the context names the occasion. The
//! reserved context `abc` asks for an alphabetic songbook of the whole project
//! folder instead of a playlist.

use regex::Regex;
use std::path::Path;
use thiserror::Error;

/// Context that selects alphabetic assembly
pub const ALPHABETIC_CONTEXT: &str = "abc";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    /// Name has no `<project>-<context>` pair
    #[error("Invalid playlist name '{0}': expected <project>-<context>, e.g. CoolBand-Concert2025.txt")]
    Invalid(String),
}

/// Parsed playlist name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistName {
    /// Name as given (file name only, directories stripped)
    pub raw: String,
    pub project: String,
    pub context: String,
}

impl PlaylistName {
    /// Split the base name of `name` at the first hyphen joining two word groups
    ///
    /// # Errors
    ///
    /// Returns `NamingError::Invalid` if no such pair exists.
    pub fn parse(name: &str) -> Result<Self, NamingError> {
        let raw = Path::new(name)
            .file_name()
            .map_or_else(|| name.to_string(), |n| n.to_string_lossy().into_owned());

        let re = Regex::new(r"(\w+)-(\w+)").map_err(|_| NamingError::Invalid(raw.clone()))?;
        let caps = re.captures(&raw).ok_or_else(|| NamingError::Invalid(raw.clone()))?;
        let project = caps[1].to_string();
        let context = caps[2].to_string();

        Ok(Self { raw, project, context })
    }

    /// Check whether this name asks for an alphabetic songbook
    #[must_use]
    pub fn is_alphabetic(&self) -> bool {
        self.context == ALPHABETIC_CONTEXT
    }

    /// Output file name, e.g. `CoolBand-Concert2025.pdf`
    #[must_use]
    pub fn output_file_name(&self, extension: &str) -> String {
        format!("{}-{}.{}", self.project, self.context, extension.trim_start_matches('.'))
    }
}
