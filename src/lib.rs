//! Songbook - merge per-title sheet music files into one document
//!
//! This library resolves an ordered playlist of song titles against folders of
//! sheet music files, falling back to a folder of generic arrangements, and
//! merges the resolved files into a single songbook. A project folder can also
//! be merged alphabetically without a playlist.

use thiserror::Error;

pub mod assembly;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod matcher;
pub mod merge;
pub mod naming;
pub mod output;
pub mod playlist;
pub mod resolve;

#[cfg(test)]
pub mod testing;

pub use assembly::Songbook;
pub use resolve::{AssemblyPlan, Resolution, Warning, WarningKind};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum SongbookError {
    /// Playlist could not be read
    #[error(transparent)]
    Playlist(#[from] playlist::PlaylistError),
    /// Catalog directory could not be read
    #[error(transparent)]
    Catalog(#[from] catalog::CatalogError),
    /// Playlist name has no project/context pair
    #[error(transparent)]
    Naming(#[from] naming::NamingError),
    /// Merging failed after resolution; carries the warnings gathered so far
    #[error("Merge failed: {source}")]
    Merge {
        #[source]
        source: merge::MergeError,
        warnings: Vec<Warning>,
    },
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SongbookError {
    /// Warnings collected before the run failed
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::Merge { warnings, .. } => warnings,
            _ => &[],
        }
    }
}
