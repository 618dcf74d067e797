//! Catalog indexing
//!
//! A catalog is a read-only snapshot of the eligible files in one directory.
//! Two catalogs take part in a run: the *project* catalog (the band's own
//! arrangements) and the *generic* catalog (original versions shared between
//! projects).
//!
//! # Eligibility
//!
//! A file name is eligible when, ignoring case, it starts with an ASCII letter
//! or digit, continues with ASCII word characters or hyphens only, and ends in
//! the target extension. Subdirectories are never listed nor recursed into.
//!
//! Entries are sorted by file name (byte-wise), so the catalog order does not
//! depend on how the file system happens to enumerate the directory.

use crate::matcher;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while indexing a directory
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Directory is missing or unreadable
    #[error("Cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Target extension produced an unusable file name pattern
    #[error("Invalid file extension '{extension}': {reason}")]
    InvalidExtension { extension: String, reason: String },
}

/// A file that may be merged into a songbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Bare file name, e.g. `Shalala.pdf`
    pub name: String,
    /// Full path of the file
    pub path: PathBuf,
    /// Comparison key derived from `name`
    pub essence: String,
}

impl CandidateFile {
    #[must_use]
    pub fn new(dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: dir.join(&name),
            essence: matcher::essence(&name),
            name,
        }
    }
}

/// Eligibility rule for candidate file names
#[derive(Debug, Clone)]
pub struct NameFilter {
    extension: String,
    pattern: Regex,
}

impl NameFilter {
    /// Build the filter for files ending in `.{extension}`
    ///
    /// A leading dot in `extension` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidExtension` if the extension is empty.
    pub fn new(extension: &str) -> Result<Self, CatalogError> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(CatalogError::InvalidExtension {
                extension: extension.to_string(),
                reason: "extension must not be empty".to_string(),
            });
        }
        let source = format!(r"(?i)\A[A-Za-z0-9][-A-Za-z0-9_]*\.{}\z", regex::escape(extension));
        let pattern = Regex::new(&source).map_err(|e| CatalogError::InvalidExtension {
            extension: extension.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { extension: extension.to_string(), pattern })
    }

    /// Target extension without the leading dot
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub fn is_eligible(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Ordered, immutable listing of the eligible files of one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CandidateFile>,
}

impl Catalog {
    /// Index `dir`, keeping eligible regular files in file name order
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadDir` if the directory does not exist or
    /// cannot be listed.
    pub fn index(dir: &Path, filter: &NameFilter) -> Result<Self, CatalogError> {
        let read_err = |source| CatalogError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let path = entry.path();
            if path.is_dir() {
                tracing::trace!(path = %path.display(), "skipping subdirectory");
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };
            if filter.is_eligible(&name) {
                names.push(name);
            } else {
                tracing::debug!(file = %name, "skipping ineligible file");
            }
        }
        names.sort();

        tracing::debug!(dir = %dir.display(), count = names.len(), "indexed catalog");
        Ok(Self::from_names(dir, names))
    }

    /// Build a catalog from names that are already known to be eligible
    ///
    /// Names are sorted; the file system is not consulted.
    #[must_use]
    pub fn from_names<I, S>(dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<CandidateFile> = names
            .into_iter()
            .map(|name| CandidateFile::new(dir, name))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CandidateFile] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries matching `title`, in catalog order
    pub fn matching<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a CandidateFile> + 'a {
        let key = matcher::essence(title);
        self.entries
            .iter()
            .filter(move |c| matcher::contains_essence(&c.essence, &key))
    }
}
