//! Songbook assembly runs
//!
//! A run reads its sources once (playlist, project catalog, generic catalog),
//! resolves them into a plan and hands the complete plan to a [`MergeSink`].
//! Source read failures abort the run before anything is resolved; a merge
//! failure aborts it afterwards and carries the warnings collected so far.

use crate::catalog::{Catalog, NameFilter};
use crate::merge::MergeSink;
use crate::playlist::read_playlist;
use crate::resolve::{ExclusionPrefixes, Resolution, resolve_by_catalog, resolve_by_list};
use crate::SongbookError;
use std::path::Path;

type Result<T> = std::result::Result<T, SongbookError>;

/// Settings shared by every run
#[derive(Debug, Clone)]
pub struct Songbook {
    filter: NameFilter,
    excluded: ExclusionPrefixes,
}

impl Songbook {
    /// Create a songbook builder for files with the given extension
    ///
    /// # Errors
    ///
    /// Returns `SongbookError::Catalog` if the extension is unusable.
    pub fn new(extension: &str, excluded: ExclusionPrefixes) -> Result<Self> {
        Ok(Self {
            filter: NameFilter::new(extension)?,
            excluded,
        })
    }

    /// Target extension without the leading dot
    #[must_use]
    pub fn extension(&self) -> &str {
        self.filter.extension()
    }

    /// Resolve a playlist without merging
    ///
    /// # Errors
    ///
    /// Returns `SongbookError::Playlist` or `SongbookError::Catalog` if the
    /// playlist or either directory cannot be read.
    pub fn plan_by_list(&self, playlist: &Path, project_dir: &Path, generic_dir: &Path) -> Result<Resolution> {
        let titles = read_playlist(playlist)?;
        let project = Catalog::index(project_dir, &self.filter)?;
        let generic = Catalog::index(generic_dir, &self.filter)?;
        Ok(resolve_by_list(&titles, &project, &generic))
    }

    /// Resolve the whole project folder alphabetically without merging
    ///
    /// # Errors
    ///
    /// Returns `SongbookError::Catalog` if the project directory cannot be read.
    pub fn plan_by_abc(&self, project_dir: &Path) -> Result<Resolution> {
        let project = Catalog::index(project_dir, &self.filter)?;
        Ok(resolve_by_catalog(&project, &self.excluded))
    }

    /// Build a songbook ordered by a playlist
    ///
    /// # Errors
    ///
    /// Returns the read errors of [`Self::plan_by_list`], or
    /// `SongbookError::Merge` with all warnings if the sink fails.
    pub fn by_list<S: MergeSink + ?Sized>(
        &self,
        playlist: &Path,
        project_dir: &Path,
        generic_dir: &Path,
        sink: &S,
        destination: &Path,
    ) -> Result<Resolution> {
        let resolution = self.plan_by_list(playlist, project_dir, generic_dir)?;
        assemble(resolution, sink, destination)
    }

    /// Build an alphabetic songbook of the project folder
    ///
    /// # Errors
    ///
    /// Returns `SongbookError::Catalog` if the project directory cannot be
    /// read, or `SongbookError::Merge` if the sink fails.
    pub fn by_abc<S: MergeSink + ?Sized>(&self, project_dir: &Path, sink: &S, destination: &Path) -> Result<Resolution> {
        let resolution = self.plan_by_abc(project_dir)?;
        assemble(resolution, sink, destination)
    }
}

fn assemble<S: MergeSink + ?Sized>(resolution: Resolution, sink: &S, destination: &Path) -> Result<Resolution> {
    match sink.merge(resolution.plan.paths(), destination) {
        Ok(()) => Ok(resolution),
        Err(source) => Err(SongbookError::Merge {
            source,
            warnings: resolution.warnings,
        }),
    }
}
