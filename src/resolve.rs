//! Resolution of playlist titles to catalog files
//!
//! Two modes produce an [`AssemblyPlan`]:
//!
//! - **List mode** ([`resolve_by_list`]): every title is looked up in the
//!   project catalog first. Only when the project catalog has no match is the
//!   generic catalog consulted. Titles without any match are reported as
//!   warnings and contribute nothing. All matches of a title are kept, in
//!   catalog order, and titles are processed strictly in playlist order.
//! - **Alphabetic mode** ([`resolve_by_catalog`]): the project catalog, minus
//!   files starting with an excluded prefix, in catalog order.
//!
//! Resolution never fails; unmatched titles are data, not errors.

use crate::catalog::{CandidateFile, Catalog};
use crate::playlist::Title;
use std::fmt;
use std::path::PathBuf;

/// Catalog a resolution entry was satisfied from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Project,
    Generic,
    None,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => f.write_str("project"),
            Self::Generic => f.write_str("generic"),
            Self::None => f.write_str("none"),
        }
    }
}

/// Result of resolving one title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEntry {
    pub title: Title,
    pub source: Source,
    pub paths: Vec<PathBuf>,
}

/// Why a title produced a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// No file in either catalog
    NoMatch,
    /// Only the generic catalog had a file
    OnlyGeneric,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => f.write_str("no-match"),
            Self::OnlyGeneric => f.write_str("only-generic"),
        }
    }
}

/// Non-fatal note about an incompletely resolved title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub title: String,
    pub kind: WarningKind,
}

impl Warning {
    #[must_use]
    pub fn new(title: impl Into<String>, kind: WarningKind) -> Self {
        Self { title: title.into(), kind }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::NoMatch => write!(f, "No file for '{}'", self.title),
            WarningKind::OnlyGeneric => write!(f, "Only generic file(s) for '{}'", self.title),
        }
    }
}

/// Ordered list of files to merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyPlan {
    paths: Vec<PathBuf>,
}

impl AssemblyPlan {
    #[must_use]
    pub const fn new() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) {
        self.paths.extend(paths);
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<PathBuf> for AssemblyPlan {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self { paths: iter.into_iter().collect() }
    }
}

/// Outcome of a resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub plan: AssemblyPlan,
    /// One entry per title, in playlist order; empty in alphabetic mode
    pub entries: Vec<ResolutionEntry>,
    pub warnings: Vec<Warning>,
}

/// Literal file name prefixes kept out of alphabetic songbooks
///
/// Comparison is case-sensitive and exact per prefix, so `zzz` and `ZZZ` have
/// to be listed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPrefixes(Vec<String>);

impl ExclusionPrefixes {
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(prefixes.into_iter().map(Into::into).filter(|p: &String| !p.is_empty()).collect())
    }

    #[must_use]
    pub fn excludes(&self, name: &str) -> bool {
        self.0.iter().any(|p| name.starts_with(p.as_str()))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for ExclusionPrefixes {
    fn default() -> Self {
        Self::new(["zzz", "ZZZ"])
    }
}

fn paths_of<'a>(files: impl Iterator<Item = &'a CandidateFile>) -> Vec<PathBuf> {
    files.map(|c| c.path.clone()).collect()
}

/// Resolve a single title against the project catalog, then the generic one
#[must_use]
pub fn resolve_title(title: &Title, project: &Catalog, generic: &Catalog) -> ResolutionEntry {
    let mut source = Source::Project;
    let mut paths = paths_of(project.matching(&title.text));
    if paths.is_empty() {
        paths = paths_of(generic.matching(&title.text));
        source = if paths.is_empty() { Source::None } else { Source::Generic };
    }

    tracing::debug!(title = %title.text, %source, matches = paths.len(), "resolved title");
    ResolutionEntry { title: title.clone(), source, paths }
}

/// Resolve a playlist into an assembly plan
///
/// Warnings are produced in title order: `OnlyGeneric` when a title was
/// satisfied from the generic catalog, `NoMatch` when neither catalog had a
/// file for it.
#[must_use]
pub fn resolve_by_list(titles: &[Title], project: &Catalog, generic: &Catalog) -> Resolution {
    let mut resolution = Resolution::default();

    for title in titles {
        let entry = resolve_title(title, project, generic);
        match entry.source {
            Source::Project => {}
            Source::Generic => {
                tracing::info!(title = %title.text, "using generic file(s)");
                resolution.warnings.push(Warning::new(&title.text, WarningKind::OnlyGeneric));
            }
            Source::None => {
                tracing::info!(title = %title.text, "no file found");
                resolution.warnings.push(Warning::new(&title.text, WarningKind::NoMatch));
            }
        }
        resolution.plan.extend(entry.paths.iter().cloned());
        resolution.entries.push(entry);
    }

    resolution
}

/// Build an alphabetic assembly plan from the project catalog
#[must_use]
pub fn resolve_by_catalog(project: &Catalog, excluded: &ExclusionPrefixes) -> Resolution {
    let plan = project
        .entries()
        .iter()
        .filter(|c| {
            let skip = excluded.excludes(&c.name);
            if skip {
                tracing::debug!(file = %c.name, "excluded from alphabetic songbook");
            }
            !skip
        })
        .map(|c| c.path.clone())
        .collect();

    Resolution { plan, ..Resolution::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::parse_playlist;
    use std::path::Path;

    fn project(names: &[&str]) -> Catalog {
        Catalog::from_names(Path::new("/band"), names.iter().copied())
    }

    fn generic(names: &[&str]) -> Catalog {
        Catalog::from_names(Path::new("/Original"), names.iter().copied())
    }

    fn file_names(plan: &AssemblyPlan) -> Vec<String> {
        plan.paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_list_mode_follows_playlist_order() {
        let titles = parse_playlist("Shalala\n# note\n\nWhatever\n");
        let res = resolve_by_list(
            &titles,
            &project(&["Shalala.pdf", "Whatever-StatusQuo.pdf"]),
            &generic(&[]),
        );
        assert_eq!(file_names(&res.plan), vec!["Shalala.pdf", "Whatever-StatusQuo.pdf"]);
        assert!(res.warnings.is_empty());
        assert!(res.entries.iter().all(|e| e.source == Source::Project));
    }

    #[test]
    fn test_order_is_playlist_not_catalog() {
        let titles = parse_playlist("Zebra\nAlpha\n");
        let res = resolve_by_list(&titles, &project(&["Alpha.pdf", "Zebra.pdf"]), &generic(&[]));
        assert_eq!(file_names(&res.plan), vec!["Zebra.pdf", "Alpha.pdf"]);
    }

    #[test]
    fn test_multiple_matches_kept_consecutively() {
        let titles = parse_playlist("Blues\nIntro\nBlues\n");
        let res = resolve_by_list(
            &titles,
            &project(&["Intro-part2.pdf", "Blues.pdf", "Intro.pdf"]),
            &generic(&[]),
        );
        assert_eq!(
            file_names(&res.plan),
            vec!["Blues.pdf", "Intro-part2.pdf", "Intro.pdf", "Blues.pdf"]
        );
        assert_eq!(res.entries[1].paths.len(), 2);
    }

    #[test]
    fn test_generic_fallback_warns_once() {
        let titles = parse_playlist("Intro\n");
        let res = resolve_by_list(&titles, &project(&["Shalala.pdf"]), &generic(&["Intro.pdf"]));
        assert_eq!(res.plan.paths(), &[PathBuf::from("/Original/Intro.pdf")]);
        assert_eq!(res.entries[0].source, Source::Generic);
        assert_eq!(res.warnings, vec![Warning::new("Intro", WarningKind::OnlyGeneric)]);
    }

    #[test]
    fn test_project_match_suppresses_generic() {
        let titles = parse_playlist("Intro\n");
        let res = resolve_by_list(&titles, &project(&["Intro.pdf"]), &generic(&["Intro.pdf"]));
        assert_eq!(res.plan.paths(), &[PathBuf::from("/band/Intro.pdf")]);
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn test_no_match_continues_with_next_title() {
        let titles = parse_playlist("Missing\nShalala\n");
        let res = resolve_by_list(&titles, &project(&["Shalala.pdf"]), &generic(&["Intro.pdf"]));
        assert_eq!(file_names(&res.plan), vec!["Shalala.pdf"]);
        assert_eq!(res.warnings, vec![Warning::new("Missing", WarningKind::NoMatch)]);
        assert_eq!(res.entries[0].source, Source::None);
        assert!(res.entries[0].paths.is_empty());
        assert_eq!(res.entries[1].source, Source::Project);
    }

    #[test]
    fn test_warnings_in_title_order() {
        let titles = parse_playlist("Ghost\nIntro\nPhantom\n");
        let res = resolve_by_list(&titles, &project(&[]), &generic(&["Intro.pdf"]));
        let kinds: Vec<WarningKind> = res.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::NoMatch, WarningKind::OnlyGeneric, WarningKind::NoMatch]);
    }

    #[test]
    fn test_punctuation_insensitive_title() {
        let titles = parse_playlist("Don't Stop\n");
        let res = resolve_by_list(&titles, &project(&["dont-stop.pdf"]), &generic(&[]));
        assert_eq!(file_names(&res.plan), vec!["dont-stop.pdf"]);
    }

    #[test]
    fn test_alphabetic_mode_filters_and_sorts() {
        let res = resolve_by_catalog(
            &project(&["B.pdf", "A.pdf", "zzzEncore.pdf"]),
            &ExclusionPrefixes::default(),
        );
        assert_eq!(file_names(&res.plan), vec!["A.pdf", "B.pdf"]);
        assert!(res.warnings.is_empty());
        assert!(res.entries.is_empty());
    }

    #[test]
    fn test_exclusion_is_case_sensitive_per_prefix() {
        let res = resolve_by_catalog(
            &project(&["ZZZPause.pdf", "ZzzBreak.pdf", "zzzEncore.pdf"]),
            &ExclusionPrefixes::default(),
        );
        assert_eq!(file_names(&res.plan), vec!["ZzzBreak.pdf"]);
    }

    #[test]
    fn test_empty_prefixes_are_ignored() {
        let excluded = ExclusionPrefixes::new(["", "tmp"]);
        assert_eq!(excluded.as_slice(), &["tmp".to_string()]);
        assert!(!excluded.excludes("Song.pdf"));
        assert!(excluded.excludes("tmpSong.pdf"));
    }

    #[test]
    fn test_warning_display() {
        assert_eq!(Warning::new("Intro", WarningKind::OnlyGeneric).to_string(), "Only generic file(s) for 'Intro'");
        assert_eq!(Warning::new("X", WarningKind::NoMatch).to_string(), "No file for 'X'");
    }
}
