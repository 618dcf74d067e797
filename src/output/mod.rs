//! Output formatting for CLI display
//!
//! This module turns resolutions and warnings into console lines. Nothing
//! here prints; callers decide where lines go.

use crate::resolve::{ResolutionEntry, Source, Warning};
use colored::Colorize;
use std::path::Path;

/// Display `path` relative to `base` when it lies below it
#[must_use]
pub fn format_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Format one resolved title with the files it contributed
#[must_use]
pub fn entry_lines(entry: &ResolutionEntry, base: &Path) -> Vec<String> {
    let tag = match entry.source {
        Source::Project => entry.source.to_string().green(),
        Source::Generic => entry.source.to_string().yellow(),
        Source::None => entry.source.to_string().red(),
    };
    let mut lines = vec![format!("{:>3}. {} [{}]", entry.title.position + 1, entry.title, tag)];
    lines.extend(entry.paths.iter().map(|p| format!("       {}", format_path(p, base))));
    lines
}

/// Format a file of an alphabetic plan
#[must_use]
pub fn plan_line(index: usize, path: &Path, base: &Path) -> String {
    format!("{:>3}. {}", index + 1, format_path(path, base))
}

#[must_use]
pub fn warning_line(warning: &Warning) -> String {
    format!("  {}", warning.to_string().yellow())
}
