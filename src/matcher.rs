//! Fuzzy title matching
//!
//! Playlist entries are written by hand and rarely agree with file names on
//! case, spacing or punctuation. Both sides are reduced to their *essence*
//! (lowercase ASCII letters, digits and underscores only) and a file matches a
//! title when the title's essence occurs anywhere inside the file name's
//! essence. Non-ASCII characters are dropped like punctuation, so `Über` still
//! finds `Uber-...` file names.
//!
//! The rule is deliberately permissive: a short title such as `"Intro"` will
//! match every file whose name contains `intro`, and all of those files end up
//! in the songbook.

/// Reduce `s` to its comparison key.
///
/// Lowercases and drops every character that is not an ASCII letter, digit
/// or `_`.
#[must_use]
pub fn essence(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Containment rule on precomputed essences
#[must_use]
pub fn contains_essence(file_essence: &str, title_essence: &str) -> bool {
    file_essence.contains(title_essence)
}

/// Check whether `filename` is a candidate for `title`
#[must_use]
pub fn matches(filename: &str, title: &str) -> bool {
    contains_essence(&essence(filename), &essence(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essence_strips_punctuation_and_case() {
        assert_eq!(essence("Don't Stop"), "dontstop");
        assert_eq!(essence("Whatever-StatusQuo.pdf"), "whateverstatusquopdf");
        assert_eq!(essence("snake_case"), "snake_case");
    }

    #[test]
    fn test_essence_of_only_punctuation_is_empty() {
        assert_eq!(essence(" - !? "), "");
    }

    #[test]
    fn test_matches_ignores_case_and_punctuation() {
        assert!(matches("dont-stop.pdf", "Don't Stop"));
        assert!(matches("Whatever-StatusQuo.pdf", "whatever"));
        assert!(matches("Ohyeah-v2-2021.pdf", "Oh, yeah!"));
    }

    #[test]
    fn test_matches_requires_contiguous_essence() {
        assert!(!matches("Stop-Dont.pdf", "Don't Stop"));
        assert!(!matches("Shalala.pdf", "Whatever"));
    }

    #[test]
    fn test_non_ascii_letters_are_dropped() {
        assert_eq!(essence("Über den Wolken"), "berdenwolken");
        assert_eq!(essence("İstanbul"), "stanbul");
        assert!(matches("Uber-den-Wolken.pdf", "Über den Wolken"));
        assert!(matches("Ueber-den-Wolken.pdf", "Über den Wolken"));
        assert!(matches("Cafe.pdf", "Café"));
    }

    #[test]
    fn test_contains_essence_on_keys() {
        assert!(contains_essence("shalalapdf", "shalala"));
        assert!(!contains_essence("shalalapdf", "whatever"));
    }

    #[test]
    fn test_short_title_matches_unrelated_names() {
        // Accepted trade-off of substring matching
        assert!(matches("Rainbow.pdf", "bow"));
        assert!(matches("TheBoxer-doubletime.pdf", "Boxer"));
    }
}
