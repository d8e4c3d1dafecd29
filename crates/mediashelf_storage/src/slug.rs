//! Title to collection id derivation.

use regex::Regex;
use std::sync::LazyLock;

// ASCII whitespace only; other Unicode spaces fall to DISALLOWED and vanish.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("Valid whitespace regex"));

// ASCII letters, digits, underscore, hyphen and precomposed Hangul syllables.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9_\-\x{AC00}-\x{D7A3}]").expect("Valid slug character regex")
});

/// Derive a filesystem-safe collection id from a human title.
///
/// Trims the title, collapses every ASCII whitespace run into one underscore and
/// strips anything that is not an ASCII letter, decimal digit, underscore,
/// hyphen or Hangul syllable. Case is preserved and no collision suffix is
/// ever appended, so equal inputs always give equal ids.
///
/// # Examples
///
/// ```
/// use mediashelf_storage::slugify;
///
/// assert_eq!(slugify("My Collection!!"), "My_Collection");
/// assert_eq!(slugify("  여름   휴가 2024 "), "여름_휴가_2024");
/// assert_eq!(slugify("already-safe_id"), "already-safe_id");
/// ```
pub fn slugify(title: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(title.trim(), "_");
    DISALLOWED.replace_all(&collapsed, "").into_owned()
}

/// Whether `id` can be joined onto a kind directory as a single path segment.
///
/// Ids arriving from callers are checked with this before touching the
/// filesystem. Hidden names are refused because staging directories use them.
pub fn is_safe_segment(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\', '\0'])
}
