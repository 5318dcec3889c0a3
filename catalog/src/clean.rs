//! Cleanup of the dataset's literal `uXXXX` escape sequences.
//!
//! The source CSV files carry some non-ASCII letters as the text `u00e9`
//! rather than the character itself. Letters a player can type are mapped to
//! their plain ASCII look-alikes; anything still escaped afterwards marks a
//! name the player could not type, which the importer drops.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Escapes replaced by [`clean`], matched case-sensitively.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("u00e9", "e"),
    ("u00c8", "E"),
    ("u00e1", "a"),
    ("u00f1", "n"),
    ("u00f3", "o"),
    ("u043D", "H"),
    ("u0438", "n"),
    ("u0433", "r"),
    ("u0440", "p"),
    ("u044C", "b"),
];

const ESCAPE_PATTERN: &str = "u[0-9a-fA-F]{4}";

fn escape_regex() -> &'static Regex {
    static ESCAPE: OnceLock<Regex> = OnceLock::new();
    ESCAPE.get_or_init(|| Regex::new(ESCAPE_PATTERN).expect("escape pattern is a valid regex"))
}

/// Replace the known escapes in `original` with typeable letters.
///
/// Borrows when there is nothing to replace.
pub fn clean(original: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(original);
    for (escape, letter) in REPLACEMENTS {
        if result.contains(escape) {
            result = Cow::Owned(result.replace(escape, letter));
        }
    }
    result
}

/// Returns `true` if `s` still contains something shaped like `uXXXX`.
pub fn has_escape(s: &str) -> bool {
    escape_regex().is_match(s)
}
