//! Icon id normalization.

use std::sync::LazyLock;

use regex::Regex;

static INVALID_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("invalid id regex"));

/// Normalize a filename or URL segment into an icon id.
///
/// Lower-cases the input, collapses every run of characters outside
/// `[a-z0-9_-]` into one underscore and trims underscores from both ends.
///
/// # Examples
///
/// ```
/// use icons_finder::clean_id;
///
/// assert_eq!(clean_id("Arrow Left"), "arrow_left");
/// assert_eq!(clean_id("  (beta) Icon!! "), "beta_icon");
/// ```
#[must_use]
pub fn clean_id(raw: &str) -> String {
    let lower = raw.to_lowercase();
    INVALID_ID_CHARS
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_owned()
}
