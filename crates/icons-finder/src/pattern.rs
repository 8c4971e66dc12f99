//! Glob-to-regex translation for filename patterns.
//!
//! Supports `*`, `?`, `[...]` character classes (with `!` negation) and
//! `{a,b}` brace alternation, which may nest. Placeholder sentinels produced
//! by [`mark_placeholders`] become named capture groups.

/// Sentinel standing in for the `{icon_id}` token during translation.
pub(crate) const ICON_ID_MARK: char = '\u{1}';
/// Sentinel standing in for the `{group}` token during translation.
pub(crate) const GROUP_MARK: char = '\u{2}';

pub(crate) const ICON_ID_TOKEN: &str = "{icon_id}";
pub(crate) const GROUP_TOKEN: &str = "{group}";

/// Replace placeholder tokens with sentinels so brace parsing ignores them.
pub(crate) fn mark_placeholders(pattern: &str) -> String {
    pattern
        .replace(ICON_ID_TOKEN, &ICON_ID_MARK.to_string())
        .replace(GROUP_TOKEN, &GROUP_MARK.to_string())
}

/// Whether a (marked) pattern contains any wildcard or placeholder.
pub(crate) fn has_wildcard(pattern: &str) -> bool {
    pattern
        .chars()
        .any(|c| matches!(c, '*' | '?' | '[' | '{' | ICON_ID_MARK | GROUP_MARK))
}

/// Translate a single-segment glob pattern into an unanchored regex body.
///
/// # Examples
///
/// ```
/// use icons_finder::glob_to_regex;
///
/// assert_eq!(glob_to_regex("*.svg"), r"[^/]*\.svg");
/// assert_eq!(glob_to_regex("icon-{a,b}?"), r"icon\-(?:a|b)[^/]");
/// ```
#[must_use]
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                if let Some((class, next)) = char_class(&chars, i) {
                    out.push_str(&class);
                    i = next;
                    continue;
                }
                out.push_str(r"\[");
            }
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            ICON_ID_MARK => out.push_str("(?P<icon_id>.+)"),
            GROUP_MARK => out.push_str("(?P<group>[^/]+)"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    // Unbalanced braces: close them so the regex stays valid
    for _ in 0..brace_depth {
        out.push(')');
    }
    out
}

/// Translate a `[...]` class starting at `start`.
///
/// Returns the regex class and the index just past the closing bracket, or
/// `None` when the class is unterminated.
fn char_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start + 1;
    let mut class = String::from("[");
    if i < chars.len() && (chars[i] == '!' || chars[i] == '^') {
        class.push('^');
        i += 1;
    }
    // A leading ']' is a literal member of the class
    if i < chars.len() && chars[i] == ']' {
        class.push_str(r"\]");
        i += 1;
    }
    while i < chars.len() {
        match chars[i] {
            ']' => {
                class.push(']');
                return Some((class, i + 1));
            }
            '\\' | '[' | '&' | '~' => {
                class.push('\\');
                class.push(chars[i]);
            }
            c => class.push(c),
        }
        i += 1;
    }
    None
}

/// Split a filename pattern into stem and extension at the last top-level dot.
///
/// Dots inside braces or character classes do not split.
pub(crate) fn split_extension(pattern: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut in_class = false;
    let mut split = None;
    for (idx, c) in pattern.char_indices() {
        match c {
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '{' if !in_class => depth += 1,
            '}' if !in_class && depth > 0 => depth -= 1,
            '.' if depth == 0 && !in_class => split = Some(idx),
            _ => {}
        }
    }
    match split {
        Some(idx) if idx > 0 => (&pattern[..idx], Some(&pattern[idx + 1..])),
        _ => (pattern, None),
    }
}
