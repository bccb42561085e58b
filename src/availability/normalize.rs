//! String canonicalization for album and artist comparison.
//!
//! Catalogs disagree on capitalization, punctuation, leading articles and
//! edition suffixes. Two names are treated as the same iff their normalized
//! forms are equal.

/// Characters deleted in the final pass
const STRIPPED: &[char] = &[
    '.', ',', '-', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '_', '`', '~',
    '(', ')', ' ',
];

/// Canonicalize a name for matching.
///
/// Steps run in a fixed order: lower-case, drop `" and "`, drop a leading
/// `"the "`, drop a trailing `" (...)"` suffix, then delete punctuation and
/// spaces. The suffix pass has to run before punctuation removal since the
/// parentheses are deleted there.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let without_and = lowered.replace(" and ", "");
    let without_article = without_and.strip_prefix("the ").unwrap_or(&without_and);
    let without_suffix = strip_parenthesized_suffix(without_article);

    without_suffix
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect()
}

/// Strip `" (...)"` when it runs to the end of the string.
///
/// The earliest `" ("` wins, so `"a (b) (c)"` becomes `"a"`. The parentheses
/// must enclose at least one character and the suffix may not span lines.
fn strip_parenthesized_suffix(s: &str) -> &str {
    if !s.ends_with(')') {
        return s;
    }

    let close = s.len() - 1;
    for (start, _) in s.match_indices(" (") {
        let inner_start = start + 2;
        if inner_start > close {
            break;
        }
        let inner = &s[inner_start..close];
        if !inner.is_empty() && !inner.contains('\n') {
            return &s[..start];
        }
    }

    s
}
