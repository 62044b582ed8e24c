use std::collections::HashSet;

/// Length in characters, the unit every content threshold is expressed in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cuts `s` down to its first `max_chars` characters.
///
/// `max_chars == 0` means unlimited. Never splits a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return s;
    }
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Distinct non-empty URLs in first-seen order.
pub fn unique_urls<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(str::trim)
        .filter(|u| !u.is_empty() && seen.insert(*u))
        .collect()
}
