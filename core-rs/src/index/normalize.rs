/// Canonical form for indexed text and queries: lower-case, trimmed, with
/// internal whitespace runs collapsed to one space.
///
/// # Examples
///
/// ```
/// use lmss_core::index::normalize;
///
/// assert_eq!(normalize("  Admiralty   and\tMaritime LAW "), "admiralty and maritime law");
/// ```
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
