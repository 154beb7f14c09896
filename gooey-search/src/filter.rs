//! Case-insensitive substring filtering over the candidate list.

/// A candidate that matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index of the matched item in the original list.
    pub index: usize,
}

/// Whether `label` contains `query`, ignoring case and surrounding
/// whitespace in the query.
pub fn matches(query: &str, label: &str) -> bool {
    let needle = query.trim().to_lowercase();
    label.to_lowercase().contains(&needle)
}

/// Substring filter.
///
/// Returns matches in the order of `labels`; there is no scoring and no cap
/// on the number of matches. A query that is empty after trimming matches
/// every label.
pub fn substring_filter(query: &str, labels: &[String]) -> Vec<FilterMatch> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| matches(query, label))
        .map(|(index, _)| FilterMatch { index })
        .collect()
}

/// Substring filter returning the matching labels themselves.
pub fn filter_items(query: &str, items: &[String]) -> Vec<String> {
    substring_filter(query, items)
        .into_iter()
        .map(|m| items[m.index].clone())
        .collect()
}
