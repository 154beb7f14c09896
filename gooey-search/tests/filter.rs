use gooey_search::filter::{filter_items, matches, substring_filter};

fn items(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_empty_query_returns_all() {
    let items = items(&["apple", "banana"]);
    let matches = substring_filter("", &items);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].index, 0);
    assert_eq!(matches[1].index, 1);
}

#[test]
fn test_whitespace_query_returns_all() {
    let items = items(&["apple", "banana"]);
    assert_eq!(filter_items("   ", &items), items);
}

#[test]
fn test_substring_matching() {
    let items = items(&["apple", "banana", "apricot"]);
    let matches = substring_filter("ap", &items);
    let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_no_fuzzy_matching() {
    // "rct" is a subsequence of "React" but not a substring
    let items = items(&["React"]);
    assert!(substring_filter("rct", &items).is_empty());
}

#[test]
fn test_no_matches() {
    let items = items(&["apple", "banana"]);
    assert!(substring_filter("xyz", &items).is_empty());
}

#[test]
fn test_case_insensitive() {
    let items = items(&["Apple", "BANANA"]);
    assert_eq!(filter_items("apple", &items), vec!["Apple".to_string()]);
    assert_eq!(filter_items("NaNa", &items), vec!["BANANA".to_string()]);
}

#[test]
fn test_query_is_trimmed() {
    let items = items(&["React", "Vue.js", "Angular"]);
    assert_eq!(filter_items("  vue ", &items), vec!["Vue.js".to_string()]);
}

#[test]
fn test_source_order_preserved() {
    // Later items are better matches by any ranking, but order stays
    let items = items(&["JavaScript", "TypeScript", "Script"]);
    assert_eq!(
        filter_items("script", &items),
        vec![
            "JavaScript".to_string(),
            "TypeScript".to_string(),
            "Script".to_string()
        ]
    );
}

#[test]
fn test_matches_equals_set_definition() {
    let items = items(&[
        "React", "Vue", "Svelte", "Next.js", "Nuxt.js", "Gatsby", "Angular",
    ]);
    for query in ["", "e", "t.", "NUX", " s ", "zzz", "a"] {
        let expected: Vec<String> = items
            .iter()
            .filter(|x| x.to_lowercase().contains(&query.trim().to_lowercase()))
            .cloned()
            .collect();
        assert_eq!(filter_items(query, &items), expected, "query {:?}", query);
        for item in &items {
            assert_eq!(matches(query, item), expected.contains(item));
        }
    }
}

#[test]
fn test_duplicates_kept() {
    let items = items(&["Vite", "Vite"]);
    assert_eq!(filter_items("vi", &items).len(), 2);
}
