// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_model::{CategoryFilter, FilterSpec, MatchMode};
use bijux_inspector_query::filter_hash;

fn spec_with(query: &str, selected: &[&str]) -> FilterSpec {
    FilterSpec {
        query: query.to_string(),
        match_mode: MatchMode::Fuzzy,
        category_filter: Some(CategoryFilter {
            enabled: true,
            col_idx: 1,
            selected: selected.iter().map(|s| (*s).to_string()).collect(),
        }),
        ..FilterSpec::default()
    }
}

#[test]
fn filter_hash_ignores_selection_order_and_padding() {
    let a = filter_hash(&spec_with("bolt", &["M6", "M8"])).expect("hash a");
    let b = filter_hash(&spec_with("  bolt ", &["M8", "M6"])).expect("hash b");
    assert_eq!(a, b);
}

#[test]
fn filter_hash_tracks_semantic_changes() {
    let base = filter_hash(&spec_with("bolt", &["M6"])).expect("base");
    let other_query = filter_hash(&spec_with("nut", &["M6"])).expect("query");
    let mut exact = spec_with("bolt", &["M6"]);
    exact.match_mode = MatchMode::Exact;
    let other_mode = filter_hash(&exact).expect("mode");
    assert_ne!(base, other_query);
    assert_ne!(base, other_mode);
}
