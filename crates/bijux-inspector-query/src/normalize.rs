// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_core::canonical;
use bijux_inspector_model::FilterSpec;

/// Hash identifying the rows a spec selects. Equivalent specs hash equally.
pub fn filter_hash(spec: &FilterSpec) -> Result<String, String> {
    let normalized = normalize_spec(spec);
    canonical::stable_json_hash_short(&normalized).map_err(|e| e.to_string())
}

/// Trims the query and clause text and orders the category selection.
#[must_use]
pub fn normalize_spec(spec: &FilterSpec) -> FilterSpec {
    let mut normalized = spec.clone();
    normalized.query = normalized.query.trim().to_string();
    for clause in &mut normalized.clauses {
        clause.query = clause.query.trim().to_string();
    }
    if let Some(cat) = normalized.category_filter.as_mut() {
        cat.selected.sort();
        cat.selected.dedup();
    }
    normalized
}
