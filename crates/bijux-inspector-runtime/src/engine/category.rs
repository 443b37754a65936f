// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use bijux_inspector_model::{CategoryValueCount, CategoryValuesRequest, CategoryValuesResponse};

use super::load::Table;
use crate::backend::BackendError;

pub const MAX_CATEGORY_PAGE: usize = 1_000;

/// Distinct non-empty values of one column over at most `max_rows_scan` rows of `view`.
pub fn category_values(
    table: &Table,
    view: &[usize],
    req: &CategoryValuesRequest,
) -> Result<CategoryValuesResponse, BackendError> {
    if req.col_idx >= table.headers.len() {
        return Err(BackendError::invalid("category column out of range"));
    }
    let total_rows_in_view = view.len();
    let scan_cap = req
        .max_rows_scan
        .unwrap_or(total_rows_in_view)
        .min(total_rows_in_view);
    let needle = req
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &row in &view[..scan_cap] {
        let v = table.cell(req.col_idx, row).trim();
        if v.is_empty() {
            continue;
        }
        if needle.as_ref().is_some_and(|n| !v.to_lowercase().contains(n)) {
            continue;
        }
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut items: Vec<CategoryValueCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryValueCount {
            value: value.to_string(),
            count,
        })
        .collect();
    items.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.value.to_lowercase().cmp(&b.value.to_lowercase()))
            .then_with(|| a.value.cmp(&b.value))
    });

    let distinct_total = items.len();
    let limit = req.limit.clamp(1, MAX_CATEGORY_PAGE);
    let offset = req.offset.min(distinct_total);
    let end = offset.saturating_add(limit).min(distinct_total);
    Ok(CategoryValuesResponse {
        col_idx: req.col_idx,
        rows_scanned: scan_cap,
        total_rows_in_view,
        partial: scan_cap < total_rows_in_view,
        distinct_total,
        offset,
        limit,
        values: items[offset..end].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::load::parse_table;

    fn req(search: Option<&str>, offset: usize, limit: usize, max_rows_scan: Option<usize>) -> CategoryValuesRequest {
        CategoryValuesRequest {
            col_idx: 0,
            search: search.map(str::to_string),
            offset,
            limit,
            max_rows_scan,
        }
    }

    #[test]
    fn counts_sort_desc_then_value() {
        let t = parse_table("g\nb\na\nb\n\"\"\nC\nc\n", true).expect("parse");
        let view: Vec<usize> = (0..t.row_count).collect();
        let resp = category_values(&t, &view, &req(None, 0, 10, None)).expect("values");
        let got: Vec<(&str, usize)> = resp.values.iter().map(|v| (v.value.as_str(), v.count)).collect();
        assert_eq!(got, vec![("b", 2), ("a", 1), ("C", 1), ("c", 1)]);
        assert!(!resp.partial);
        assert_eq!(resp.distinct_total, 4);
    }

    #[test]
    fn scan_budget_marks_partial() {
        let text = (0..50).fold(String::from("id\n"), |mut acc, i| {
            acc.push_str(&format!("v{i}\n"));
            acc
        });
        let t = parse_table(&text, true).expect("parse");
        let view: Vec<usize> = (0..t.row_count).collect();
        let resp = category_values(&t, &view, &req(None, 0, 200, Some(10))).expect("values");
        assert!(resp.partial);
        assert_eq!(resp.rows_scanned, 10);
        assert_eq!(resp.total_rows_in_view, 50);
        assert!(resp.distinct_total <= 50);
        assert_eq!(resp.distinct_total, 10);
    }

    #[test]
    fn search_and_paging() {
        let t = parse_table("g\nalpha\nbeta\nalp\ngamma\n", true).expect("parse");
        let view: Vec<usize> = (0..t.row_count).collect();
        let resp = category_values(&t, &view, &req(Some(" ALP"), 1, 0, None)).expect("values");
        assert_eq!(resp.limit, 1);
        assert_eq!(resp.offset, 1);
        assert_eq!(resp.distinct_total, 2);
        assert_eq!(resp.values[0].value, "alpha");
        let past_end = category_values(&t, &view, &req(None, 99, 5, None)).expect("values");
        assert_eq!(past_end.offset, 4);
        assert!(past_end.values.is_empty());
    }

    #[test]
    fn column_out_of_range() {
        let t = parse_table("g\na\n", true).expect("parse");
        let mut r = req(None, 0, 5, None);
        r.col_idx = 3;
        let err = category_values(&t, &[0], &r).expect_err("range");
        assert_eq!(err.message, "category column out of range");
    }
}
