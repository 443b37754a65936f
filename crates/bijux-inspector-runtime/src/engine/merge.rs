// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use bijux_inspector_model::{DatasetQueryResult, MultiQueryResponse, SOURCE_FILE_COLUMN};

use super::load::Table;

/// Filtered rows of one dataset, ready to be merged.
pub struct DatasetRows<'a> {
    pub result: DatasetQueryResult,
    pub table: &'a Table,
    pub rows: Vec<usize>,
}

/// Unions headers in first-seen order behind a leading source column and maps
/// every row onto them by header name.
#[must_use]
pub fn merge_datasets(parts: &[DatasetRows<'_>]) -> MultiQueryResponse {
    let mut merged_headers = vec![SOURCE_FILE_COLUMN.to_string()];
    let mut seen: HashSet<&str> = HashSet::new();
    for part in parts.iter().filter(|p| !p.rows.is_empty()) {
        for h in &part.table.headers {
            if seen.insert(h.as_str()) {
                merged_headers.push(h.clone());
            }
        }
    }

    let mut merged_rows = Vec::new();
    for part in parts {
        let by_name: HashMap<&str, usize> = part
            .table
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();
        for &row in &part.rows {
            let mut out = Vec::with_capacity(merged_headers.len());
            out.push(part.result.label.clone());
            for h in &merged_headers[1..] {
                out.push(
                    by_name
                        .get(h.as_str())
                        .map_or_else(String::new, |c| part.table.cell(*c, row).to_string()),
                );
            }
            merged_rows.push(out);
        }
    }

    MultiQueryResponse {
        dataset_results: parts.iter().map(|p| p.result.clone()).collect(),
        merged_headers,
        merged_rows,
    }
}
