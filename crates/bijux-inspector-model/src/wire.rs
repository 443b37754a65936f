// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{ColType, DatasetId, DatasetSource, FilterSpec, SortDir};

/// Leading column of every merged cross-dataset row.
pub const SOURCE_FILE_COLUMN: &str = "_source_file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub headers: Vec<String>,
    pub row_count: usize,
    pub col_types: Vec<ColType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSniff {
    pub decided: bool,
    pub has_headers: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValuesRequest {
    pub col_idx: usize,
    pub search: Option<String>,
    pub offset: usize,
    pub limit: usize,
    pub max_rows_scan: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValuesResponse {
    pub col_idx: usize,
    pub rows_scanned: usize,
    pub total_rows_in_view: usize,
    /// When true, `values` and `distinct_total` are lower bounds.
    pub partial: bool,
    pub distinct_total: usize,
    pub offset: usize,
    pub limit: usize,
    pub values: Vec<CategoryValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRowResponse {
    pub visual_idx: usize,
    pub source_row_idx: usize,
    pub passes: bool,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub col_idx: usize,
    pub dir: SortDir,
    pub stable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetQueryInput {
    pub dataset_id: DatasetId,
    pub label: String,
    pub has_headers: bool,
    pub source: DatasetSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiQueryRequest {
    pub datasets: Vec<DatasetQueryInput>,
    pub spec: FilterSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetQueryResult {
    pub dataset_id: DatasetId,
    pub label: String,
    pub filtered: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MultiQueryResponse {
    pub dataset_results: Vec<DatasetQueryResult>,
    pub merged_headers: Vec<String>,
    pub merged_rows: Vec<Vec<String>>,
}
