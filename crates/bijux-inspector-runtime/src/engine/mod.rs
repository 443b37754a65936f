// SPDX-License-Identifier: Apache-2.0

//! In-memory reference implementation of [`InspectorBackend`].

mod category;
mod eval;
mod load;
mod merge;
mod sort;

use std::time::Instant;

use async_trait::async_trait;
use bijux_inspector_model::{
    CategoryValuesRequest, CategoryValuesResponse, DatasetQueryResult, DatasetSource,
    ExplainRowResponse, FilterSpec, HeaderSniff, KeyValue, LoadResult, MultiQueryRequest,
    MultiQueryResponse, SortSpec,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::{BackendError, InspectorBackend};

pub use category::MAX_CATEGORY_PAGE;
pub use eval::{CompiledFilter, MAX_REGEX_LEN};
pub use load::{detect_delimiter, infer_col_type, parse_table, Table, TYPE_INFERENCE_SAMPLE};
pub use merge::{merge_datasets, DatasetRows};

#[derive(Default)]
struct EngineState {
    table: Option<Table>,
    /// Source row index per visual index of the current filtered, sorted view.
    view: Vec<usize>,
    last_filter: Option<FilterSpec>,
}

/// Holds one active table plus its current view.
#[derive(Default)]
pub struct MemoryEngine {
    state: RwLock<EngineState>,
}

fn no_dataset() -> BackendError {
    BackendError::not_found("no dataset loaded")
}

fn row_out_of_range() -> BackendError {
    BackendError::invalid("row out of range")
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InspectorBackend for MemoryEngine {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn load_csv(
        &self,
        source: &DatasetSource,
        has_headers: bool,
    ) -> Result<LoadResult, BackendError> {
        let started = Instant::now();
        let text = load::read_source(source).await?;
        let table = load::parse_table(&text, has_headers)?;
        let result = LoadResult {
            headers: table.headers.clone(),
            row_count: table.row_count,
            col_types: table.col_types.clone(),
        };
        let mut state = self.state.write().await;
        state.view = (0..table.row_count).collect();
        state.table = Some(table);
        state.last_filter = None;
        debug!(
            op = "load",
            kind = source.kind(),
            rows = result.row_count,
            cols = result.headers.len(),
            ms = started.elapsed().as_millis() as u64,
            "backend"
        );
        Ok(result)
    }

    async fn sniff_has_headers(&self, path: &str) -> Result<HeaderSniff, BackendError> {
        let text = load::read_source(&DatasetSource::Path {
            path: path.to_string(),
        })
        .await?;
        load::sniff_headers(&text)
    }

    async fn apply_filter(&self, spec: &FilterSpec) -> Result<usize, BackendError> {
        let started = Instant::now();
        let compiled = CompiledFilter::compile(spec)?;
        let mut state = self.state.write().await;
        let table = state.table.as_ref().ok_or_else(no_dataset)?;
        let view = compiled.select(table);
        let count = view.len();
        state.view = view;
        state.last_filter = Some(spec.clone());
        debug!(op = "filter", filtered = count, ms = started.elapsed().as_millis() as u64, "backend");
        Ok(count)
    }

    async fn get_row_slice(
        &self,
        start: usize,
        end: usize,
        cols: Option<&[usize]>,
    ) -> Result<Vec<Vec<String>>, BackendError> {
        let state = self.state.read().await;
        let table = state.table.as_ref().ok_or_else(no_dataset)?;
        let end = end.min(state.view.len());
        if start >= end {
            return Ok(Vec::new());
        }
        let use_cols: Vec<usize> = match cols {
            Some(c) if !c.is_empty() => c
                .iter()
                .copied()
                .filter(|i| *i < table.headers.len())
                .collect(),
            _ => (0..table.headers.len()).collect(),
        };
        Ok(state.view[start..end]
            .iter()
            .map(|&row| {
                use_cols
                    .iter()
                    .map(|&c| table.cell(c, row).to_string())
                    .collect()
            })
            .collect())
    }

    async fn sort(&self, spec: &SortSpec) -> Result<(), BackendError> {
        let mut guard = self.state.write().await;
        let EngineState { table, view, .. } = &mut *guard;
        let table = table.as_ref().ok_or_else(no_dataset)?;
        sort::sort_view(view, table, spec)
    }

    async fn get_category_values(
        &self,
        req: &CategoryValuesRequest,
    ) -> Result<CategoryValuesResponse, BackendError> {
        let state = self.state.read().await;
        let table = state.table.as_ref().ok_or_else(no_dataset)?;
        category::category_values(table, &state.view, req)
    }

    async fn get_full_row_metadata(&self, visual_idx: usize) -> Result<Vec<KeyValue>, BackendError> {
        let state = self.state.read().await;
        let table = state.table.as_ref().ok_or_else(no_dataset)?;
        let row = *state.view.get(visual_idx).ok_or_else(row_out_of_range)?;
        Ok(table
            .headers
            .iter()
            .enumerate()
            .map(|(c, key)| KeyValue {
                key: key.clone(),
                value: table.cell(c, row).to_string(),
            })
            .collect())
    }

    async fn explain_row(&self, visual_idx: usize) -> Result<ExplainRowResponse, BackendError> {
        let state = self.state.read().await;
        let table = state.table.as_ref().ok_or_else(no_dataset)?;
        let row = *state.view.get(visual_idx).ok_or_else(row_out_of_range)?;
        let spec = state
            .last_filter
            .as_ref()
            .ok_or_else(|| BackendError::invalid("no active filter"))?;
        let (passes, reasons) = CompiledFilter::compile(spec)?.explain(table, row);
        Ok(ExplainRowResponse {
            visual_idx,
            source_row_idx: row,
            passes,
            reasons,
        })
    }

    async fn query_multiple_csv(
        &self,
        req: &MultiQueryRequest,
    ) -> Result<MultiQueryResponse, BackendError> {
        let started = Instant::now();
        let compiled = CompiledFilter::compile(&req.spec)?;
        let mut tables = Vec::with_capacity(req.datasets.len());
        for ds in &req.datasets {
            let text = load::read_source(&ds.source).await?;
            tables.push(load::parse_table(&text, ds.has_headers)?);
        }
        let parts: Vec<DatasetRows<'_>> = req
            .datasets
            .iter()
            .zip(&tables)
            .map(|(ds, table)| {
                let rows = compiled.select(table);
                DatasetRows {
                    result: DatasetQueryResult {
                        dataset_id: ds.dataset_id.clone(),
                        label: ds.label.clone(),
                        filtered: rows.len(),
                        total: table.row_count,
                    },
                    table,
                    rows,
                }
            })
            .collect();
        let merged = merge_datasets(&parts);
        debug!(
            op = "query_multiple",
            datasets = req.datasets.len(),
            merged = merged.merged_rows.len(),
            ms = started.elapsed().as_millis() as u64,
            "backend"
        );
        Ok(merged)
    }
}
