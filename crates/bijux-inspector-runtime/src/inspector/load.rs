// SPDX-License-Identifier: Apache-2.0

//! Dataset load, unload and activation.

use std::time::Instant;

use bijux_inspector_model::{
    ColumnLayout, Dataset, DatasetId, DatasetSource, HeaderMode, HeaderSniff,
};
use bijux_inspector_query::header_heuristic;
use tracing::{info, warn};

use super::{elapsed_ms, Inspector};
use crate::backend::{BackendError, InspectorBackend};
use crate::gate::OpClass;
use crate::perf::meta;
use crate::view::{CategoryState, DrawerState, SchemaState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(DatasetId),
    /// Header detection was inconclusive; retry with an explicit mode.
    NeedsHeaderDecision { reason: String },
}

fn split_naive(line: &str) -> Vec<String> {
    line.split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .collect()
}

/// Header guess for inline text from its first two non-blank lines.
#[must_use]
pub fn sniff_text_headers(text: &str) -> HeaderSniff {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let first = lines.next().map(split_naive).unwrap_or_default();
    let second = lines.next().map(split_naive).unwrap_or_default();
    header_heuristic(&first, &second)
}

const fn header_mode_for(has_headers: bool) -> HeaderMode {
    if has_headers {
        HeaderMode::Yes
    } else {
        HeaderMode::No
    }
}

impl<B: InspectorBackend> Inspector<B> {
    async fn fail_load(&self, e: &BackendError) {
        warn!(op = "load", error = %e, "dataset load failed");
        let mut s = self.state.lock().await;
        s.errors.load = Some(e.to_string());
        s.reset_dataset_view();
    }

    async fn resolve_headers(
        &self,
        source: &DatasetSource,
        mode: HeaderMode,
    ) -> Result<Result<bool, String>, BackendError> {
        let sniff = match (mode, source) {
            (HeaderMode::Yes, _) => return Ok(Ok(true)),
            (HeaderMode::No, _) => return Ok(Ok(false)),
            (HeaderMode::Auto, DatasetSource::Text { text }) => sniff_text_headers(text),
            (HeaderMode::Auto, DatasetSource::Path { path }) => {
                self.backend.sniff_has_headers(path).await?
            }
        };
        Ok(if sniff.decided {
            Ok(sniff.has_headers)
        } else {
            Err(sniff.reason)
        })
    }

    /// Loads a source into the backend and makes it the active dataset.
    ///
    /// In `auto` mode an inconclusive header guess returns
    /// [`LoadOutcome::NeedsHeaderDecision`] without loading anything.
    pub async fn load_dataset(
        &self,
        source: DatasetSource,
        mode: HeaderMode,
        label: Option<String>,
    ) -> Result<LoadOutcome, BackendError> {
        let started = Instant::now();
        let has_headers = match self.resolve_headers(&source, mode).await {
            Ok(Ok(has_headers)) => has_headers,
            Ok(Err(reason)) => return Ok(LoadOutcome::NeedsHeaderDecision { reason }),
            Err(e) => {
                self.fail_load(&e).await;
                return Err(e);
            }
        };

        let loaded = match self.backend.load_csv(&source, has_headers).await {
            Ok(loaded) => loaded,
            Err(e) => {
                self.fail_load(&e).await;
                return Err(e);
            }
        };

        for class in [
            OpClass::Filter,
            OpClass::Slice,
            OpClass::Sort,
            OpClass::Category,
            OpClass::Schema,
            OpClass::CrossQuery,
            OpClass::Drawer,
        ] {
            self.gates.issue(class);
        }

        let id = DatasetId::derive(&source, &loaded.headers, loaded.row_count);
        let label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| source.default_label());
        let header_count = loaded.headers.len();
        let row_count = loaded.row_count;
        {
            let mut s = self.state.lock().await;
            s.registry.upsert(Dataset {
                id: id.clone(),
                label: label.clone(),
                has_headers,
                headers: loaded.headers.clone(),
                col_types: loaded.col_types.clone(),
                row_count,
                source,
            });
            s.grid.headers = loaded.headers;
            s.grid.col_types = loaded.col_types;
            s.grid.total_rows = row_count;
            s.grid.total_filtered = row_count;
            s.grid.visible_rows.clear();
            s.grid.scroll_top = 0.0;
            s.grid.recompute_window(&self.config.window_params());
            if !s.scheduler.suspend_reactive {
                s.sort.levels.clear();
                s.layout = ColumnLayout::default();
            }
            s.filters.clamp_columns(header_count);
            s.active_spec = None;
            s.schema = SchemaState::default();
            s.category = CategoryState::default();
            s.drawer = DrawerState::default();
            s.cross.merged = false;
            s.cross.merged_rows.clear();
            s.cross.results.clear();
            s.cross.snapshot = None;
            s.errors.load = None;
            s.errors.drawer = None;
            s.errors.sort = None;
            s.has_loaded = true;
        }
        self.perf.record(
            "load",
            elapsed_ms(started),
            meta([("rows", row_count.to_string()), ("cols", header_count.to_string())]),
        );
        info!(dataset = %id, label = %label, rows = row_count, cols = header_count, "dataset loaded");

        self.run_filter_now(false).await;
        Ok(LoadOutcome::Loaded(id))
    }

    /// Makes a registered dataset active again by reloading its source.
    pub async fn activate_dataset(&self, id: &DatasetId) -> Result<LoadOutcome, BackendError> {
        let dataset = self
            .state
            .lock()
            .await
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::not_found(format!("dataset not found: {id}")))?;
        self.load_dataset(
            dataset.source,
            header_mode_for(dataset.has_headers),
            Some(dataset.label),
        )
        .await
    }

    /// Removes a dataset. Unloading the active one activates the first
    /// remaining dataset or resets to the empty view.
    pub async fn unload_dataset(&self, id: &DatasetId) -> Result<(), BackendError> {
        let (was_active, next, merged) = {
            let mut s = self.state.lock().await;
            let (_, was_active) = s
                .registry
                .remove(id)
                .ok_or_else(|| BackendError::not_found(format!("dataset not found: {id}")))?;
            let next = s.registry.first().cloned();
            if was_active && next.is_none() {
                s.reset_dataset_view();
                s.schema = SchemaState::default();
                s.category = CategoryState::default();
            }
            let merged = s.cross.merged;
            if merged && s.registry.len() < 2 {
                s.restore_pre_merge_guarded();
                s.sort.levels.clear();
            }
            (was_active, next, merged)
        };
        info!(dataset = %id, "dataset unloaded");

        match (was_active, next) {
            (true, Some(next)) => {
                self.load_dataset(next.source, header_mode_for(next.has_headers), Some(next.label))
                    .await?;
            }
            (true, None) => {
                self.gates.issue(OpClass::CrossQuery);
                self.gates.issue(OpClass::Filter);
                self.gates.issue(OpClass::Slice);
            }
            (false, _) if merged => self.run_filter_now(false).await,
            (false, _) => {}
        }
        Ok(())
    }
}
