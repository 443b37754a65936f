// SPDX-License-Identifier: Apache-2.0

//! Snapshot capture and replay for the persistence layer.

use bijux_inspector_model::{CapturedState, FilterState, CAPTURED_STATE_VERSION, MAX_SORT_LEVELS};

use super::layout::clamp_column_width;
use super::Inspector;
use crate::backend::InspectorBackend;

impl<B: InspectorBackend> Inspector<B> {
    pub async fn capture_state(&self) -> CapturedState {
        let s = self.state.lock().await;
        let first = s.sort.levels.first().copied();
        CapturedState {
            version: CAPTURED_STATE_VERSION,
            query: s.filters.query.clone(),
            match_mode: s.filters.match_mode,
            target_col_idx: s.filters.target_col_idx,
            max_rows_scan_text: s.filters.max_rows_scan_text.clone(),
            multi_query_enabled: s.filters.multi_query_enabled,
            multi_query_clauses: s.filters.clauses.clone(),
            numeric: s.filters.numeric.clone(),
            date: s.filters.date.clone(),
            category: s.filters.category.clone(),
            sort_col_idx: first.map(|l| l.col_idx),
            sort_dir: first.map(|l| l.dir).unwrap_or_default(),
            sort_specs: s.sort.levels.clone(),
            layout: s.layout.clone(),
        }
    }

    /// Replays a snapshot onto the active dataset and runs the filter at once.
    /// Column references that do not exist in the current headers are dropped.
    pub async fn apply_state(&self, snapshot: CapturedState) {
        let snap = snapshot.migrate();
        {
            let mut s = self.state.lock().await;
            let header_count = s.grid.headers.len();
            let mut filters = FilterState {
                query: snap.query,
                match_mode: snap.match_mode,
                target_col_idx: snap.target_col_idx,
                max_rows_scan_text: snap.max_rows_scan_text,
                multi_query_enabled: snap.multi_query_enabled,
                clauses: snap.multi_query_clauses,
                numeric: snap.numeric,
                date: snap.date,
                category: snap.category,
            };
            filters.clamp_columns(header_count);
            for clause in &mut filters.clauses {
                if clause.target_col_idx.is_some_and(|c| c >= header_count) {
                    clause.target_col_idx = None;
                }
            }
            s.filters = filters;

            let mut layout = snap.layout;
            layout.retain_valid(header_count);
            for width in layout.column_widths.values_mut() {
                *width = clamp_column_width(f64::from(*width));
            }
            s.layout = layout;

            let mut levels = snap.sort_specs;
            levels.retain(|l| l.col_idx < header_count);
            levels.truncate(MAX_SORT_LEVELS);
            s.sort.levels = levels;
            s.errors.sort = None;
        }
        self.run_filter_now(false).await;
    }
}
