// SPDX-License-Identifier: Apache-2.0

//! The one mutable record the coordinator owns. Every operation reads and
//! writes named sub-states here instead of sharing ambient globals.

use std::sync::Arc;

use bijux_inspector_model::{
    CategoryValueCount, ColType, ColumnLayout, DatasetQueryResult, ExplainRowResponse, FilterSpec,
    FilterState, KeyValue, QueryScope, SchemaColumnStat, SortLevel,
};
use bijux_inspector_query::{compute_window, WindowParams, WindowRange, DEFAULT_ROW_HEIGHT};

use crate::registry::DatasetRegistry;
use crate::schema_cache::SchemaCacheKey;

#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub headers: Vec<String>,
    pub col_types: Vec<ColType>,
    pub total_rows: usize,
    pub total_filtered: usize,
    /// Full-width rows of the current window; unrequested cells are empty.
    pub visible_rows: Vec<Vec<String>>,
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub row_height: u32,
    pub window: WindowRange,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            col_types: Vec::new(),
            total_rows: 0,
            total_filtered: 0,
            visible_rows: Vec::new(),
            scroll_top: 0.0,
            viewport_height: 0.0,
            row_height: DEFAULT_ROW_HEIGHT,
            window: WindowRange::default(),
        }
    }
}

impl GridState {
    /// Re-derives the window from scroll position and the filtered count.
    /// Returns true when the window moved.
    pub fn recompute_window(&mut self, params: &WindowParams) -> bool {
        let params = WindowParams {
            row_height: f64::from(self.row_height),
            ..*params
        };
        let next = compute_window(self.scroll_top, self.viewport_height, self.total_filtered, &params);
        let moved = next != self.window;
        self.window = next;
        moved
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerFlags {
    pub pending: bool,
    pub in_flight: bool,
    /// Set while a cross-dataset merge runs so single-dataset passes cannot race it.
    pub suspend_reactive: bool,
    pub cross_busy: bool,
    /// A change arrived while a merge was in flight; the merge loop re-runs for it.
    pub cross_pending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub levels: Vec<SortLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryState {
    pub search: String,
    pub offset: usize,
    pub items: Vec<CategoryValueCount>,
    pub distinct_total: usize,
    pub rows_scanned: usize,
    pub total_rows_in_view: usize,
    pub partial: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaState {
    pub stats: Option<Arc<Vec<SchemaColumnStat>>>,
    pub baseline: Option<Vec<SchemaColumnStat>>,
    pub last_key: Option<SchemaCacheKey>,
    pub from_cache: bool,
    pub loading: bool,
}

/// Single-dataset view captured right before a merge replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreMergeSnapshot {
    pub headers: Vec<String>,
    pub col_types: Vec<ColType>,
    pub total_rows: usize,
    pub total_filtered: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossState {
    pub scope: QueryScope,
    pub merged: bool,
    pub results: Vec<DatasetQueryResult>,
    pub merged_rows: Vec<Vec<String>>,
    pub snapshot: Option<PreMergeSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawerState {
    pub open: bool,
    pub visual_idx: usize,
    pub fields: Vec<KeyValue>,
    pub explain: Option<ExplainRowResponse>,
}

/// Operation-scoped error strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewErrors {
    pub load: Option<String>,
    pub query: Option<String>,
    pub numeric: Option<String>,
    pub date: Option<String>,
    pub schema: Option<String>,
    pub category: Option<String>,
    pub drawer: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub registry: DatasetRegistry,
    pub has_loaded: bool,
    pub filters: FilterState,
    /// Spec of the last filter pass that was applied.
    pub active_spec: Option<FilterSpec>,
    pub grid: GridState,
    pub scheduler: SchedulerFlags,
    pub sort: SortState,
    pub layout: ColumnLayout,
    pub category: CategoryState,
    pub schema: SchemaState,
    pub cross: CrossState,
    pub drawer: DrawerState,
    pub errors: ViewErrors,
}

impl ViewState {
    /// Empty safe baseline after a failed load or when nothing is left loaded.
    pub fn reset_dataset_view(&mut self) {
        self.has_loaded = false;
        self.active_spec = None;
        self.grid.headers.clear();
        self.grid.col_types.clear();
        self.grid.visible_rows.clear();
        self.grid.total_rows = 0;
        self.grid.total_filtered = 0;
        self.grid.window = WindowRange::default();
        self.cross.merged = false;
        self.cross.merged_rows.clear();
        self.cross.snapshot = None;
        self.drawer = DrawerState::default();
    }

    #[must_use]
    pub fn snapshot_pre_merge(&self) -> PreMergeSnapshot {
        PreMergeSnapshot {
            headers: self.grid.headers.clone(),
            col_types: self.grid.col_types.clone(),
            total_rows: self.grid.total_rows,
            total_filtered: self.grid.total_filtered,
        }
    }

    /// Puts the pre-merge view back exactly and drops every merged artifact.
    /// Used when a merge fails, so no half-merged state survives.
    pub fn restore_pre_merge(&mut self) {
        self.clear_merged();
        let Some(snap) = self.cross.snapshot.take() else {
            return;
        };
        self.grid.headers = snap.headers;
        self.grid.col_types = snap.col_types;
        self.grid.total_rows = snap.total_rows;
        self.grid.total_filtered = snap.total_filtered;
    }

    /// Leaving the merged view by scope change or unload. Empty or zero
    /// snapshot fields are skipped; the filter pass that follows recounts.
    pub fn restore_pre_merge_guarded(&mut self) {
        self.clear_merged();
        let Some(snap) = self.cross.snapshot.take() else {
            return;
        };
        if !snap.headers.is_empty() {
            self.grid.headers = snap.headers;
        }
        if !snap.col_types.is_empty() {
            self.grid.col_types = snap.col_types;
        }
        if snap.total_rows > 0 {
            self.grid.total_rows = snap.total_rows;
        }
        if snap.total_filtered > 0 {
            self.grid.total_filtered = snap.total_filtered;
        }
    }

    fn clear_merged(&mut self) {
        self.cross.merged = false;
        self.cross.merged_rows.clear();
        self.cross.results.clear();
        self.grid.visible_rows.clear();
    }

    /// Column indices to fetch, or `None` for every column.
    #[must_use]
    pub fn requested_columns(&self) -> Option<Vec<usize>> {
        let n = self.grid.headers.len();
        if self.layout.visible_columns.is_empty() && self.layout.hidden_columns.is_empty() {
            return None;
        }
        let base: Vec<usize> = if self.layout.visible_columns.is_empty() {
            (0..n).collect()
        } else {
            self.layout.visible_columns.clone()
        };
        let cols: Vec<usize> = base
            .into_iter()
            .filter(|c| *c < n && !self.layout.hidden_columns.contains(c))
            .collect();
        if cols.len() == n {
            None
        } else {
            Some(cols)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged_view() -> ViewState {
        let mut view = ViewState::default();
        view.grid.headers = vec!["_source_file".to_string(), "a".to_string()];
        view.grid.total_rows = 9;
        view.grid.total_filtered = 9;
        view.grid.visible_rows = vec![vec!["x.csv".to_string(), "1".to_string()]];
        view.cross.merged = true;
        view.cross.merged_rows = view.grid.visible_rows.clone();
        view.cross.snapshot = Some(PreMergeSnapshot {
            headers: vec!["a".to_string()],
            col_types: vec![ColType::Numeric],
            total_rows: 4,
            total_filtered: 0,
        });
        view
    }

    #[test]
    fn failed_merge_restore_is_exact() {
        let mut view = merged_view();
        view.restore_pre_merge();
        assert_eq!(view.grid.headers, vec!["a".to_string()]);
        assert_eq!(view.grid.col_types, vec![ColType::Numeric]);
        assert_eq!(view.grid.total_rows, 4);
        assert_eq!(view.grid.total_filtered, 0);
        assert!(!view.cross.merged);
        assert!(view.cross.merged_rows.is_empty());
        assert!(view.grid.visible_rows.is_empty());
        assert!(view.cross.snapshot.is_none());
    }

    #[test]
    fn guarded_restore_skips_empty_snapshot_fields() {
        let mut view = merged_view();
        view.restore_pre_merge_guarded();
        assert_eq!(view.grid.headers, vec!["a".to_string()]);
        assert_eq!(view.grid.total_rows, 4);
        assert_eq!(view.grid.total_filtered, 9);
        assert!(view.cross.merged_rows.is_empty());
        assert!(view.cross.snapshot.is_none());
    }

    #[test]
    fn requested_columns_respect_hidden_and_visible() {
        let mut view = ViewState::default();
        view.grid.headers = (0..4).map(|i| format!("c{i}")).collect();
        assert_eq!(view.requested_columns(), None);
        view.layout.hidden_columns = vec![1];
        assert_eq!(view.requested_columns(), Some(vec![0, 2, 3]));
        view.layout.visible_columns = vec![1, 3];
        assert_eq!(view.requested_columns(), Some(vec![3]));
    }

    #[test]
    fn window_tracks_filtered_count() {
        let mut grid = GridState {
            total_filtered: 5,
            viewport_height: 340.0,
            ..GridState::default()
        };
        assert!(grid.recompute_window(&WindowParams::default()));
        assert_eq!(grid.window, WindowRange { start: 0, end: 5 });
        grid.total_filtered = 0;
        assert!(grid.recompute_window(&WindowParams::default()));
        assert!(grid.window.is_empty());
    }
}
