// SPDX-License-Identifier: Apache-2.0

use std::time::Instant;

use bijux_inspector_model::{SortDir, SortLevel, SortSpec, MAX_SORT_LEVELS};
use tracing::warn;

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;

/// Applies a header click to the sort levels. A single click toggles the
/// direction on the same column or starts ascending on a new one; a multi
/// click toggles or appends a level, capped at four.
pub fn next_sort_levels(levels: &[SortLevel], col_idx: usize, multi: bool) -> Vec<SortLevel> {
    if !multi {
        let dir = match levels {
            [only] if only.col_idx == col_idx => only.dir.flipped(),
            _ => SortDir::Asc,
        };
        return vec![SortLevel { col_idx, dir }];
    }
    let mut next = levels.to_vec();
    if let Some(level) = next.iter_mut().find(|l| l.col_idx == col_idx) {
        level.dir = level.dir.flipped();
    } else if next.len() < MAX_SORT_LEVELS {
        next.push(SortLevel {
            col_idx,
            dir: SortDir::Asc,
        });
    }
    next
}

/// Stable, case-insensitive multi-level sort of in-memory rows.
pub fn sort_rows_locally(rows: &mut [Vec<String>], levels: &[SortLevel]) {
    for level in levels.iter().rev() {
        rows.sort_by(|a, b| {
            let va = a.get(level.col_idx).map_or(String::new(), |v| v.to_lowercase());
            let vb = b.get(level.col_idx).map_or(String::new(), |v| v.to_lowercase());
            match level.dir {
                SortDir::Asc => va.cmp(&vb),
                SortDir::Desc => vb.cmp(&va),
            }
        });
    }
}

impl<B: InspectorBackend> Inspector<B> {
    pub async fn request_sort(&self, col_idx: usize, multi: bool) {
        let token = self.gates.issue(OpClass::Sort);
        let started = Instant::now();
        let (levels, merged) = {
            let mut s = self.state.lock().await;
            if col_idx >= s.grid.headers.len() {
                s.errors.sort = Some("sort column out of range".to_string());
                return;
            }
            s.errors.sort = None;
            s.sort.levels = next_sort_levels(&s.sort.levels, col_idx, multi);
            let levels = s.sort.levels.clone();
            if s.cross.merged {
                sort_rows_locally(&mut s.cross.merged_rows, &levels);
            }
            (levels, s.cross.merged)
        };

        if !merged {
            for (i, level) in levels.iter().rev().enumerate() {
                let spec = SortSpec {
                    col_idx: level.col_idx,
                    dir: level.dir,
                    stable: i > 0,
                };
                if let Err(e) = self.backend.sort(&spec).await {
                    if self.gates.is_current(OpClass::Sort, token) {
                        warn!(op = "sort", error = %e, "backend command failed");
                        self.state.lock().await.errors.sort = Some(e.to_string());
                    }
                    return;
                }
            }
        }
        if !self.gates.is_current(OpClass::Sort, token) {
            return;
        }
        self.fetch_visible_slice().await;
        self.perf.record(
            "sort",
            elapsed_ms(started),
            meta([("levels", levels.len().to_string()), ("merged", merged.to_string())]),
        );
    }

    /// Drops every level; the next pass restores source order.
    pub async fn clear_sort(&self) {
        self.state.lock().await.sort.levels.clear();
        self.run_filter_now(false).await;
    }
}
