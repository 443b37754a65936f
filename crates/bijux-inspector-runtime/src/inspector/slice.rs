// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use bijux_inspector_query::normalize_row_height_or;
use tracing::warn;

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;

/// Spreads dense rows holding only `cols` back out to `width` cells.
fn widen(rows: Vec<Vec<String>>, cols: &[usize], width: usize) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| {
            let mut full = vec![String::new(); width];
            for (cell, &c) in row.into_iter().zip(cols) {
                if let Some(slot) = full.get_mut(c) {
                    *slot = cell;
                }
            }
            full
        })
        .collect()
}

impl<B: InspectorBackend> Inspector<B> {
    /// Fetches the rows of the current window into the grid.
    pub async fn fetch_visible_slice(&self) {
        let token = self.gates.issue(OpClass::Slice);
        let started = Instant::now();
        let (start, end, cols, width, local) = {
            let s = self.state.lock().await;
            let start = s.grid.window.start;
            let end = s.grid.window.end.max(start);
            let local = s.cross.merged.then(|| {
                let len = s.cross.merged_rows.len();
                s.cross.merged_rows[start.min(len)..end.min(len)].to_vec()
            });
            (start, end, s.requested_columns(), s.grid.headers.len(), local)
        };

        let rows = match local {
            Some(rows) => match &cols {
                Some(cols) => rows
                    .into_iter()
                    .map(|row| {
                        row.into_iter()
                            .enumerate()
                            .map(|(c, cell)| if cols.contains(&c) { cell } else { String::new() })
                            .collect()
                    })
                    .collect(),
                None => rows,
            },
            None => match self.backend.get_row_slice(start, end, cols.as_deref()).await {
                Ok(rows) => match &cols {
                    Some(cols) => widen(rows, cols, width),
                    None => rows,
                },
                Err(e) => {
                    if self.gates.is_current(OpClass::Slice, token) {
                        warn!(op = "slice", error = %e, "backend command failed");
                        let mut s = self.state.lock().await;
                        s.grid.visible_rows.clear();
                        s.errors.load = Some(e.to_string());
                    }
                    return;
                }
            },
        };
        if !self.gates.is_current(OpClass::Slice, token) {
            return;
        }
        let n = rows.len();
        self.state.lock().await.grid.visible_rows = rows;
        self.perf.record(
            "slice",
            elapsed_ms(started),
            meta([
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("rows", n.to_string()),
            ]),
        );
    }

    /// Fetches now, or after the adaptive delay when the filtered view is large.
    pub async fn schedule_slice_fetch(self: &Arc<Self>) {
        let filtered = self.state.lock().await.grid.total_filtered;
        let delay = self.config.slice_delay_for(filtered);
        if delay.is_zero() {
            self.fetch_visible_slice().await;
        } else {
            let this = Arc::clone(self);
            self.slice_timer.schedule_after(delay, async move {
                this.fetch_visible_slice().await;
            });
        }
    }

    pub async fn set_scroll(self: &Arc<Self>, scroll_top: f64, viewport_height: f64) {
        let moved = {
            let mut s = self.state.lock().await;
            s.grid.scroll_top = scroll_top;
            s.grid.viewport_height = viewport_height;
            s.grid.recompute_window(&self.config.window_params())
        };
        if moved {
            self.schedule_slice_fetch().await;
        }
    }

    /// Accepts any value; it is normalized into the supported row-height range.
    pub async fn set_row_height(self: &Arc<Self>, row_height: f64) {
        let moved = {
            let mut s = self.state.lock().await;
            s.grid.row_height = normalize_row_height_or(row_height, self.config.row_height);
            s.grid.recompute_window(&self.config.window_params())
        };
        if moved {
            self.schedule_slice_fetch().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::widen;

    #[test]
    fn widen_places_cells_at_requested_columns() {
        let rows = vec![vec!["a".to_string(), "c".to_string()]];
        let wide = widen(rows, &[0, 2], 3);
        assert_eq!(wide, vec![vec!["a".to_string(), String::new(), "c".to_string()]]);
    }
}
