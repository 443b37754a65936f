// SPDX-License-Identifier: Apache-2.0

use std::time::Instant;

use bijux_inspector_model::KeyValue;
use tracing::warn;

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;
use crate::view::DrawerState;

impl<B: InspectorBackend> Inspector<B> {
    /// Loads every field of one filtered row plus the filter explanation.
    pub async fn open_row_details(&self, visual_idx: usize) {
        let token = self.gates.issue(OpClass::Drawer);
        let started = Instant::now();
        let local = {
            let mut s = self.state.lock().await;
            s.drawer.open = true;
            s.drawer.visual_idx = visual_idx;
            s.errors.drawer = None;
            s.cross.merged.then(|| {
                s.cross.merged_rows.get(visual_idx).map(|row| {
                    s.grid
                        .headers
                        .iter()
                        .zip(row)
                        .map(|(key, value)| KeyValue {
                            key: key.clone(),
                            value: value.clone(),
                        })
                        .collect::<Vec<_>>()
                })
            })
        };

        let (fields, explain) = match local {
            Some(Some(fields)) => (Ok(fields), None),
            Some(None) => (Err("row out of range".to_string()), None),
            None => {
                let fields = self
                    .backend
                    .get_full_row_metadata(visual_idx)
                    .await
                    .map_err(|e| e.to_string());
                let explain = match &fields {
                    Ok(_) => self.backend.explain_row(visual_idx).await.ok(),
                    Err(_) => None,
                };
                (fields, explain)
            }
        };
        if !self.gates.is_current(OpClass::Drawer, token) {
            return;
        }
        {
            let mut s = self.state.lock().await;
            match fields {
                Ok(fields) => {
                    s.drawer.fields = fields;
                    s.drawer.explain = explain;
                }
                Err(e) => {
                    warn!(op = "row_drawer", error = %e, "row details failed");
                    s.drawer.fields.clear();
                    s.drawer.explain = None;
                    s.errors.drawer = Some(e);
                }
            }
        }
        self.perf.record(
            "row_drawer",
            elapsed_ms(started),
            meta([("row", visual_idx.to_string())]),
        );
    }

    pub async fn close_row_details(&self) {
        self.gates.issue(OpClass::Drawer);
        let mut s = self.state.lock().await;
        s.drawer = DrawerState::default();
        s.errors.drawer = None;
    }

    /// Moves the open drawer by `delta` rows, clamped to the filtered view.
    pub async fn navigate_row(&self, delta: i64) {
        let next = {
            let s = self.state.lock().await;
            if !s.drawer.open {
                return;
            }
            let last = s.grid.total_filtered.saturating_sub(1);
            let current = i64::try_from(s.drawer.visual_idx).unwrap_or(i64::MAX);
            let target = current.saturating_add(delta).max(0);
            usize::try_from(target).unwrap_or(usize::MAX).min(last)
        };
        self.open_row_details(next).await;
    }
}
