// SPDX-License-Identifier: Apache-2.0

//! CrossDatasetQueryRunner: one spec across every loaded dataset, merged into
//! a single view, with the pre-merge view restored on failure.

use std::time::Instant;

use bijux_inspector_model::{ColType, MultiQueryRequest, QueryScope};
use bijux_inspector_query::{build_filter_spec, SpecField};
use tracing::{info, warn};

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;

impl<B: InspectorBackend> Inspector<B> {
    /// Switching back to `current` drops the merged view, restores the
    /// single-dataset snapshot and re-runs the single-dataset filter.
    pub async fn set_scope(&self, scope: QueryScope) {
        match scope {
            QueryScope::Current => {
                {
                    let mut s = self.state.lock().await;
                    s.cross.scope = QueryScope::Current;
                    s.cross.results.clear();
                    s.cross.merged_rows.clear();
                    if s.cross.merged {
                        s.restore_pre_merge_guarded();
                        s.sort.levels.clear();
                    }
                    s.cross.merged = false;
                }
                self.gates.issue(OpClass::CrossQuery);
                self.cross_timer.cancel();
                self.run_filter_now(true).await;
            }
            QueryScope::All => {
                self.state.lock().await.cross.scope = QueryScope::All;
                self.run_filter_now(false).await;
            }
        }
    }

    /// Runs merges until no change arrived during the last one. A call while
    /// a merge is in flight only marks the change; the running loop re-runs it.
    pub async fn run_cross_query(&self) {
        loop {
            if self.cross_query_pass().await == CrossOutcome::Busy {
                return;
            }
            let route_cross = {
                let mut s = self.state.lock().await;
                if !std::mem::take(&mut s.scheduler.cross_pending) {
                    return;
                }
                let cross = s.has_loaded && s.cross.scope == QueryScope::All && s.registry.len() > 1;
                if !cross {
                    s.scheduler.pending = true;
                }
                cross
            };
            if !route_cross {
                self.drain_filter().await;
                return;
            }
        }
    }

    async fn cross_query_pass(&self) -> CrossOutcome {
        let started = Instant::now();
        let (token, req) = {
            let mut s = self.state.lock().await;
            if s.scheduler.cross_busy {
                s.scheduler.cross_pending = true;
                return CrossOutcome::Busy;
            }
            if s.registry.len() < 2 || !s.has_loaded {
                return CrossOutcome::Skipped;
            }
            let spec = match build_filter_spec(&s.filters) {
                Ok(spec) => spec,
                Err(e) => {
                    let slot = match e.field {
                        SpecField::Numeric => &mut s.errors.numeric,
                        SpecField::Date => &mut s.errors.date,
                        _ => &mut s.errors.query,
                    };
                    *slot = Some(e.message);
                    return CrossOutcome::Skipped;
                }
            };
            s.errors.query = None;
            s.errors.numeric = None;
            s.errors.date = None;
            s.errors.load = None;
            s.scheduler.cross_busy = true;
            s.scheduler.suspend_reactive = true;
            s.scheduler.pending = false;
            if !s.cross.merged {
                s.cross.snapshot = Some(s.snapshot_pre_merge());
            }
            let token = self.gates.issue(OpClass::CrossQuery);
            (
                token,
                MultiQueryRequest {
                    datasets: s.registry.query_inputs(),
                    spec,
                },
            )
        };

        let result = self.backend.query_multiple_csv(&req).await;
        let current = self.gates.is_current(OpClass::CrossQuery, token);
        let outcome = {
            let mut s = self.state.lock().await;
            s.scheduler.cross_busy = false;
            s.scheduler.suspend_reactive = false;
            if !current {
                if s.cross.scope == QueryScope::Current {
                    s.scheduler.cross_pending = false;
                    s.scheduler.pending = true;
                    CrossOutcome::BackToCurrent
                } else {
                    CrossOutcome::Skipped
                }
            } else {
                match result {
                    Ok(resp) => {
                        let n = resp.merged_rows.len();
                        s.grid.col_types = vec![ColType::String; resp.merged_headers.len()];
                        s.grid.headers = resp.merged_headers;
                        s.grid.total_rows = n;
                        s.grid.total_filtered = n;
                        s.cross.results = resp.dataset_results;
                        s.cross.merged_rows = resp.merged_rows;
                        s.cross.merged = true;
                        s.layout.visible_columns.clear();
                        s.sort.levels.clear();
                        s.active_spec = Some(req.spec);
                        s.grid.recompute_window(&self.config.window_params());
                        info!(datasets = s.cross.results.len(), merged = n, "cross-dataset merge applied");
                        CrossOutcome::Applied
                    }
                    Err(e) => {
                        warn!(op = "cross_query", error = %e, "backend command failed");
                        s.errors.load = Some(e.to_string());
                        s.restore_pre_merge();
                        s.grid.recompute_window(&self.config.window_params());
                        CrossOutcome::Restored
                    }
                }
            }
        };

        match outcome {
            CrossOutcome::Applied => {
                self.perf.record(
                    "cross_query",
                    elapsed_ms(started),
                    meta([("datasets", req.datasets.len().to_string())]),
                );
                self.fetch_visible_slice().await;
            }
            CrossOutcome::Restored => self.fetch_visible_slice().await,
            CrossOutcome::BackToCurrent => self.drain_filter().await,
            CrossOutcome::Busy | CrossOutcome::Skipped => {}
        }
        outcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrossOutcome {
    Applied,
    /// The merge failed and the pre-merge view is back.
    Restored,
    BackToCurrent,
    Busy,
    Skipped,
}
