// SPDX-License-Identifier: Apache-2.0

//! FilterScheduler: debounce, the pending/in-flight drain loop, and routing
//! between single-dataset and cross-dataset execution.

use std::sync::Arc;
use std::time::Instant;

use bijux_inspector_model::{FilterState, MatchMode, QueryScope, SortSpec};
use bijux_inspector_query::{build_filter_spec, SpecField};
use tracing::warn;

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;

impl<B: InspectorBackend> Inspector<B> {
    /// Mutates the raw filter inputs and schedules a debounced pass.
    pub async fn edit_filters(self: &Arc<Self>, edit: impl FnOnce(&mut FilterState)) {
        {
            let mut s = self.state.lock().await;
            edit(&mut s.filters);
            if s.has_loaded {
                s.scheduler.pending = true;
            }
        }
        self.schedule_filter().await;
    }

    pub async fn set_query(self: &Arc<Self>, query: &str) {
        let query = query.to_string();
        self.edit_filters(move |f| f.query = query).await;
    }

    pub async fn set_match_mode(self: &Arc<Self>, mode: MatchMode) {
        self.edit_filters(move |f| f.match_mode = mode).await;
    }

    pub async fn set_target_column(self: &Arc<Self>, col_idx: Option<usize>) {
        self.edit_filters(move |f| f.target_col_idx = col_idx).await;
    }

    /// Arms the debounce timer for this state change. Re-arming cancels the
    /// previous pending fire. With several datasets in scope `all` the cross
    /// timer is armed instead.
    pub async fn schedule_filter(self: &Arc<Self>) {
        let cross = {
            let mut s = self.state.lock().await;
            if !s.has_loaded {
                return;
            }
            if s.scheduler.suspend_reactive {
                s.scheduler.cross_pending = true;
                return;
            }
            s.cross.scope == QueryScope::All && s.registry.len() > 1
        };
        let this = Arc::clone(self);
        if cross {
            self.cross_timer.schedule(async move {
                this.run_cross_query().await;
            });
        } else {
            self.filter_timer.schedule(async move {
                this.dispatch_filter(false).await;
            });
        }
    }

    /// Swaps every filter input at once and runs a pass without debouncing.
    pub async fn replace_filters(&self, filters: FilterState) {
        self.state.lock().await.filters = filters;
        self.run_filter_now(false).await;
    }

    /// Runs immediately, bypassing the debounce, still honoring the in-flight guard.
    pub async fn run_filter_now(&self, force_current: bool) {
        self.filter_timer.cancel();
        self.dispatch_filter(force_current).await;
    }

    pub(super) async fn dispatch_filter(&self, force_current: bool) {
        let cross = {
            let mut s = self.state.lock().await;
            if !s.has_loaded {
                return;
            }
            if s.scheduler.suspend_reactive || s.scheduler.cross_busy {
                s.scheduler.cross_pending = true;
                return;
            }
            let cross =
                !force_current && s.registry.len() > 1 && s.cross.scope == QueryScope::All;
            if !cross {
                s.cross.merged = false;
                s.scheduler.pending = true;
            }
            cross
        };
        if cross {
            self.run_cross_query().await;
        } else {
            self.drain_filter().await;
        }
    }

    /// Runs passes until no change is pending. A second caller while a pass
    /// is in flight returns at once; the running loop picks its change up.
    pub(super) async fn drain_filter(&self) {
        {
            let mut s = self.state.lock().await;
            if s.scheduler.in_flight {
                return;
            }
            s.scheduler.in_flight = true;
        }
        loop {
            {
                let mut s = self.state.lock().await;
                if !s.scheduler.pending {
                    s.scheduler.in_flight = false;
                    break;
                }
                s.scheduler.pending = false;
            }
            self.run_filter_pass().await;
        }
    }

    async fn run_filter_pass(&self) {
        let token = self.gates.issue(OpClass::Filter);
        let built = {
            let mut s = self.state.lock().await;
            let built = build_filter_spec(&s.filters);
            s.errors.query = None;
            s.errors.numeric = None;
            s.errors.date = None;
            if let Err(e) = &built {
                let slot = match e.field {
                    SpecField::Numeric => &mut s.errors.numeric,
                    SpecField::Date => &mut s.errors.date,
                    _ => &mut s.errors.query,
                };
                *slot = Some(e.message.clone());
            }
            built.map(|spec| (spec, s.filters.match_mode))
        };
        let Ok((spec, mode)) = built else {
            return;
        };

        let started = Instant::now();
        let count = match self.backend.apply_filter(&spec).await {
            Ok(count) => count,
            Err(e) => {
                if !self.gates.is_current(OpClass::Filter, token) {
                    return;
                }
                warn!(op = "filter", error = %e, "backend command failed");
                let mut s = self.state.lock().await;
                if mode == MatchMode::Regex {
                    s.errors.query = Some(e.to_string());
                } else {
                    s.errors.load = Some(e.to_string());
                }
                return;
            }
        };
        if !self.gates.is_current(OpClass::Filter, token) {
            return;
        }
        let levels = {
            let mut s = self.state.lock().await;
            s.grid.total_filtered = count;
            s.active_spec = Some(spec);
            s.errors.load = None;
            s.sort.levels.clone()
        };
        self.perf.record(
            "filter",
            elapsed_ms(started),
            meta([("filtered", count.to_string()), ("mode", mode.as_str().to_string())]),
        );

        if !levels.is_empty() {
            for (i, level) in levels.iter().rev().enumerate() {
                let replay = SortSpec {
                    col_idx: level.col_idx,
                    dir: level.dir,
                    stable: i > 0,
                };
                if let Err(e) = self.backend.sort(&replay).await {
                    if self.gates.is_current(OpClass::Filter, token) {
                        self.state.lock().await.errors.sort = Some(e.to_string());
                    }
                    break;
                }
            }
            if !self.gates.is_current(OpClass::Filter, token) {
                return;
            }
        }

        {
            let mut s = self.state.lock().await;
            let params = self.config.window_params();
            s.grid.recompute_window(&params);
        }
        self.fetch_visible_slice().await;
    }
}
