// SPDX-License-Identifier: Apache-2.0

//! SchemaProfiler: sampled column profiling with a bounded keyed cache.

use std::sync::Arc;
use std::time::Instant;

use bijux_inspector_core::canonical::stable_json_hash_short;
use bijux_inspector_model::{
    ColType, DateFilterInput, NumericFilterInput, SampleTier, SchemaColumnStat, SchemaInsights,
};
use bijux_inspector_query::{
    filter_hash, profile_schema_from_rows, sample_size_for, schema_insights, schema_scope,
};
use tracing::warn;

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;
use crate::schema_cache::SchemaCacheKey;

/// Values picked from a column's top sample when a schema card seeds the category filter.
pub const SCHEMA_CATEGORY_PICKS: usize = 6;

struct ProfilePlan {
    key: SchemaCacheKey,
    headers: Vec<String>,
    col_types: Vec<ColType>,
    local_rows: Option<Vec<Vec<String>>>,
}

impl<B: InspectorBackend> Inspector<B> {
    /// Profiles up to the tier's sample of the active view. Identical keys are
    /// served from the cache without touching the backend.
    pub async fn compute_schema(
        &self,
        tier: SampleTier,
        explicit: Option<usize>,
    ) -> Option<Arc<Vec<SchemaColumnStat>>> {
        let token = self.gates.issue(OpClass::Schema);
        let started = Instant::now();
        let plan = {
            let mut s = self.state.lock().await;
            if !s.has_loaded || s.grid.headers.is_empty() {
                return None;
            }
            let scope = schema_scope(&s.filters);
            let sample_size = sample_size_for(
                &self.config.sample_tiers,
                tier,
                explicit,
                s.grid.total_filtered,
                s.grid.total_rows,
            );
            let dataset_id = if s.cross.merged {
                let ids: Vec<&str> = s.registry.datasets().iter().map(|d| d.id.as_str()).collect();
                format!("merged_{}", stable_json_hash_short(&ids).unwrap_or_default())
            } else {
                s.registry
                    .active_id()
                    .map(|id| id.to_string())
                    .unwrap_or_default()
            };
            let filter_hash = match s.active_spec.as_ref().map(filter_hash) {
                Some(Ok(h)) => h,
                Some(Err(e)) => {
                    s.errors.schema = Some(e);
                    return None;
                }
                None => "none".to_string(),
            };
            s.schema.loading = true;
            s.errors.schema = None;
            ProfilePlan {
                key: SchemaCacheKey {
                    dataset_id,
                    filter_hash,
                    sample_size,
                    scope,
                },
                headers: s.grid.headers.clone(),
                col_types: s.grid.col_types.clone(),
                local_rows: s.cross.merged.then(|| {
                    s.cross.merged_rows[..sample_size.min(s.cross.merged_rows.len())].to_vec()
                }),
            }
        };

        let cached = self.schema_cache.lock().await.get(&plan.key);
        if let Some(stats) = cached {
            if self.gates.is_current(OpClass::Schema, token) {
                let mut s = self.state.lock().await;
                s.schema.stats = Some(Arc::clone(&stats));
                s.schema.last_key = Some(plan.key);
                s.schema.from_cache = true;
                s.schema.loading = false;
            }
            self.perf.record(
                "schema",
                elapsed_ms(started),
                meta([("cache", "true".to_string()), ("columns", stats.len().to_string())]),
            );
            return Some(stats);
        }

        let rows = match plan.local_rows {
            Some(rows) => rows,
            None => match self.backend.get_row_slice(0, plan.key.sample_size, None).await {
                Ok(rows) => rows,
                Err(e) => {
                    if self.gates.is_current(OpClass::Schema, token) {
                        warn!(op = "schema", error = %e, "backend command failed");
                        let mut s = self.state.lock().await;
                        s.errors.schema = Some(e.to_string());
                        s.schema.loading = false;
                    }
                    return None;
                }
            },
        };
        let sampled = rows.len();
        let stats = Arc::new(profile_schema_from_rows(&rows, &plan.headers, &plan.col_types));
        if !self.gates.is_current(OpClass::Schema, token) {
            return None;
        }
        self.schema_cache
            .lock()
            .await
            .insert(plan.key.clone(), Arc::clone(&stats));
        {
            let mut s = self.state.lock().await;
            s.schema.stats = Some(Arc::clone(&stats));
            s.schema.last_key = Some(plan.key);
            s.schema.from_cache = false;
            s.schema.loading = false;
        }
        self.perf.record(
            "schema",
            elapsed_ms(started),
            meta([("cache", "false".to_string()), ("rows", sampled.to_string())]),
        );
        Some(stats)
    }

    /// Captures the current stats as the drift baseline.
    pub async fn set_schema_baseline(&self) {
        let mut s = self.state.lock().await;
        s.schema.baseline = s.schema.stats.as_deref().cloned();
    }

    pub async fn schema_insights(&self) -> SchemaInsights {
        let s = self.state.lock().await;
        match s.schema.stats.as_deref() {
            Some(stats) => schema_insights(stats, s.schema.baseline.as_deref()),
            None => SchemaInsights::default(),
        }
    }

    async fn schema_stat(&self, col_idx: usize) -> Option<SchemaColumnStat> {
        let s = self.state.lock().await;
        s.schema
            .stats
            .as_ref()
            .and_then(|stats| stats.iter().find(|st| st.idx == col_idx).cloned())
    }

    /// Seeds the category filter with the column's most frequent values.
    pub async fn apply_schema_category(&self, col_idx: usize) {
        let Some(stat) = self.schema_stat(col_idx).await else {
            return;
        };
        {
            let mut s = self.state.lock().await;
            let cat = &mut s.filters.category;
            cat.enabled = true;
            cat.col_idx = Some(col_idx);
            cat.selected = stat
                .top_sample
                .iter()
                .filter(|t| !t.value.trim().is_empty())
                .take(SCHEMA_CATEGORY_PICKS)
                .map(|t| t.value.clone())
                .collect();
        }
        self.run_filter_now(false).await;
    }

    /// Seeds the numeric or date range filter with the column's observed bounds.
    pub async fn apply_schema_range(&self, col_idx: usize) {
        let Some(stat) = self.schema_stat(col_idx).await else {
            return;
        };
        let (Some(min), Some(max)) = (stat.min.clone(), stat.max.clone()) else {
            return;
        };
        {
            let mut s = self.state.lock().await;
            match stat.col_type {
                ColType::Numeric => {
                    s.filters.numeric = NumericFilterInput {
                        enabled: true,
                        col_idx: Some(col_idx),
                        min_text: min,
                        max_text: max,
                    };
                }
                ColType::Date => {
                    s.filters.date = DateFilterInput {
                        enabled: true,
                        col_idx: Some(col_idx),
                        min_iso: min,
                        max_iso: max,
                    };
                }
                ColType::String => return,
            }
        }
        self.run_filter_now(false).await;
    }

    pub async fn set_target_from_schema(&self, col_idx: usize) {
        self.state.lock().await.filters.target_col_idx = Some(col_idx);
        self.run_filter_now(false).await;
    }
}
