// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use bijux_inspector_core::{
    ENV_INSPECTOR_CATEGORY_DEBOUNCE_MS, ENV_INSPECTOR_CROSS_QUERY_DEBOUNCE_MS,
    ENV_INSPECTOR_FILTER_DEBOUNCE_MS, ENV_INSPECTOR_PERF_CAPACITY,
    ENV_INSPECTOR_SAMPLE_BALANCED, ENV_INSPECTOR_SAMPLE_FAST, ENV_INSPECTOR_SAMPLE_FULL,
    ENV_INSPECTOR_SCHEMA_CACHE_CAPACITY,
};
use bijux_inspector_query::{SampleTiers, WindowParams, DEFAULT_ROW_HEIGHT};
use serde::Serialize;

/// p95 latency targets in milliseconds. Zero disables the check for that op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SloConfig {
    pub filter_ms: f64,
    pub slice_ms: f64,
    pub sort_ms: f64,
    pub schema_ms: f64,
    pub category_ms: f64,
    pub row_drawer_ms: f64,
}

impl Default for SloConfig {
    fn default() -> Self {
        Self {
            filter_ms: 120.0,
            slice_ms: 40.0,
            sort_ms: 250.0,
            schema_ms: 400.0,
            category_ms: 150.0,
            row_drawer_ms: 80.0,
        }
    }
}

impl SloConfig {
    #[must_use]
    pub fn for_op(&self, op: &str) -> f64 {
        match op {
            "filter" => self.filter_ms,
            "slice" => self.slice_ms,
            "sort" => self.sort_ms,
            "schema" => self.schema_ms,
            "category" => self.category_ms,
            "row_drawer" => self.row_drawer_ms,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    pub filter_debounce: Duration,
    pub cross_query_debounce: Duration,
    pub category_debounce: Duration,
    pub sample_tiers: SampleTiers,
    pub schema_cache_capacity: usize,
    pub perf_capacity: usize,
    pub category_page_limit: usize,
    pub category_default_max_rows_scan: usize,
    pub row_height: u32,
    pub overscan: usize,
    pub max_window_rows: usize,
    pub slice_delay_large: Duration,
    pub slice_delay_huge: Duration,
    pub slice_large_threshold: usize,
    pub slice_huge_threshold: usize,
    pub slos: SloConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter_debounce: Duration::from_millis(250),
            cross_query_debounce: Duration::from_millis(250),
            category_debounce: Duration::from_millis(160),
            sample_tiers: SampleTiers::default(),
            schema_cache_capacity: 200,
            perf_capacity: 5_000,
            category_page_limit: 200,
            category_default_max_rows_scan: 20_000,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: 10,
            max_window_rows: 80,
            slice_delay_large: Duration::from_millis(35),
            slice_delay_huge: Duration::from_millis(55),
            slice_large_threshold: 100_000,
            slice_huge_threshold: 250_000,
            slos: SloConfig::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Overrides defaults from `INSPECTOR_*` values; unparsable values keep the default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let ms = |name: &str, default: Duration| {
            Duration::from_millis(env_u64(&lookup, name, default.as_millis() as u64))
        };
        Self {
            filter_debounce: ms(ENV_INSPECTOR_FILTER_DEBOUNCE_MS, d.filter_debounce),
            cross_query_debounce: ms(ENV_INSPECTOR_CROSS_QUERY_DEBOUNCE_MS, d.cross_query_debounce),
            category_debounce: ms(ENV_INSPECTOR_CATEGORY_DEBOUNCE_MS, d.category_debounce),
            sample_tiers: SampleTiers {
                fast: env_usize(&lookup, ENV_INSPECTOR_SAMPLE_FAST, d.sample_tiers.fast),
                balanced: env_usize(&lookup, ENV_INSPECTOR_SAMPLE_BALANCED, d.sample_tiers.balanced),
                full: env_usize(&lookup, ENV_INSPECTOR_SAMPLE_FULL, d.sample_tiers.full),
            },
            schema_cache_capacity: env_usize(
                &lookup,
                ENV_INSPECTOR_SCHEMA_CACHE_CAPACITY,
                d.schema_cache_capacity,
            ),
            perf_capacity: env_usize(&lookup, ENV_INSPECTOR_PERF_CAPACITY, d.perf_capacity),
            ..d
        }
    }

    #[must_use]
    pub fn window_params(&self) -> WindowParams {
        WindowParams {
            row_height: f64::from(self.row_height),
            overscan: self.overscan,
            max_window_rows: self.max_window_rows,
        }
    }

    /// Extra wait before a slice fetch; large filtered views coalesce scroll bursts.
    #[must_use]
    pub fn slice_delay_for(&self, filtered: usize) -> Duration {
        if filtered > self.slice_huge_threshold {
            self.slice_delay_huge
        } else if filtered > self.slice_large_threshold {
            self.slice_delay_large
        } else {
            Duration::ZERO
        }
    }
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: usize) -> usize {
    lookup(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

pub fn validate_pipeline_config(cfg: &PipelineConfig) -> Result<(), String> {
    if cfg.schema_cache_capacity == 0 || cfg.perf_capacity == 0 {
        return Err("cache and perf capacities must be > 0".to_string());
    }
    let t = &cfg.sample_tiers;
    if t.fast == 0 {
        return Err("sample tiers must be > 0".to_string());
    }
    if !(t.fast < t.balanced && t.balanced < t.full) {
        return Err("sample tiers must be strictly increasing fast < balanced < full".to_string());
    }
    if cfg.overscan == 0 || cfg.max_window_rows == 0 {
        return Err("window sizes must be > 0".to_string());
    }
    if cfg.category_page_limit == 0 || cfg.category_page_limit > 1_000 {
        return Err("category page limit must be in 1..=1000".to_string());
    }
    if cfg.slice_large_threshold >= cfg.slice_huge_threshold {
        return Err("slice delay thresholds require large < huge".to_string());
    }
    Ok(())
}
