// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SloConfig;

/// Operations listed in the baseline report, in report order.
pub const REPORT_OPS: [&str; 6] = ["filter", "slice", "sort", "schema", "category", "row_drawer"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfSample {
    pub op: String,
    pub ms: f64,
    pub at_unix_ms: u64,
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerfSummary {
    pub count: usize,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
}

/// Ring buffer of latency samples; the oldest sample is dropped first.
pub struct PerfRecorder {
    capacity: usize,
    slos: SloConfig,
    samples: Mutex<VecDeque<PerfSample>>,
}

impl PerfRecorder {
    #[must_use]
    pub fn new(capacity: usize, slos: SloConfig) -> Self {
        Self {
            capacity: capacity.max(1),
            slos,
            samples: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, op: &str, ms: f64, meta: BTreeMap<String, String>) {
        let sample = PerfSample {
            op: op.to_string(),
            ms,
            at_unix_ms: bijux_inspector_core::unix_millis(),
            meta,
        };
        let p95 = {
            let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
            while samples.len() >= self.capacity {
                samples.pop_front();
            }
            samples.push_back(sample);
            summarize(samples.iter().filter(|s| s.op == op).map(|s| s.ms)).p95
        };
        let slo = self.slos.for_op(op);
        if slo > 0.0 && p95 > slo {
            warn!(op, ms, p95, slo, status = "slo_violation", "perf sample");
        } else {
            debug!(op, ms, p95, slo, status = "ok", "perf sample");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn samples(&self) -> Vec<PerfSample> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.iter().cloned().collect()
    }

    #[must_use]
    pub fn summary(&self, op: &str) -> PerfSummary {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        summarize(samples.iter().filter(|s| s.op == op).map(|s| s.ms))
    }

    /// Markdown table of every reported op against its p95 SLO.
    #[must_use]
    pub fn baseline_report(&self) -> String {
        let mut out = String::from(
            "| Op | Count | p50 (ms) | p95 (ms) | Max (ms) | SLO p95 (ms) | Status |\n|---|---:|---:|---:|---:|---:|---|\n",
        );
        for op in REPORT_OPS {
            let s = self.summary(op);
            let slo = self.slos.for_op(op);
            let slo_cell = if slo > 0.0 {
                format!("{slo:.1}")
            } else {
                "-".to_string()
            };
            let status = if slo <= 0.0 || s.p95 <= slo { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {op} | {} | {:.1} | {:.1} | {:.1} | {slo_cell} | {status} |\n",
                s.count, s.p50, s.p95, s.max
            ));
        }
        out
    }
}

fn summarize(values: impl Iterator<Item = f64>) -> PerfSummary {
    let mut v: Vec<f64> = values.filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return PerfSummary::default();
    }
    v.sort_by(f64::total_cmp);
    PerfSummary {
        count: v.len(),
        p50: percentile(&v, 50.0),
        p95: percentile(&v, 95.0),
        max: v[v.len() - 1],
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Builds a perf metadata map from string pairs.
#[must_use]
pub fn meta<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_drops_oldest() {
        let perf = PerfRecorder::new(3, SloConfig::default());
        for ms in [1.0, 2.0, 3.0, 4.0] {
            perf.record("filter", ms, BTreeMap::new());
        }
        assert_eq!(perf.len(), 3);
        let first = perf.samples().first().map(|s| s.ms);
        assert_eq!(first, Some(2.0));
    }

    #[test]
    fn percentiles_use_floor_index() {
        let perf = PerfRecorder::new(100, SloConfig::default());
        for ms in 1..=10 {
            perf.record("slice", f64::from(ms), BTreeMap::new());
        }
        let s = perf.summary("slice");
        assert_eq!(s.count, 10);
        assert_eq!(s.p50, 5.0);
        assert_eq!(s.p95, 9.0);
        assert_eq!(s.max, 10.0);
        assert_eq!(perf.summary("sort"), PerfSummary::default());
    }

    #[test]
    fn report_marks_slo_failures() {
        let slos = SloConfig {
            filter_ms: 10.0,
            ..SloConfig::default()
        };
        let perf = PerfRecorder::new(100, slos);
        perf.record("filter", 50.0, BTreeMap::new());
        perf.record("slice", 1.0, BTreeMap::new());
        let report = perf.baseline_report();
        assert!(report.starts_with("| Op | Count | p50 (ms) | p95 (ms) | Max (ms) | SLO p95 (ms) | Status |"));
        assert!(report.contains("| filter | 1 | 50.0 | 50.0 | 50.0 | 10.0 | FAIL |"));
        assert!(report.contains("| slice | 1 | 1.0 | 1.0 | 1.0 | 40.0 | PASS |"));
    }

    #[test]
    fn zero_slo_always_passes() {
        let slos = SloConfig {
            sort_ms: 0.0,
            ..SloConfig::default()
        };
        let perf = PerfRecorder::new(10, slos);
        perf.record("sort", 9_999.0, BTreeMap::new());
        assert!(perf.baseline_report().contains("| sort | 1 | 9999.0 | 9999.0 | 9999.0 | - | PASS |"));
    }
}
