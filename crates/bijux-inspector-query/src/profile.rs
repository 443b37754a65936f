// SPDX-License-Identifier: Apache-2.0

//! Per-column statistics over a row sample.

use std::collections::HashMap;

use bijux_inspector_model::{
    ColType, FilterState, SampleTier, SchemaColumnStat, SchemaScope, TopValue,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::{format_date, parse_date_relaxed, parse_f64_relaxed};

/// Once a column has this many distinct values, new ones are no longer tracked.
pub const DISTINCT_CAP: usize = 200;
pub const TOP_SAMPLE_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTiers {
    pub fast: usize,
    pub balanced: usize,
    pub full: usize,
}

impl Default for SampleTiers {
    fn default() -> Self {
        Self {
            fast: 800,
            balanced: 2_000,
            full: 10_000,
        }
    }
}

impl SampleTiers {
    #[must_use]
    pub const fn size_for(&self, tier: SampleTier) -> usize {
        match tier {
            SampleTier::Fast => self.fast,
            SampleTier::Balanced => self.balanced,
            SampleTier::Full => self.full,
        }
    }
}

/// Sample size for a profiling request: an explicit positive override or the
/// tier size, capped by the filtered count (or the total when nothing is filtered yet).
#[must_use]
pub fn sample_size_for(
    tiers: &SampleTiers,
    tier: SampleTier,
    explicit: Option<usize>,
    filtered_count: usize,
    total_rows: usize,
) -> usize {
    let wanted = explicit
        .filter(|n| *n > 0)
        .unwrap_or_else(|| tiers.size_for(tier));
    let cap = if filtered_count > 0 {
        filtered_count
    } else {
        total_rows
    };
    wanted.min(cap)
}

#[must_use]
pub fn schema_scope(filters: &FilterState) -> SchemaScope {
    if filters.narrows_view() {
        SchemaScope::Filtered
    } else {
        SchemaScope::Full
    }
}

#[derive(Default)]
struct ColumnAccumulator {
    empty: usize,
    non_empty: usize,
    numeric_ok: usize,
    date_ok: usize,
    distinct_index: HashMap<String, usize>,
    distinct: Vec<(String, usize)>,
    num_min: Option<f64>,
    num_max: Option<f64>,
    date_min: Option<NaiveDate>,
    date_max: Option<NaiveDate>,
}

impl ColumnAccumulator {
    fn observe(&mut self, raw: &str, col_type: ColType) {
        let v = raw.trim();
        if v.is_empty() {
            self.empty += 1;
            return;
        }
        self.non_empty += 1;
        if let Some(&at) = self.distinct_index.get(v) {
            self.distinct[at].1 += 1;
        } else if self.distinct.len() < DISTINCT_CAP {
            self.distinct_index.insert(v.to_string(), self.distinct.len());
            self.distinct.push((v.to_string(), 1));
        }

        let num = parse_f64_relaxed(v);
        let date = parse_date_relaxed(v);
        if num.is_some() {
            self.numeric_ok += 1;
        }
        if date.is_some() {
            self.date_ok += 1;
        }
        match (col_type, num, date) {
            (ColType::Numeric, Some(n), _) => {
                self.num_min = Some(self.num_min.map_or(n, |m| m.min(n)));
                self.num_max = Some(self.num_max.map_or(n, |m| m.max(n)));
            }
            (ColType::Date, _, Some(d)) => {
                self.date_min = Some(self.date_min.map_or(d, |m| m.min(d)));
                self.date_max = Some(self.date_max.map_or(d, |m| m.max(d)));
            }
            _ => {}
        }
    }

    fn entropy_norm(&self) -> f64 {
        if self.distinct.len() <= 1 {
            return 0.0;
        }
        let denom = self.non_empty.max(1) as f64;
        let h: f64 = self
            .distinct
            .iter()
            .map(|(_, n)| *n as f64 / denom)
            .filter(|p| *p > 0.0)
            .map(|p| -p * p.ln())
            .sum();
        let h_max = (self.distinct.len() as f64).ln();
        if h_max > 0.0 {
            h / h_max
        } else {
            0.0
        }
    }

    fn finish(self, idx: usize, name: String, col_type: ColType) -> SchemaColumnStat {
        let total = self.empty + self.non_empty;
        let ratio = |n: usize| {
            if self.non_empty == 0 {
                0.0
            } else {
                n as f64 / self.non_empty as f64
            }
        };
        let numeric_parse_rate = ratio(self.numeric_ok);
        let date_parse_rate = ratio(self.date_ok);
        let distinct_ratio = ratio(self.distinct.len());
        let type_confidence = match col_type {
            ColType::Numeric => numeric_parse_rate,
            ColType::Date => date_parse_rate,
            ColType::String => 1.0 - numeric_parse_rate.max(date_parse_rate),
        };
        let entropy_norm = self.entropy_norm();

        let mut ranked: Vec<&(String, usize)> = self.distinct.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top_sample = ranked
            .into_iter()
            .take(TOP_SAMPLE_LEN)
            .map(|(value, count)| TopValue {
                value: value.clone(),
                count: *count,
            })
            .collect();

        let (min, max) = match col_type {
            ColType::Numeric => (
                self.num_min.map(|v| v.to_string()),
                self.num_max.map(|v| v.to_string()),
            ),
            ColType::Date => (self.date_min.map(format_date), self.date_max.map(format_date)),
            ColType::String => (None, None),
        };

        SchemaColumnStat {
            idx,
            name,
            col_type,
            empty: self.empty,
            non_empty: self.non_empty,
            empty_pct: if total == 0 {
                0.0
            } else {
                self.empty as f64 / total as f64 * 100.0
            },
            type_confidence: type_confidence.clamp(0.0, 1.0),
            numeric_parse_rate: numeric_parse_rate.clamp(0.0, 1.0),
            date_parse_rate: date_parse_rate.clamp(0.0, 1.0),
            distinct_sample: self.distinct.len(),
            distinct_ratio: distinct_ratio.clamp(0.0, 1.0),
            entropy_norm: entropy_norm.clamp(0.0, 1.0),
            top_sample,
            min,
            max,
        }
    }
}

/// Profiles every header column over `rows`. Short rows count as empty cells.
#[must_use]
pub fn profile_schema_from_rows(
    rows: &[Vec<String>],
    headers: &[String],
    col_types: &[ColType],
) -> Vec<SchemaColumnStat> {
    let mut acc: Vec<ColumnAccumulator> = (0..headers.len())
        .map(|_| ColumnAccumulator::default())
        .collect();
    for row in rows {
        for (c, column) in acc.iter_mut().enumerate() {
            let cell = row.get(c).map_or("", String::as_str);
            column.observe(cell, col_types.get(c).copied().unwrap_or_default());
        }
    }
    acc.into_iter()
        .enumerate()
        .map(|(c, column)| {
            let col_type = col_types.get(c).copied().unwrap_or_default();
            column.finish(c, headers[c].clone(), col_type)
        })
        .collect()
}
