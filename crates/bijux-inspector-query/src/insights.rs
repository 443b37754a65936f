// SPDX-License-Identifier: Apache-2.0

//! Derived hints over a profiled stat set.

use std::collections::HashMap;

use bijux_inspector_model::{
    ColType, DriftEntry, OutlierHint, RelationshipHint, SchemaColumnStat, SchemaInsights,
    SuggestedColumn, SuggestionKind,
};

pub const DRIFT_THRESHOLD: f64 = 0.15;
pub const DRIFT_TOP_N: usize = 10;
pub const OUTLIER_THRESHOLD: f64 = 2.2;
pub const RELATIONSHIP_THRESHOLD: f64 = 0.86;
const SUGGEST_MIN_NON_EMPTY: usize = 25;
const SUGGEST_MAX_EMPTY_PCT: f64 = 60.0;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn score_mid(x: f64, mid: f64, width: f64) -> f64 {
    (1.0 - (x - mid).abs() / width.max(1e-6)).clamp(0.0, 1.0)
}

fn by_score_desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}

/// Columns whose empty share, cardinality or type moved since `baseline`.
///
/// `drift = 0.35·|Δempty%|/100 + 0.45·|ΔdistinctRatio| + 0.2·(type changed ? 0.5 : 0)`,
/// kept when ≥ 0.15, top 10 by drift.
#[must_use]
pub fn compute_drift(current: &[SchemaColumnStat], baseline: &[SchemaColumnStat]) -> Vec<DriftEntry> {
    if current.is_empty() || baseline.is_empty() {
        return Vec::new();
    }
    let base: HashMap<usize, &SchemaColumnStat> = baseline.iter().map(|s| (s.idx, s)).collect();
    let mut out: Vec<DriftEntry> = current
        .iter()
        .filter_map(|s| {
            let b = base.get(&s.idx)?;
            let d_empty = (s.empty_pct - b.empty_pct).abs() / 100.0;
            let d_distinct = (s.distinct_ratio - b.distinct_ratio).abs();
            let d_type = if s.col_type == b.col_type { 0.0 } else { 0.5 };
            let drift = (d_empty * 0.35 + d_distinct * 0.45 + d_type * 0.2).clamp(0.0, 1.0);
            (drift >= DRIFT_THRESHOLD).then(|| DriftEntry {
                idx: s.idx,
                name: s.name.clone(),
                drift: round2(drift),
                reason: format!(
                    "empty {:.1}%→{:.1}%, distinct {:.2}→{:.2}",
                    b.empty_pct, s.empty_pct, b.distinct_ratio, s.distinct_ratio
                ),
            })
        })
        .collect();
    out.sort_by(|a, b| by_score_desc(a.drift, b.drift));
    out.truncate(DRIFT_TOP_N);
    out
}

#[must_use]
pub fn suggest_columns(stats: &[SchemaColumnStat]) -> Vec<SuggestedColumn> {
    let mut out = Vec::new();
    for s in stats {
        if s.non_empty < SUGGEST_MIN_NON_EMPTY || s.empty_pct > SUGGEST_MAX_EMPTY_PCT {
            continue;
        }
        let filled = 1.0 - s.empty_pct / 100.0;
        if s.distinct_ratio >= 0.9 && s.entropy_norm >= 0.9 {
            out.push(SuggestedColumn {
                idx: s.idx,
                name: s.name.clone(),
                kind: SuggestionKind::Identifier,
                score: filled * s.distinct_ratio,
                reason: format!("High uniqueness ({:.0}% distinct)", s.distinct_ratio * 100.0),
            });
            continue;
        }
        if (2..=30).contains(&s.distinct_sample) && s.distinct_ratio <= 0.35 {
            let skew = score_mid(s.entropy_norm, 0.7, 0.5);
            out.push(SuggestedColumn {
                idx: s.idx,
                name: s.name.clone(),
                kind: SuggestionKind::Categorical,
                score: filled * (1.0 - s.distinct_ratio) * skew * (1.0 + s.distinct_sample as f64).ln(),
                reason: format!(
                    "Low card ({}) • entropy {:.0}%",
                    s.distinct_sample,
                    s.entropy_norm * 100.0
                ),
            });
        }
        if s.numeric_parse_rate >= 0.95 {
            out.push(SuggestedColumn {
                idx: s.idx,
                name: s.name.clone(),
                kind: SuggestionKind::Numeric,
                score: filled * s.numeric_parse_rate * score_mid(s.distinct_ratio, 0.6, 0.5),
                reason: format!("Numeric parse {:.0}%", s.numeric_parse_rate * 100.0),
            });
        }
        if s.date_parse_rate >= 0.9 {
            out.push(SuggestedColumn {
                idx: s.idx,
                name: s.name.clone(),
                kind: SuggestionKind::Date,
                score: filled * s.date_parse_rate,
                reason: format!("Date parse {:.0}%", s.date_parse_rate * 100.0),
            });
        }
    }

    let mut picked = Vec::new();
    for (kind, n) in [
        (SuggestionKind::Categorical, 8),
        (SuggestionKind::Numeric, 6),
        (SuggestionKind::Date, 6),
        (SuggestionKind::Identifier, 6),
    ] {
        let mut of_kind: Vec<SuggestedColumn> =
            out.iter().filter(|x| x.kind == kind).cloned().collect();
        of_kind.sort_by(|a, b| by_score_desc(a.score, b.score));
        of_kind.truncate(n);
        picked.extend(of_kind);
    }
    picked
}

#[must_use]
pub fn outlier_hints(stats: &[SchemaColumnStat]) -> Vec<OutlierHint> {
    let mut out: Vec<OutlierHint> = stats
        .iter()
        .filter(|s| s.col_type == ColType::Numeric)
        .filter_map(|s| {
            let z = ((s.distinct_ratio * 0.8 + s.entropy_norm * 0.4 + s.numeric_parse_rate * 0.3)
                * 3.2)
                .clamp(0.0, 5.0);
            (z >= OUTLIER_THRESHOLD).then(|| OutlierHint {
                idx: s.idx,
                name: s.name.clone(),
                z_hint: round2(z),
                reason: format!(
                    "High spread signature (distinct {:.0}%, entropy {:.0}%).",
                    s.distinct_ratio * 100.0,
                    s.entropy_norm * 100.0
                ),
            })
        })
        .collect();
    out.sort_by(|a, b| by_score_desc(a.z_hint, b.z_hint));
    out.truncate(8);
    out
}

#[must_use]
pub fn relationship_hints(stats: &[SchemaColumnStat]) -> Vec<RelationshipHint> {
    let mut out = Vec::new();
    for (i, a) in stats.iter().enumerate() {
        for b in &stats[i + 1..] {
            if a.col_type != b.col_type {
                continue;
            }
            let card = 1.0 - (a.distinct_ratio - b.distinct_ratio).abs();
            let empty = 1.0 - (a.empty_pct - b.empty_pct).abs() / 100.0;
            let score = (card * 0.7 + empty * 0.3).clamp(0.0, 1.0);
            if score < RELATIONSHIP_THRESHOLD {
                continue;
            }
            out.push(RelationshipHint {
                left_idx: a.idx,
                right_idx: b.idx,
                left: a.name.clone(),
                right: b.name.clone(),
                score: round2(score),
                reason: format!("{} ↔ {} show similar cardinality/completeness.", a.name, b.name),
            });
        }
    }
    out.sort_by(|x, y| by_score_desc(x.score, y.score));
    out.truncate(8);
    out
}

#[must_use]
pub fn schema_insights(
    stats: &[SchemaColumnStat],
    baseline: Option<&[SchemaColumnStat]>,
) -> SchemaInsights {
    SchemaInsights {
        suggested: suggest_columns(stats),
        outliers: outlier_hints(stats),
        relationships: relationship_hints(stats),
        drift: baseline.map(|b| compute_drift(stats, b)).unwrap_or_default(),
    }
}
