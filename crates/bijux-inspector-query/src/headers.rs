// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_model::HeaderSniff;

use crate::parse::parse_date_relaxed;

const MAX_HEADER_CELL_LEN: usize = 64;

fn is_likely_header_cell(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() || t.len() > MAX_HEADER_CELL_LEN {
        return false;
    }
    if !t.chars().any(|c| c.is_ascii_alphabetic() || c == '_') {
        return false;
    }
    if t.replace([',', '_'], "").parse::<f64>().is_ok() {
        return false;
    }
    parse_date_relaxed(t).is_none()
}

fn header_score(cells: &[String]) -> f64 {
    let n = cells.len().max(1) as f64;
    cells.iter().filter(|c| is_likely_header_cell(c)).count() as f64 / n
}

/// Guesses whether `first` is a header row by comparing it with `second`.
///
/// Returns `decided = false` when the rows look alike and the caller should ask.
#[must_use]
pub fn header_heuristic(first: &[String], second: &[String]) -> HeaderSniff {
    if first.is_empty() {
        return HeaderSniff {
            decided: true,
            has_headers: true,
            reason: "Empty first record: defaulting to headers.".to_string(),
        };
    }
    let score1 = header_score(first);
    if second.is_empty() {
        return HeaderSniff {
            decided: true,
            has_headers: score1 >= 0.75,
            reason: format!("Single-row CSV: row1 header-likeness={score1:.2}"),
        };
    }
    let score2 = header_score(second);
    let diff = score1 - score2;
    let reason = format!("Header score row1={score1:.2}, row2={score2:.2}, diff={diff:.2}");
    if score1 >= 0.75 && diff >= 0.15 {
        return HeaderSniff {
            decided: true,
            has_headers: true,
            reason,
        };
    }
    if score1 <= 0.25 && diff <= -0.05 {
        return HeaderSniff {
            decided: true,
            has_headers: false,
            reason,
        };
    }
    HeaderSniff {
        decided: false,
        has_headers: true,
        reason,
    }
}
