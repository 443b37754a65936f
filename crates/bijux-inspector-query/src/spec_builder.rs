// SPDX-License-Identifier: Apache-2.0

//! Raw filter inputs to a validated [`FilterSpec`].
//!
//! Validation order is fixed: multi-query clauses, the main regex, numeric
//! bounds, date bounds. The first failure wins and no spec is produced, so a
//! partially valid filter can never reach the backend.

use bijux_inspector_model::{
    CategoryFilter, DateFilter, FilterSpec, FilterState, MatchMode, NumericFilter, QueryClause,
};
use regex::Regex;

use crate::parse::parse_max_rows_scan;

pub const NUMERIC_UNBOUNDED_MIN: f64 = -1e308;
pub const NUMERIC_UNBOUNDED_MAX: f64 = 1e308;
pub const DATE_UNBOUNDED_MIN: &str = "1900-01-01";
pub const DATE_UNBOUNDED_MAX: &str = "3000-01-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpecField {
    Query,
    Numeric,
    Date,
}

impl SpecField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Numeric => "numeric",
            Self::Date => "date",
        }
    }
}

/// Field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecError {
    pub field: SpecField,
    pub message: String,
}

impl SpecError {
    #[must_use]
    pub fn new(field: SpecField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

impl std::error::Error for SpecError {}

pub fn build_filter_spec(state: &FilterState) -> Result<FilterSpec, SpecError> {
    let clauses = active_clauses(state);
    for clause in clauses.iter().filter(|c| c.mode == MatchMode::Regex) {
        validate_regex(&clause.query)
            .map_err(|e| SpecError::new(SpecField::Query, format!("Multi-query regex invalid: {e}")))?;
    }

    if state.match_mode == MatchMode::Regex && !state.query.trim().is_empty() {
        validate_regex(&state.query).map_err(|e| SpecError::new(SpecField::Query, e))?;
    }

    let numeric_filter = build_numeric(state)?;
    let date_filter = build_date(state)?;
    let category_filter = match (state.category.enabled, state.category.col_idx) {
        (true, Some(col_idx)) => Some(CategoryFilter {
            enabled: true,
            col_idx,
            selected: state.category.selected.clone(),
        }),
        _ => None,
    };

    Ok(FilterSpec {
        query: state.query.clone(),
        column_idx: state.target_col_idx,
        match_mode: state.match_mode,
        clauses,
        numeric_filter,
        date_filter,
        category_filter,
        max_rows_scan: parse_max_rows_scan(&state.max_rows_scan_text),
    })
}

fn active_clauses(state: &FilterState) -> Vec<QueryClause> {
    if !state.multi_query_enabled {
        return Vec::new();
    }
    state
        .clauses
        .iter()
        .map(|c| QueryClause {
            query: c.query.trim().to_string(),
            ..c.clone()
        })
        .filter(|c| !c.query.is_empty())
        .collect()
}

/// Compiles a query or clause pattern exactly as the engine matches it:
/// case-sensitive, unanchored.
pub fn compile_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

fn validate_regex(pattern: &str) -> Result<(), String> {
    compile_match_regex(pattern).map(|_| ()).map_err(|e| e.to_string())
}

fn build_numeric(state: &FilterState) -> Result<Option<NumericFilter>, SpecError> {
    let input = &state.numeric;
    let Some(col_idx) = input.col_idx.filter(|_| input.enabled) else {
        return Ok(None);
    };
    let min = parse_bound(&input.min_text, NUMERIC_UNBOUNDED_MIN);
    let max = parse_bound(&input.max_text, NUMERIC_UNBOUNDED_MAX);
    let (Some(min), Some(max)) = (min, max) else {
        return Err(SpecError::new(
            SpecField::Numeric,
            "Numeric bounds must be valid numbers.",
        ));
    };
    if min > max {
        return Err(SpecError::new(SpecField::Numeric, "Min must be ≤ Max."));
    }
    Ok(Some(NumericFilter {
        enabled: true,
        col_idx,
        min,
        max,
    }))
}

fn parse_bound(text: &str, blank: f64) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return Some(blank);
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn build_date(state: &FilterState) -> Result<Option<DateFilter>, SpecError> {
    let input = &state.date;
    let Some(col_idx) = input.col_idx.filter(|_| input.enabled) else {
        return Ok(None);
    };
    let min_iso = input.min_iso.trim();
    let max_iso = input.max_iso.trim();
    if !min_iso.is_empty() && !is_iso_date_shape(min_iso) {
        return Err(SpecError::new(SpecField::Date, "Min date must be YYYY-MM-DD."));
    }
    if !max_iso.is_empty() && !is_iso_date_shape(max_iso) {
        return Err(SpecError::new(SpecField::Date, "Max date must be YYYY-MM-DD."));
    }
    if !min_iso.is_empty() && !max_iso.is_empty() && min_iso > max_iso {
        return Err(SpecError::new(SpecField::Date, "Min date must be ≤ Max date."));
    }
    Ok(Some(DateFilter {
        enabled: true,
        col_idx,
        min_iso: if min_iso.is_empty() { DATE_UNBOUNDED_MIN } else { min_iso }.to_string(),
        max_iso: if max_iso.is_empty() { DATE_UNBOUNDED_MAX } else { max_iso }.to_string(),
    }))
}

/// `^\d{4}-\d{2}-\d{2}$`
fn is_iso_date_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}
