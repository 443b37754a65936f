// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use bijux_inspector_model::{FilterSpec, MatchMode};
use bijux_inspector_query::{compile_match_regex, parse_date_relaxed, parse_f64_relaxed};
use chrono::NaiveDate;
use regex::Regex;

use super::load::Table;
use crate::backend::BackendError;

pub const MAX_REGEX_LEN: usize = 256;

struct Matcher {
    needle: String,
    needle_lower: String,
    mode: MatchMode,
    target: Option<usize>,
    regex: Option<Regex>,
}

impl Matcher {
    fn compile(query: &str, mode: MatchMode, target: Option<usize>) -> Result<Option<Self>, BackendError> {
        if mode == MatchMode::Regex && query.len() > MAX_REGEX_LEN {
            return Err(BackendError::invalid(format!(
                "Regex pattern too long (max {MAX_REGEX_LEN} chars)"
            )));
        }
        let needle = query.trim().to_string();
        if needle.is_empty() {
            return Ok(None);
        }
        let regex = if mode == MatchMode::Regex {
            Some(compile_match_regex(query).map_err(|e| BackendError::invalid(format!("Invalid regex: {e}")))?)
        } else {
            None
        };
        Ok(Some(Self {
            needle_lower: needle.to_lowercase(),
            needle,
            mode,
            target,
            regex,
        }))
    }

    fn cell_matches(&self, cell: &str) -> bool {
        match self.mode {
            MatchMode::Exact => cell.eq_ignore_ascii_case(&self.needle),
            MatchMode::Fuzzy => cell.to_lowercase().contains(&self.needle_lower),
            MatchMode::Regex => self.regex.as_ref().is_some_and(|re| re.is_match(cell)),
        }
    }

    /// `None` when the target column does not exist.
    fn row_matches(&self, table: &Table, row: usize) -> Option<bool> {
        match self.target {
            Some(c) if c >= table.columns.len() => None,
            Some(c) => Some(self.cell_matches(table.cell(c, row))),
            None => Some((0..table.columns.len()).any(|c| self.cell_matches(table.cell(c, row)))),
        }
    }
}

struct NumericRange {
    col: usize,
    min: f64,
    max: f64,
}

struct DateRange {
    col: usize,
    min: NaiveDate,
    max: NaiveDate,
}

struct CategorySet {
    col: usize,
    selected: HashSet<String>,
}

/// A filter spec compiled once per pass and evaluated per row.
pub struct CompiledFilter {
    query: Option<Matcher>,
    clauses: Vec<Matcher>,
    numeric: Option<NumericRange>,
    date: Option<DateRange>,
    category: Option<CategorySet>,
    max_rows_scan: Option<usize>,
}

fn unbounded_date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl CompiledFilter {
    pub fn compile(spec: &FilterSpec) -> Result<Self, BackendError> {
        let query = Matcher::compile(&spec.query, spec.match_mode, spec.column_idx)?;
        let mut clauses = Vec::with_capacity(spec.clauses.len());
        for clause in &spec.clauses {
            if let Some(m) = Matcher::compile(&clause.query, clause.mode, clause.target_col_idx)? {
                clauses.push(m);
            }
        }
        let numeric = spec
            .numeric_filter
            .as_ref()
            .filter(|f| f.enabled)
            .map(|f| NumericRange {
                col: f.col_idx,
                min: f.min,
                max: f.max,
            });
        let date = spec.date_filter.as_ref().filter(|f| f.enabled).map(|f| DateRange {
            col: f.col_idx,
            min: parse_date_relaxed(&f.min_iso).unwrap_or_else(|| unbounded_date(1900)),
            max: parse_date_relaxed(&f.max_iso).unwrap_or_else(|| unbounded_date(3000)),
        });
        let category = spec
            .category_filter
            .as_ref()
            .filter(|f| f.enabled && !f.selected.is_empty())
            .map(|f| CategorySet {
                col: f.col_idx,
                selected: f.selected.iter().cloned().collect(),
            });
        Ok(Self {
            query,
            clauses,
            numeric,
            date,
            category,
            max_rows_scan: spec.max_rows_scan,
        })
    }

    fn is_passthrough(&self) -> bool {
        self.query.is_none()
            && self.clauses.is_empty()
            && self.numeric.is_none()
            && self.date.is_none()
            && self.category.is_none()
    }

    fn matches(&self, table: &Table, row: usize) -> bool {
        if let Some(f) = &self.numeric {
            let ok = f.col < table.columns.len()
                && parse_f64_relaxed(table.cell(f.col, row).trim())
                    .is_some_and(|v| v >= f.min && v <= f.max);
            if !ok {
                return false;
            }
        }
        if let Some(f) = &self.date {
            let ok = f.col < table.columns.len()
                && parse_date_relaxed(table.cell(f.col, row).trim())
                    .is_some_and(|d| d >= f.min && d <= f.max);
            if !ok {
                return false;
            }
        }
        if let Some(f) = &self.category {
            if f.col < table.columns.len() && !f.selected.contains(table.cell(f.col, row).trim()) {
                return false;
            }
        }
        let query_ok = self
            .query
            .as_ref()
            .map_or(true, |m| m.row_matches(table, row).unwrap_or(false));
        query_ok
            && self
                .clauses
                .iter()
                .all(|m| m.row_matches(table, row).unwrap_or(false))
    }

    /// Source row indices selected by the filter, in source order.
    #[must_use]
    pub fn select(&self, table: &Table) -> Vec<usize> {
        let scan_n = self
            .max_rows_scan
            .map_or(table.row_count, |cap| cap.min(table.row_count));
        if self.is_passthrough() {
            return (0..scan_n).collect();
        }
        (0..scan_n).filter(|r| self.matches(table, *r)).collect()
    }

    /// Re-evaluates every active part against one row with a readable reason each.
    #[must_use]
    pub fn explain(&self, table: &Table, row: usize) -> (bool, Vec<String>) {
        let mut passes = true;
        let mut reasons = Vec::new();
        let ncols = table.columns.len();

        if let Some(f) = &self.numeric {
            if f.col >= ncols {
                passes = false;
                reasons.push("Numeric filter target is out of range.".to_string());
            } else {
                match parse_f64_relaxed(table.cell(f.col, row).trim()) {
                    Some(v) if v >= f.min && v <= f.max => {
                        reasons.push(format!("Numeric pass: {v} in [{}, {}].", f.min, f.max));
                    }
                    Some(v) => {
                        passes = false;
                        reasons.push(format!("Numeric fail: {v} outside [{}, {}].", f.min, f.max));
                    }
                    None => {
                        passes = false;
                        reasons.push("Numeric fail: value is not parseable as number.".to_string());
                    }
                }
            }
        }

        if let Some(f) = &self.date {
            if f.col >= ncols {
                passes = false;
                reasons.push("Date filter target is out of range.".to_string());
            } else {
                match parse_date_relaxed(table.cell(f.col, row).trim()) {
                    Some(d) if d >= f.min && d <= f.max => {
                        reasons.push(format!("Date pass: {d} in [{}, {}].", f.min, f.max));
                    }
                    Some(d) => {
                        passes = false;
                        reasons.push(format!("Date fail: {d} outside [{}, {}].", f.min, f.max));
                    }
                    None => {
                        passes = false;
                        reasons.push("Date fail: value is not a parseable date.".to_string());
                    }
                }
            }
        }

        if let Some(f) = &self.category {
            if f.col >= ncols {
                passes = false;
                reasons.push("Category filter target is out of range.".to_string());
            } else if f.selected.contains(table.cell(f.col, row).trim()) {
                reasons.push("Category pass: value is in selected set.".to_string());
            } else {
                passes = false;
                reasons.push("Category fail: value is not in selected set.".to_string());
            }
        }

        match &self.query {
            None => reasons.push("Query skipped: empty query.".to_string()),
            Some(m) => match m.row_matches(table, row) {
                None => {
                    passes = false;
                    reasons.push("Query filter target is out of range.".to_string());
                }
                Some(true) => reasons.push("Query pass.".to_string()),
                Some(false) => {
                    passes = false;
                    reasons.push("Query fail: no matching cell.".to_string());
                }
            },
        }

        for (i, m) in self.clauses.iter().enumerate() {
            if m.row_matches(table, row).unwrap_or(false) {
                reasons.push(format!("Clause {} pass: {}", i + 1, m.needle));
            } else {
                passes = false;
                reasons.push(format!("Clause {} fail: {}", i + 1, m.needle));
            }
        }

        (passes, reasons)
    }
}
