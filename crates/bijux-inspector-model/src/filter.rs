// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Fuzzy,
    Exact,
    Regex,
}

impl MatchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy",
            Self::Exact => "exact",
            Self::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryScope {
    #[default]
    Current,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericFilter {
    pub enabled: bool,
    pub col_idx: usize,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    pub enabled: bool,
    pub col_idx: usize,
    pub min_iso: String,
    pub max_iso: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    pub enabled: bool,
    pub col_idx: usize,
    pub selected: Vec<String>,
}

/// One extra AND-ed query term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryClause {
    pub query: String,
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub target_col_idx: Option<usize>,
}

/// Validated, normalized backend filter request. Built fresh for every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub query: String,
    pub column_idx: Option<usize>,
    pub match_mode: MatchMode,
    #[serde(default)]
    pub clauses: Vec<QueryClause>,
    pub numeric_filter: Option<NumericFilter>,
    pub date_filter: Option<DateFilter>,
    pub category_filter: Option<CategoryFilter>,
    pub max_rows_scan: Option<usize>,
}

impl FilterSpec {
    /// True when the spec narrows nothing beyond the scan cap.
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.query.trim().is_empty()
            && self.clauses.is_empty()
            && self.numeric_filter.is_none()
            && self.date_filter.is_none()
            && self.category_filter.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NumericFilterInput {
    pub enabled: bool,
    pub col_idx: Option<usize>,
    pub min_text: String,
    pub max_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DateFilterInput {
    pub enabled: bool,
    pub col_idx: Option<usize>,
    pub min_iso: String,
    pub max_iso: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryFilterInput {
    pub enabled: bool,
    pub col_idx: Option<usize>,
    /// Insertion-ordered, duplicate-free.
    pub selected: Vec<String>,
}

impl CategoryFilterInput {
    /// Adds the value if absent, removes it otherwise.
    pub fn toggle(&mut self, value: &str) {
        if let Some(at) = self.selected.iter().position(|v| v == value) {
            self.selected.remove(at);
        } else {
            self.selected.push(value.to_string());
        }
    }
}

/// Raw, unvalidated filter inputs as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub query: String,
    pub match_mode: MatchMode,
    pub target_col_idx: Option<usize>,
    pub max_rows_scan_text: String,
    pub multi_query_enabled: bool,
    pub clauses: Vec<QueryClause>,
    #[serde(rename = "numericF")]
    pub numeric: NumericFilterInput,
    #[serde(rename = "dateF")]
    pub date: DateFilterInput,
    #[serde(rename = "catF")]
    pub category: CategoryFilterInput,
}

impl FilterState {
    /// Drops column references that no longer exist after a reload.
    pub fn clamp_columns(&mut self, header_count: usize) {
        if self.target_col_idx.is_some_and(|i| i >= header_count) {
            self.target_col_idx = None;
        }
        if self.numeric.col_idx.is_some_and(|i| i >= header_count) {
            self.numeric.enabled = false;
            self.numeric.col_idx = None;
        }
        if self.date.col_idx.is_some_and(|i| i >= header_count) {
            self.date.enabled = false;
            self.date.col_idx = None;
        }
        if self.category.col_idx.is_some_and(|i| i >= header_count) {
            self.category = CategoryFilterInput::default();
        }
    }

    /// A query, a non-default mode or a target column means the view is a filtered subset.
    #[must_use]
    pub fn narrows_view(&self) -> bool {
        !self.query.trim().is_empty()
            || self.match_mode != MatchMode::Fuzzy
            || self.target_col_idx.is_some()
    }
}
