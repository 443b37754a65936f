// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{MatchMode, QueryClause};
use crate::filter::{CategoryFilterInput, DateFilterInput, NumericFilterInput};

pub const CAPTURED_STATE_VERSION: u32 = 3;
pub const MAX_SORT_LEVELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortLevel {
    pub col_idx: usize,
    pub dir: SortDir,
}

/// Grid column arrangement; indices refer to the active header list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnLayout {
    pub visible_columns: Vec<usize>,
    pub pinned_left: Vec<usize>,
    pub pinned_right: Vec<usize>,
    pub hidden_columns: Vec<usize>,
    pub column_widths: BTreeMap<usize, u32>,
}

impl ColumnLayout {
    /// Drops out-of-range indices and keeps pinned-right disjoint from pinned-left.
    pub fn retain_valid(&mut self, header_count: usize) {
        let in_range = |i: &usize| *i < header_count;
        self.visible_columns.retain(in_range);
        self.visible_columns.sort_unstable();
        self.visible_columns.dedup();
        self.pinned_left.retain(in_range);
        let left = self.pinned_left.clone();
        self.pinned_right.retain(|i| in_range(i) && !left.contains(i));
        self.hidden_columns.retain(in_range);
        self.column_widths.retain(|i, _| in_range(i));
    }
}

/// Serializable snapshot handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub target_col_idx: Option<usize>,
    #[serde(default)]
    pub max_rows_scan_text: String,
    #[serde(default)]
    pub multi_query_enabled: bool,
    #[serde(default)]
    pub multi_query_clauses: Vec<QueryClause>,
    #[serde(default, rename = "numericF")]
    pub numeric: NumericFilterInput,
    #[serde(default, rename = "dateF")]
    pub date: DateFilterInput,
    #[serde(default, rename = "catF")]
    pub category: CategoryFilterInput,
    #[serde(default)]
    pub sort_col_idx: Option<usize>,
    #[serde(default)]
    pub sort_dir: SortDir,
    #[serde(default)]
    pub sort_specs: Vec<SortLevel>,
    #[serde(default)]
    pub layout: ColumnLayout,
}

impl CapturedState {
    /// Brings an older snapshot up to the current version.
    ///
    /// Pre-v3 snapshots carry only `sortColIdx`/`sortDir`; those become the
    /// single sort level. Sort levels are capped at four.
    #[must_use]
    pub fn migrate(mut self) -> Self {
        if self.version < CAPTURED_STATE_VERSION {
            if self.sort_specs.is_empty() {
                if let Some(col_idx) = self.sort_col_idx {
                    self.sort_specs.push(SortLevel {
                        col_idx,
                        dir: self.sort_dir,
                    });
                }
            }
            self.version = CAPTURED_STATE_VERSION;
        }
        self.sort_specs.truncate(MAX_SORT_LEVELS);
        self.multi_query_clauses
            .retain(|c| !c.query.trim().is_empty());
        self
    }
}
