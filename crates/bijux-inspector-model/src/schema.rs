// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::ColType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaColumnStat {
    pub idx: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: ColType,
    pub empty: usize,
    pub non_empty: usize,
    pub empty_pct: f64,
    pub type_confidence: f64,
    pub numeric_parse_rate: f64,
    pub date_parse_rate: f64,
    pub distinct_sample: usize,
    pub distinct_ratio: f64,
    pub entropy_norm: f64,
    pub top_sample: Vec<TopValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampleTier {
    Fast,
    #[default]
    Balanced,
    Full,
}

impl SampleTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Full => "full",
        }
    }

    pub fn parse(input: &str) -> Result<Self, crate::ValidationError> {
        match input.trim() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "full" => Ok(Self::Full),
            other => Err(crate::ValidationError(format!(
                "unknown sample tier `{other}` (expected fast|balanced|full)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaScope {
    Full,
    Filtered,
}

impl SchemaScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Filtered => "filtered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftEntry {
    pub idx: usize,
    pub name: String,
    pub drift: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Identifier,
    Categorical,
    Numeric,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedColumn {
    pub idx: usize,
    pub name: String,
    pub kind: SuggestionKind,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierHint {
    pub idx: usize,
    pub name: String,
    pub z_hint: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipHint {
    pub left_idx: usize,
    pub right_idx: usize,
    pub left: String,
    pub right: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaInsights {
    pub suggested: Vec<SuggestedColumn>,
    pub outliers: Vec<OutlierHint>,
    pub relationships: Vec<RelationshipHint>,
    pub drift: Vec<DriftEntry>,
}
