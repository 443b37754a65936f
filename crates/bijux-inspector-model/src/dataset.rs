// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const DATASET_ID_MAX_LEN: usize = 64;

/// Registry key of a loaded dataset, always `ds_` followed by lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        let Some(rest) = s.strip_prefix(bijux_inspector_core::identity::DATASET_ID_PREFIX) else {
            return Err(ValidationError("dataset id must start with ds_".to_string()));
        };
        if rest.is_empty() {
            return Err(ValidationError("dataset id hash must not be empty".to_string()));
        }
        if s.len() > DATASET_ID_MAX_LEN {
            return Err(ValidationError(format!(
                "dataset id exceeds max length {DATASET_ID_MAX_LEN}"
            )));
        }
        if !rest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
            return Err(ValidationError(
                "dataset id hash must be lowercase hex".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Derives the id from the load identity inputs.
    #[must_use]
    pub fn derive(source: &DatasetSource, headers: &[String], row_count: usize) -> Self {
        Self(bijux_inspector_core::identity::dataset_id_for(
            &source.source_key(),
            headers,
            row_count,
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DatasetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColType {
    Numeric,
    Date,
    #[default]
    String,
}

impl ColType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DatasetSource {
    Text { text: String },
    Path { path: String },
}

impl DatasetSource {
    #[must_use]
    pub fn source_key(&self) -> String {
        match self {
            Self::Text { text } => bijux_inspector_core::identity::text_source_key(text),
            Self::Path { path } => bijux_inspector_core::identity::path_source_key(path),
        }
    }

    /// Default display label: the file name for paths, the source key otherwise.
    #[must_use]
    pub fn default_label(&self) -> String {
        match self {
            Self::Path { path } => std::path::Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| bijux_inspector_core::identity::label_for(&self.source_key())),
            Self::Text { .. } => bijux_inspector_core::identity::label_for(&self.source_key()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Path { .. } => "path",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    Yes,
    No,
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: DatasetId,
    pub label: String,
    pub has_headers: bool,
    pub headers: Vec<String>,
    pub col_types: Vec<ColType>,
    pub row_count: usize,
    pub source: DatasetSource,
}
