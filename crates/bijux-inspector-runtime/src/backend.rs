// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use bijux_inspector_model::{
    CategoryValuesRequest, CategoryValuesResponse, DatasetSource, ExplainRowResponse, FilterSpec,
    HeaderSniff, KeyValue, LoadResult, MultiQueryRequest, MultiQueryResponse, SortSpec,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum BackendErrorCode {
    NotFound,
    InvalidRequest,
    Parse,
    Io,
    Internal,
}

/// A rejected backend command. `Display` shows only the message, which is
/// what the view stores as the operation-scoped error string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    pub code: BackendErrorCode,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::NotFound, message)
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::InvalidRequest, message)
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

/// Async command surface of the data engine behind the pipeline.
///
/// Row-addressing commands (`get_row_slice`, `get_full_row_metadata`,
/// `explain_row`) use visual indices into the current filtered and sorted view.
#[async_trait]
pub trait InspectorBackend: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    async fn load_csv(
        &self,
        source: &DatasetSource,
        has_headers: bool,
    ) -> Result<LoadResult, BackendError>;

    async fn sniff_has_headers(&self, path: &str) -> Result<HeaderSniff, BackendError>;

    /// Replaces the current view with the rows `spec` selects; returns the count.
    async fn apply_filter(&self, spec: &FilterSpec) -> Result<usize, BackendError>;

    /// Rows `[start, end)` of the view. With `cols`, each row holds only those
    /// cells, in `cols` order.
    async fn get_row_slice(
        &self,
        start: usize,
        end: usize,
        cols: Option<&[usize]>,
    ) -> Result<Vec<Vec<String>>, BackendError>;

    async fn sort(&self, spec: &SortSpec) -> Result<(), BackendError>;

    async fn get_category_values(
        &self,
        req: &CategoryValuesRequest,
    ) -> Result<CategoryValuesResponse, BackendError>;

    async fn get_full_row_metadata(&self, visual_idx: usize) -> Result<Vec<KeyValue>, BackendError>;

    async fn explain_row(&self, visual_idx: usize) -> Result<ExplainRowResponse, BackendError>;

    async fn query_multiple_csv(
        &self,
        req: &MultiQueryRequest,
    ) -> Result<MultiQueryResponse, BackendError>;
}
