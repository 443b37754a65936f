// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Inspector model SSOT.
//!
//! Every type that crosses the backend command boundary or the persisted
//! snapshot boundary lives here with its serde shape pinned to camelCase.

mod dataset;
mod filter;
mod schema;
mod state;
mod wire;

pub use dataset::{
    ColType, Dataset, DatasetId, DatasetSource, HeaderMode, ValidationError, DATASET_ID_MAX_LEN,
};
pub use filter::{
    CategoryFilter, CategoryFilterInput, DateFilter, DateFilterInput, FilterSpec, FilterState,
    MatchMode, NumericFilter, NumericFilterInput, QueryClause, QueryScope,
};
pub use schema::{
    DriftEntry, OutlierHint, RelationshipHint, SampleTier, SchemaColumnStat, SchemaInsights,
    SchemaScope, SuggestedColumn, SuggestionKind, TopValue,
};
pub use state::{CapturedState, ColumnLayout, SortDir, SortLevel, CAPTURED_STATE_VERSION, MAX_SORT_LEVELS};
pub use wire::{
    CategoryValueCount, CategoryValuesRequest, CategoryValuesResponse, DatasetQueryInput,
    DatasetQueryResult, ExplainRowResponse, HeaderSniff, KeyValue, LoadResult, MultiQueryRequest,
    MultiQueryResponse, SortSpec, SOURCE_FILE_COLUMN,
};

pub const CRATE_NAME: &str = "bijux-inspector-model";
