// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Client-side coordination for the tabular inspector: debounced filtering,
//! stale-result gating, virtualized slices, schema profiling with an LRU,
//! category enumeration and cross-dataset merges over an async backend.

pub mod backend;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod gate;
pub mod inspector;
pub mod perf;
pub mod registry;
pub mod schema_cache;
pub mod view;

pub use backend::{BackendError, BackendErrorCode, InspectorBackend};
pub use config::{validate_pipeline_config, PipelineConfig, SloConfig};
pub use debounce::DebounceTimer;
pub use engine::MemoryEngine;
pub use gate::{GateToken, Gates, InvalidationGate, OpClass};
pub use inspector::{Inspector, LoadOutcome};
pub use perf::{PerfRecorder, PerfSummary};
pub use registry::DatasetRegistry;
pub use schema_cache::{SchemaCache, SchemaCacheKey};
pub use view::ViewState;

pub const CRATE_NAME: &str = "bijux-inspector-runtime";
