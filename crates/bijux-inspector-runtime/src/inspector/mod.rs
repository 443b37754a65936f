// SPDX-License-Identifier: Apache-2.0

//! The coordinator: owns [`ViewState`] and drives every pipeline operation.
//!
//! Each async operation captures a [`GateToken`](crate::gate::GateToken) for its
//! class before calling the backend and applies the result only while that
//! token is still current. Stale results are dropped without logging.

mod category;
mod cross_query;
mod drawer;
mod filter;
mod layout;
mod load;
mod schema;
mod slice;
mod sort;
mod state;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::backend::InspectorBackend;
use crate::config::PipelineConfig;
use crate::debounce::DebounceTimer;
use crate::gate::Gates;
use crate::perf::PerfRecorder;
use crate::schema_cache::SchemaCache;
use crate::view::ViewState;

pub use layout::{clamp_column_width, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use load::{sniff_text_headers, LoadOutcome};
pub use sort::{next_sort_levels, sort_rows_locally};

pub struct Inspector<B: InspectorBackend> {
    backend: Arc<B>,
    config: PipelineConfig,
    gates: Gates,
    perf: PerfRecorder,
    state: Mutex<ViewState>,
    schema_cache: Mutex<SchemaCache>,
    filter_timer: DebounceTimer,
    cross_timer: DebounceTimer,
    category_timer: DebounceTimer,
    slice_timer: DebounceTimer,
}

impl<B: InspectorBackend> Inspector<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, config: PipelineConfig) -> Arc<Self> {
        let mut view = ViewState::default();
        view.grid.row_height = config.row_height;
        Arc::new(Self {
            backend,
            gates: Gates::default(),
            perf: PerfRecorder::new(config.perf_capacity, config.slos),
            state: Mutex::new(view),
            schema_cache: Mutex::new(SchemaCache::new(config.schema_cache_capacity)),
            filter_timer: DebounceTimer::new(config.filter_debounce),
            cross_timer: DebounceTimer::new(config.cross_query_debounce),
            category_timer: DebounceTimer::new(config.category_debounce),
            slice_timer: DebounceTimer::new(std::time::Duration::ZERO),
            config,
        })
    }

    /// Clone of the current view state.
    pub async fn view(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    #[must_use]
    pub fn perf(&self) -> &PerfRecorder {
        &self.perf
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    #[must_use]
    pub fn gates(&self) -> &Gates {
        &self.gates
    }

    pub async fn schema_cache_len(&self) -> usize {
        self.schema_cache.lock().await.len()
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1_000.0
}
