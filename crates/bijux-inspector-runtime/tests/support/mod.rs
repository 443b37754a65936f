// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bijux_inspector_model::{
    CategoryValuesRequest, CategoryValuesResponse, DatasetSource, ExplainRowResponse, FilterSpec,
    HeaderMode, HeaderSniff, KeyValue, LoadResult, MultiQueryRequest, MultiQueryResponse, SortSpec,
};
use bijux_inspector_runtime::{
    BackendError, BackendErrorCode, Inspector, InspectorBackend, LoadOutcome, MemoryEngine,
    PipelineConfig,
};
use tokio::sync::Mutex;

/// MemoryEngine wrapper that counts calls and can delay or fail them.
/// Delays are applied after the inner call so a late answer carries stale data.
#[derive(Default)]
pub struct ScriptedBackend {
    pub inner: MemoryEngine,
    pub filter_calls: AtomicU64,
    pub slice_calls: AtomicU64,
    pub category_calls: AtomicU64,
    pub multi_calls: AtomicU64,
    pub filter_delays: Mutex<VecDeque<Duration>>,
    pub category_delays: Mutex<VecDeque<Duration>>,
    pub multi_delays: Mutex<VecDeque<Duration>>,
    pub fail_multi: AtomicBool,
}

impl ScriptedBackend {
    pub async fn push_filter_delay(&self, delay: Duration) {
        self.filter_delays.lock().await.push_back(delay);
    }

    pub async fn push_category_delay(&self, delay: Duration) {
        self.category_delays.lock().await.push_back(delay);
    }

    pub async fn push_multi_delay(&self, delay: Duration) {
        self.multi_delays.lock().await.push_back(delay);
    }

    pub fn multis(&self) -> u64 {
        self.multi_calls.load(Ordering::SeqCst)
    }

    pub fn filters(&self) -> u64 {
        self.filter_calls.load(Ordering::SeqCst)
    }

    pub fn slices(&self) -> u64 {
        self.slice_calls.load(Ordering::SeqCst)
    }
}

async fn pause(queue: &Mutex<VecDeque<Duration>>) {
    let delay = queue.lock().await.pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl InspectorBackend for ScriptedBackend {
    fn backend_tag(&self) -> &'static str {
        "scripted"
    }

    async fn load_csv(
        &self,
        source: &DatasetSource,
        has_headers: bool,
    ) -> Result<LoadResult, BackendError> {
        self.inner.load_csv(source, has_headers).await
    }

    async fn sniff_has_headers(&self, path: &str) -> Result<HeaderSniff, BackendError> {
        self.inner.sniff_has_headers(path).await
    }

    async fn apply_filter(&self, spec: &FilterSpec) -> Result<usize, BackendError> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        let out = self.inner.apply_filter(spec).await;
        pause(&self.filter_delays).await;
        out
    }

    async fn get_row_slice(
        &self,
        start: usize,
        end: usize,
        cols: Option<&[usize]>,
    ) -> Result<Vec<Vec<String>>, BackendError> {
        self.slice_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_row_slice(start, end, cols).await
    }

    async fn sort(&self, spec: &SortSpec) -> Result<(), BackendError> {
        self.inner.sort(spec).await
    }

    async fn get_category_values(
        &self,
        req: &CategoryValuesRequest,
    ) -> Result<CategoryValuesResponse, BackendError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        let out = self.inner.get_category_values(req).await;
        pause(&self.category_delays).await;
        out
    }

    async fn get_full_row_metadata(&self, visual_idx: usize) -> Result<Vec<KeyValue>, BackendError> {
        self.inner.get_full_row_metadata(visual_idx).await
    }

    async fn explain_row(&self, visual_idx: usize) -> Result<ExplainRowResponse, BackendError> {
        self.inner.explain_row(visual_idx).await
    }

    async fn query_multiple_csv(
        &self,
        req: &MultiQueryRequest,
    ) -> Result<MultiQueryResponse, BackendError> {
        self.multi_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_multi.load(Ordering::SeqCst) {
            return Err(BackendError::new(
                BackendErrorCode::Io,
                "Failed to open file: scripted failure",
            ));
        }
        let out = self.inner.query_multiple_csv(req).await;
        pause(&self.multi_delays).await;
        out
    }
}

pub const PEOPLE: &str = "Name,Age\nAlice,30\nBob,25\n";
pub const CITIES: &str = "city,kind,pop\nParis,capital,2100000\nLyon,city,500000\nParis,capital,2100000\nNice,city,340000\n";

pub fn text(src: &str) -> DatasetSource {
    DatasetSource::Text {
        text: src.to_string(),
    }
}

pub fn scripted() -> (Arc<ScriptedBackend>, Arc<Inspector<ScriptedBackend>>) {
    let backend = Arc::new(ScriptedBackend::default());
    let inspector = Inspector::new(Arc::clone(&backend), PipelineConfig::default());
    (backend, inspector)
}

pub fn memory() -> Arc<Inspector<MemoryEngine>> {
    Inspector::new(Arc::new(MemoryEngine::new()), PipelineConfig::default())
}

pub async fn load_text<B: InspectorBackend>(inspector: &Inspector<B>, src: &str, label: &str) {
    let outcome = inspector
        .load_dataset(text(src), HeaderMode::Yes, Some(label.to_string()))
        .await
        .expect("load dataset");
    assert!(matches!(outcome, LoadOutcome::Loaded(_)));
}
