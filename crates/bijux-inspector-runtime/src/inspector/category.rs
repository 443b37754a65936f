// SPDX-License-Identifier: Apache-2.0

//! CategoryValueFetcher: paginated distinct values for the category filter column.

use std::sync::Arc;
use std::time::Instant;

use bijux_inspector_model::CategoryValuesRequest;
use bijux_inspector_query::parse_max_rows_scan;
use tracing::warn;

use super::{elapsed_ms, Inspector};
use crate::backend::InspectorBackend;
use crate::gate::OpClass;
use crate::perf::meta;
use crate::view::CategoryState;

impl<B: InspectorBackend> Inspector<B> {
    /// Points the category filter at a column and starts a fresh enumeration.
    pub async fn set_category_column(&self, col_idx: Option<usize>) {
        {
            let mut s = self.state.lock().await;
            s.filters.category.col_idx = col_idx;
            s.filters.category.selected.clear();
            s.category.search.clear();
        }
        self.fetch_category_values(true).await;
    }

    /// Debounced; a new search always restarts from offset zero.
    pub async fn set_category_search(self: &Arc<Self>, search: &str) {
        self.state.lock().await.category.search = search.to_string();
        let this = Arc::clone(self);
        self.category_timer.schedule(async move {
            this.fetch_category_values(true).await;
        });
    }

    pub async fn search_categories_now(&self, search: &str) {
        self.category_timer.cancel();
        self.state.lock().await.category.search = search.to_string();
        self.fetch_category_values(true).await;
    }

    pub async fn load_more_categories(&self) {
        self.fetch_category_values(false).await;
    }

    /// Adds or removes a selected value and schedules a filter pass.
    pub async fn toggle_category_value(self: &Arc<Self>, value: &str) {
        let value = value.to_string();
        self.edit_filters(move |f| {
            f.category.toggle(&value);
            f.category.enabled = !f.category.selected.is_empty();
        })
        .await;
    }

    pub async fn fetch_category_values(&self, reset: bool) {
        let token = self.gates.issue(OpClass::Category);
        let started = Instant::now();
        let req = {
            let mut s = self.state.lock().await;
            let header_count = s.grid.headers.len();
            let Some(col_idx) = s.filters.category.col_idx.filter(|c| *c < header_count) else {
                s.category = CategoryState::default();
                return;
            };
            if reset {
                s.category.offset = 0;
                s.category.items.clear();
            }
            s.category.loading = true;
            s.errors.category = None;
            let search = s.category.search.trim();
            CategoryValuesRequest {
                col_idx,
                search: (!search.is_empty()).then(|| search.to_string()),
                offset: if reset { 0 } else { s.category.offset },
                limit: self.config.category_page_limit,
                max_rows_scan: parse_max_rows_scan(&s.filters.max_rows_scan_text)
                    .or(Some(self.config.category_default_max_rows_scan)),
            }
        };

        let result = self.backend.get_category_values(&req).await;
        if !self.gates.is_current(OpClass::Category, token) {
            return;
        }
        let mut s = self.state.lock().await;
        s.category.loading = false;
        match result {
            Ok(resp) => {
                let returned = resp.values.len();
                let c = &mut s.category;
                c.rows_scanned = resp.rows_scanned;
                c.total_rows_in_view = resp.total_rows_in_view;
                c.partial = resp.partial;
                c.distinct_total = resp.distinct_total;
                c.offset = resp.offset + returned;
                if reset {
                    c.items = resp.values;
                } else {
                    c.items.extend(resp.values);
                }
                drop(s);
                self.perf.record(
                    "category",
                    elapsed_ms(started),
                    meta([
                        ("col", req.col_idx.to_string()),
                        ("returned", returned.to_string()),
                        ("partial", resp.partial.to_string()),
                    ]),
                );
            }
            Err(e) => {
                warn!(op = "category", error = %e, "backend command failed");
                s.errors.category = Some(e.to_string());
            }
        }
    }
}
