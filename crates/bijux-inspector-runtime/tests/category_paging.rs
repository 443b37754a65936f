// SPDX-License-Identifier: Apache-2.0

mod support;

use std::sync::Arc;

use bijux_inspector_model::FilterState;
use bijux_inspector_runtime::{Inspector, MemoryEngine, PipelineConfig};
use support::{load_text, memory, CITIES};

#[tokio::test]
async fn scan_budget_marks_the_page_partial() {
    let config = PipelineConfig {
        category_default_max_rows_scan: 2,
        ..PipelineConfig::default()
    };
    let inspector = Inspector::new(Arc::new(MemoryEngine::new()), config);
    load_text(&inspector, CITIES, "cities.csv").await;
    inspector.set_category_column(Some(0)).await;

    let view = inspector.view().await;
    assert!(view.category.partial);
    assert_eq!(view.category.rows_scanned, 2);
    assert_eq!(view.category.total_rows_in_view, 4);
    let values: Vec<&str> = view.category.items.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, vec!["Lyon", "Paris"]);
}

#[tokio::test]
async fn row_cap_in_the_filter_bounds_the_scan_too() {
    let inspector = memory();
    load_text(&inspector, CITIES, "cities.csv").await;
    inspector
        .replace_filters(FilterState {
            max_rows_scan_text: "3".to_string(),
            ..FilterState::default()
        })
        .await;
    inspector.set_category_column(Some(0)).await;

    let view = inspector.view().await;
    assert_eq!(view.grid.total_filtered, 3);
    assert_eq!(view.category.total_rows_in_view, 3);
    assert_eq!(view.category.rows_scanned, 3);
    assert!(!view.category.partial);
    assert_eq!(view.category.items[0].value, "Paris");
    assert_eq!(view.category.items[0].count, 2);
}

#[tokio::test]
async fn load_more_appends_the_next_page() {
    let config = PipelineConfig {
        category_page_limit: 2,
        ..PipelineConfig::default()
    };
    let inspector = Inspector::new(Arc::new(MemoryEngine::new()), config);
    load_text(&inspector, CITIES, "cities.csv").await;
    inspector.set_category_column(Some(0)).await;

    let view = inspector.view().await;
    assert_eq!(view.category.distinct_total, 3);
    assert_eq!(view.category.items.len(), 2);
    assert_eq!(view.category.items[0].value, "Paris");
    assert_eq!(view.category.offset, 2);

    inspector.load_more_categories().await;
    let view = inspector.view().await;
    let values: Vec<&str> = view.category.items.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, vec!["Paris", "Lyon", "Nice"]);
    assert_eq!(view.category.offset, 3);
}

#[tokio::test]
async fn toggled_values_filter_the_view() {
    let inspector = memory();
    load_text(&inspector, CITIES, "cities.csv").await;
    inspector.set_category_column(Some(0)).await;
    inspector.toggle_category_value("Nice").await;
    inspector.run_filter_now(false).await;

    let view = inspector.view().await;
    assert!(view.filters.category.enabled);
    assert_eq!(view.grid.total_filtered, 1);
    assert_eq!(view.grid.visible_rows[0][0], "Nice");

    inspector.toggle_category_value("Nice").await;
    inspector.run_filter_now(false).await;
    let view = inspector.view().await;
    assert!(!view.filters.category.enabled);
    assert_eq!(view.grid.total_filtered, 4);
}

#[tokio::test]
async fn out_of_range_column_clears_the_listing() {
    let inspector = memory();
    load_text(&inspector, CITIES, "cities.csv").await;
    inspector.set_category_column(Some(0)).await;
    inspector.set_category_column(Some(12)).await;
    let view = inspector.view().await;
    assert!(view.category.items.is_empty());
    assert!(view.errors.category.is_none());
}
