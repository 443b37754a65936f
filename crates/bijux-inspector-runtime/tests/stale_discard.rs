// SPDX-License-Identifier: Apache-2.0

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{load_text, scripted, CITIES, PEOPLE};
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn load_during_slow_filter_pass_discards_its_count() {
    let (backend, inspector) = scripted();
    load_text(&inspector, PEOPLE, "people.csv").await;
    let before = backend.filters();

    backend.push_filter_delay(Duration::from_millis(200)).await;
    let slow = {
        let inspector = Arc::clone(&inspector);
        tokio::spawn(async move { inspector.run_filter_now(false).await })
    };
    sleep(Duration::from_millis(10)).await;
    load_text(&inspector, CITIES, "cities.csv").await;
    slow.await.expect("join slow pass");

    let view = inspector.view().await;
    assert_eq!(view.grid.headers[0], "city");
    assert_eq!(view.grid.total_filtered, 4);
    assert_eq!(view.grid.visible_rows.len(), 4);
    assert_eq!(backend.filters(), before + 2);
    assert!(!view.scheduler.in_flight);
    assert!(!view.scheduler.pending);
}

#[tokio::test(start_paused = true)]
async fn slow_category_answer_for_an_old_column_is_dropped() {
    let (backend, inspector) = scripted();
    load_text(&inspector, CITIES, "cities.csv").await;

    backend.push_category_delay(Duration::from_millis(200)).await;
    let slow = {
        let inspector = Arc::clone(&inspector);
        tokio::spawn(async move { inspector.set_category_column(Some(0)).await })
    };
    sleep(Duration::from_millis(10)).await;
    inspector.set_category_column(Some(1)).await;
    let view = inspector.view().await;
    assert!(!view.category.loading);
    slow.await.expect("join slow fetch");

    let view = inspector.view().await;
    assert_eq!(view.filters.category.col_idx, Some(1));
    let values: Vec<&str> = view.category.items.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, vec!["capital", "city"]);
    assert!(!view.category.loading);
}

#[tokio::test(start_paused = true)]
async fn concurrent_run_requests_share_one_drain_loop() {
    let (backend, inspector) = scripted();
    load_text(&inspector, PEOPLE, "people.csv").await;
    let before = backend.filters();

    backend.push_filter_delay(Duration::from_millis(100)).await;
    let first = {
        let inspector = Arc::clone(&inspector);
        tokio::spawn(async move { inspector.run_filter_now(false).await })
    };
    sleep(Duration::from_millis(10)).await;
    inspector.run_filter_now(false).await;
    inspector.run_filter_now(false).await;
    first.await.expect("join first pass");

    // The two calls made while a pass was in flight fold into one rerun.
    assert_eq!(backend.filters(), before + 2);
    let view = inspector.view().await;
    assert!(!view.scheduler.in_flight);
}
