// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_model::{
    CategoryValuesRequest, ColType, DatasetSource, FilterSpec, MatchMode, NumericFilter,
    SchemaScope, SortDir, SortSpec,
};
use serde_json::json;

#[test]
fn filter_spec_serializes_in_camel_case() {
    let spec = FilterSpec {
        query: "A".to_string(),
        column_idx: Some(0),
        match_mode: MatchMode::Fuzzy,
        numeric_filter: Some(NumericFilter {
            enabled: true,
            col_idx: 1,
            min: 0.0,
            max: 10.0,
        }),
        max_rows_scan: Some(500),
        ..FilterSpec::default()
    };
    let value = serde_json::to_value(&spec).expect("serialize");
    assert_eq!(value["columnIdx"], json!(0));
    assert_eq!(value["matchMode"], json!("fuzzy"));
    assert_eq!(value["numericFilter"]["colIdx"], json!(1));
    assert_eq!(value["maxRowsScan"], json!(500));
    assert_eq!(value["dateFilter"], json!(null));
}

#[test]
fn dataset_source_is_kind_tagged() {
    let text = serde_json::to_value(DatasetSource::Text {
        text: "a,b".to_string(),
    })
    .expect("serialize");
    assert_eq!(text, json!({"kind": "text", "text": "a,b"}));
    let path: DatasetSource =
        serde_json::from_value(json!({"kind": "path", "path": "/x.csv"})).expect("parse");
    assert_eq!(
        path,
        DatasetSource::Path {
            path: "/x.csv".to_string()
        }
    );
}

#[test]
fn enums_use_lowercase_wire_names() {
    assert_eq!(serde_json::to_value(ColType::Numeric).expect("ser"), json!("numeric"));
    assert_eq!(serde_json::to_value(SchemaScope::Filtered).expect("ser"), json!("filtered"));
    let sort = SortSpec {
        col_idx: 2,
        dir: SortDir::Desc,
        stable: true,
    };
    assert_eq!(
        serde_json::to_value(sort).expect("ser"),
        json!({"colIdx": 2, "dir": "desc", "stable": true})
    );
}

#[test]
fn category_request_round_trips_from_wire_shape() {
    let req: CategoryValuesRequest = serde_json::from_value(json!({
        "colIdx": 3,
        "search": null,
        "offset": 0,
        "limit": 200,
        "maxRowsScan": 20000
    }))
    .expect("parse");
    assert_eq!(req.col_idx, 3);
    assert_eq!(req.max_rows_scan, Some(20_000));
}
