// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Pure Inspector logic: no I/O, no async, no clocks.

pub mod headers;
pub mod insights;
pub mod normalize;
pub mod parse;
pub mod profile;
pub mod spec_builder;
pub mod window;

pub use headers::header_heuristic;
pub use insights::{compute_drift, outlier_hints, relationship_hints, schema_insights, suggest_columns};
pub use normalize::filter_hash;
pub use parse::{format_date, parse_date_relaxed, parse_f64_relaxed, parse_max_rows_scan};
pub use profile::{profile_schema_from_rows, sample_size_for, schema_scope, SampleTiers, DISTINCT_CAP};
pub use spec_builder::{build_filter_spec, compile_match_regex, SpecError, SpecField};
pub use window::{
    compute_start_idx, compute_window, normalize_row_height, normalize_row_height_or,
    snap_translate_y, WindowParams, WindowRange, DEFAULT_ROW_HEIGHT, MAX_ROW_HEIGHT,
    MIN_ROW_HEIGHT,
};

pub const CRATE_NAME: &str = "bijux-inspector-query";
