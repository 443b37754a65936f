// SPDX-License-Identifier: Apache-2.0

//! Scroll position to visible row range for a virtualized grid.
//!
//! Nothing here holds row data; the runtime uses [`WindowRange`] to request
//! `[start, end)` from the backend.

pub const MIN_ROW_HEIGHT: u32 = 24;
pub const MAX_ROW_HEIGHT: u32 = 96;
pub const DEFAULT_ROW_HEIGHT: u32 = 34;

/// Integer row height in `[24, 96]`; non-finite input falls back to 34.
#[must_use]
pub fn normalize_row_height(value: f64) -> u32 {
    normalize_row_height_or(value, DEFAULT_ROW_HEIGHT)
}

#[must_use]
pub fn normalize_row_height_or(value: f64, fallback: u32) -> u32 {
    let n = if value.is_finite() {
        value.floor()
    } else {
        f64::from(fallback)
    };
    n.clamp(f64::from(MIN_ROW_HEIGHT), f64::from(MAX_ROW_HEIGHT)) as u32
}

#[must_use]
pub fn compute_start_idx(scroll_top: f64, row_height: f64, total_filtered: usize) -> usize {
    if total_filtered == 0 {
        return 0;
    }
    let h = f64::from(normalize_row_height(row_height));
    let top = if scroll_top.is_nan() { 0.0 } else { scroll_top.max(0.0) };
    let raw = (top / h).floor();
    let last = (total_filtered - 1) as f64;
    raw.min(last) as usize
}

/// Integer pixel offset of the first rendered row.
#[must_use]
pub fn snap_translate_y(start_idx: usize, row_height: f64) -> u64 {
    let h = f64::from(normalize_row_height(row_height));
    (start_idx as f64 * h).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    pub row_height: f64,
    pub overscan: usize,
    pub max_window_rows: usize,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            row_height: f64::from(DEFAULT_ROW_HEIGHT),
            overscan: 10,
            max_window_rows: 80,
        }
    }
}

/// Half-open row range, always `start <= end <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
}

impl WindowRange {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[must_use]
pub fn compute_window(
    scroll_top: f64,
    viewport_height: f64,
    total_filtered: usize,
    params: &WindowParams,
) -> WindowRange {
    if total_filtered == 0 {
        return WindowRange::default();
    }
    let start = compute_start_idx(scroll_top, params.row_height, total_filtered);
    let h = f64::from(normalize_row_height(params.row_height));
    let viewport = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };
    let visible_rows = (viewport / h).ceil() as usize;
    let wanted = visible_rows
        .saturating_add(params.overscan)
        .min(params.max_window_rows);
    let end = start.saturating_add(wanted).min(total_filtered);
    WindowRange { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_height_is_clamped_and_floored() {
        assert_eq!(normalize_row_height(0.0), 24);
        assert_eq!(normalize_row_height(1000.0), 96);
        assert_eq!(normalize_row_height(33.9), 33);
        assert_eq!(normalize_row_height(f64::NAN), 34);
        assert_eq!(normalize_row_height(f64::INFINITY), 34);
        assert_eq!(normalize_row_height_or(f64::NAN, 200), 96);
    }

    #[test]
    fn start_idx_examples() {
        assert_eq!(compute_start_idx(-100.0, 34.0, 1000), 0);
        assert_eq!(compute_start_idx(340.0, 34.0, 1000), 10);
        assert_eq!(compute_start_idx(999_999.0, 34.0, 100), 99);
        assert_eq!(compute_start_idx(500.0, 34.0, 0), 0);
    }

    #[test]
    fn translate_snaps_to_whole_pixels() {
        assert_eq!(snap_translate_y(10, 34.0), 340);
        assert_eq!(snap_translate_y(3, 10.0), 72);
    }

    #[test]
    fn window_is_bounded_by_overscan_and_cap() {
        let params = WindowParams::default();
        let w = compute_window(0.0, 340.0, 1000, &params);
        assert_eq!(w, WindowRange { start: 0, end: 20 });

        let tall = compute_window(0.0, 10_000.0, 1000, &params);
        assert_eq!(tall.len(), 80);

        let tail = compute_window(999_999.0, 340.0, 50, &params);
        assert_eq!(tail, WindowRange { start: 49, end: 50 });
    }
}
