// SPDX-License-Identifier: Apache-2.0

//! Column projection, pinning and widths.

use bijux_inspector_model::ColumnLayout;

use super::Inspector;
use crate::backend::InspectorBackend;

pub const MIN_COLUMN_WIDTH: u32 = 90;
pub const MAX_COLUMN_WIDTH: u32 = 480;

fn toggle(list: &mut Vec<usize>, col_idx: usize) {
    if let Some(at) = list.iter().position(|c| *c == col_idx) {
        list.remove(at);
    } else {
        list.push(col_idx);
    }
}

/// Floors and clamps a dragged width. Non-finite input yields the minimum.
#[must_use]
pub fn clamp_column_width(width: f64) -> u32 {
    if !width.is_finite() {
        return MIN_COLUMN_WIDTH;
    }
    let floored = width.floor().clamp(f64::from(MIN_COLUMN_WIDTH), f64::from(MAX_COLUMN_WIDTH));
    floored as u32
}

/// Pinning a column on one side unpins it from the other.
pub fn toggle_pin(layout: &mut ColumnLayout, col_idx: usize, left: bool) {
    if left {
        layout.pinned_right.retain(|c| *c != col_idx);
        toggle(&mut layout.pinned_left, col_idx);
    } else {
        layout.pinned_left.retain(|c| *c != col_idx);
        toggle(&mut layout.pinned_right, col_idx);
    }
}

impl<B: InspectorBackend> Inspector<B> {
    async fn edit_layout(&self, col_idx: usize, reproject: bool, edit: impl FnOnce(&mut ColumnLayout)) {
        {
            let mut s = self.state.lock().await;
            if col_idx >= s.grid.headers.len() {
                return;
            }
            edit(&mut s.layout);
        }
        if reproject {
            self.fetch_visible_slice().await;
        }
    }

    pub async fn toggle_hidden(&self, col_idx: usize) {
        self.edit_layout(col_idx, true, |l| toggle(&mut l.hidden_columns, col_idx))
            .await;
    }

    /// Adds or removes a column from the explicit projection. An empty
    /// projection means every column.
    pub async fn toggle_visible_column(&self, col_idx: usize) {
        self.edit_layout(col_idx, true, |l| {
            toggle(&mut l.visible_columns, col_idx);
            l.visible_columns.sort_unstable();
        })
        .await;
    }

    pub async fn toggle_pin_left(&self, col_idx: usize) {
        self.edit_layout(col_idx, false, |l| toggle_pin(l, col_idx, true))
            .await;
    }

    pub async fn toggle_pin_right(&self, col_idx: usize) {
        self.edit_layout(col_idx, false, |l| toggle_pin(l, col_idx, false))
            .await;
    }

    pub async fn resize_column(&self, col_idx: usize, width: f64) {
        let width = clamp_column_width(width);
        self.edit_layout(col_idx, false, |l| {
            l.column_widths.insert(col_idx, width);
        })
        .await;
    }
}
