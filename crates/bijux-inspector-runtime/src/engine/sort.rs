// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;

use bijux_inspector_model::{ColType, SortDir, SortSpec};
use bijux_inspector_query::{parse_date_relaxed, parse_f64_relaxed};

use super::load::Table;
use crate::backend::BackendError;

/// Compares typed values. Unparsable values sort last in either direction once
/// the caller reverses the ordering for descending sorts.
fn typed_cmp<T: PartialOrd>(a: Option<T>, b: Option<T>, asc: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => {
            if asc {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (None, Some(_)) => {
            if asc {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (None, None) => Ordering::Equal,
    }
}

/// Reorders `view` by one column. Empty cells go last ascending and first
/// descending. Ties keep prior view order when `stable`, else source order.
pub fn sort_view(view: &mut [usize], table: &Table, spec: &SortSpec) -> Result<(), BackendError> {
    if spec.col_idx >= table.columns.len() {
        return Err(BackendError::invalid("sort column out of range"));
    }
    let asc = spec.dir == SortDir::Asc;
    let col_type = table.col_types.get(spec.col_idx).copied().unwrap_or_default();
    let mut keyed: Vec<(usize, usize)> = view.iter().copied().enumerate().collect();
    keyed.sort_by(|&(pa, a), &(pb, b)| {
        let va = table.cell(spec.col_idx, a);
        let vb = table.cell(spec.col_idx, b);
        let ea = va.trim().is_empty();
        let eb = vb.trim().is_empty();
        if ea != eb {
            return match (asc, ea) {
                (true, true) | (false, false) => Ordering::Greater,
                _ => Ordering::Less,
            };
        }
        let ord = match col_type {
            ColType::Numeric => typed_cmp(parse_f64_relaxed(va), parse_f64_relaxed(vb), asc),
            ColType::Date => typed_cmp(parse_date_relaxed(va), parse_date_relaxed(vb), asc),
            ColType::String => va.to_lowercase().cmp(&vb.to_lowercase()),
        };
        let ord = if asc { ord } else { ord.reverse() };
        ord.then_with(|| if spec.stable { pa.cmp(&pb) } else { a.cmp(&b) })
    });
    for (slot, (_, row)) in view.iter_mut().zip(keyed) {
        *slot = row;
    }
    Ok(())
}
