#![forbid(unsafe_code)]

//! Row packing: place widgets and RowBlocks into grid rows.
//!
//! [`pack`] walks composed items left to right, filling a row while the
//! spans fit, then hands leftover columns back to the row's widgets.
//!
//! # Leftover distribution
//!
//! When a row closes with `remaining = col_count - used > 0`:
//!
//! - Only plain widgets are expandable; RowBlocks already span the row.
//! - If every expandable cell spans 1 and `remaining < expandable`, spans are
//!   left alone and every cell is flagged `distribute_equally`, asking the
//!   renderer to split the width evenly.
//! - Otherwise each expandable cell gains `remaining / expandable`, and the
//!   first `remaining % expandable` cells gain one more, capped at
//!   `col_count`.
//!
//! # Invariants
//!
//! 1. `1 <= span <= col_count` for every cell.
//! 2. A row without `distribute_equally` sums to `col_count`, or holds a
//!    single full-width item.
//! 3. Row order and in-row order follow input order.

use serde::Serialize;

use crate::row_block::LayoutItem;

/// One placed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub item: LayoutItem,
    pub span: u8,
    pub distribute_equally: bool,
}

/// One grid row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Sum of cell spans.
    #[must_use]
    pub fn used_columns(&self) -> u32 {
        self.cells.iter().map(|c| u32::from(c.span)).sum()
    }

    /// Whether the renderer should divide width evenly.
    #[must_use]
    pub fn distributes_equally(&self) -> bool {
        self.cells.iter().any(|c| c.distribute_equally)
    }
}

/// Span an item claims before leftover distribution.
#[must_use]
pub fn item_span(item: &LayoutItem, col_count: u8) -> u8 {
    let col_count = col_count.max(1);
    match item {
        LayoutItem::RowBlock(_) => col_count,
        LayoutItem::Widget(w) => w.effective_span(col_count),
    }
}

/// Pack composed items into rows.
#[must_use]
pub fn pack(items: Vec<LayoutItem>, col_count: u8) -> Vec<Row> {
    let col_count = col_count.max(1);
    let mut rows = Vec::new();
    let mut current: Vec<Cell> = Vec::new();
    let mut used: u8 = 0;

    for item in items {
        let span = item_span(&item, col_count);
        let cell = Cell {
            item,
            span,
            distribute_equally: false,
        };

        if span >= col_count {
            if !current.is_empty() {
                rows.push(close_row(std::mem::take(&mut current), used, col_count));
            }
            rows.push(close_row(vec![cell], col_count, col_count));
            used = 0;
            continue;
        }

        if used + span > col_count {
            rows.push(close_row(std::mem::take(&mut current), used, col_count));
            used = 0;
        }
        used += span;
        current.push(cell);
    }

    if !current.is_empty() {
        rows.push(close_row(current, used, col_count));
    }
    rows
}

/// Hand leftover columns back to the row.
fn close_row(mut cells: Vec<Cell>, used: u8, col_count: u8) -> Row {
    let remaining = col_count.saturating_sub(used);
    if remaining == 0 {
        return Row { cells };
    }

    let expandable: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.item.is_row_block())
        .map(|(i, _)| i)
        .collect();
    if expandable.is_empty() {
        return Row { cells };
    }

    let count = expandable.len();
    let all_single = expandable.iter().all(|&i| cells[i].span == 1);
    if all_single && usize::from(remaining) < count {
        for cell in &mut cells {
            cell.distribute_equally = true;
        }
        return Row { cells };
    }

    let per = usize::from(remaining) / count;
    let extra = usize::from(remaining) % count;
    for (k, &i) in expandable.iter().enumerate() {
        let add = per + usize::from(k < extra);
        let grown = usize::from(cells[i].span) + add;
        cells[i].span = grown.min(usize::from(col_count)) as u8;
    }
    Row { cells }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
