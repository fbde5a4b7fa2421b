#![forbid(unsafe_code)]

//! RowBlock composition: pair a 3-column widget with a rail of small widgets.
//!
//! At the 4-column tier a widget spanning 3 columns leaves a 1-column gap.
//! [`compose`] fills that gap by pulling neighbouring 1-column widgets into a
//! vertical "rail" beside it, producing a [`RowBlock`] that spans the full
//! row.
//!
//! # Algorithm
//!
//! 1. If the column count is not 4, return the widgets unchanged.
//! 2. Scan left to right. A widget whose effective span is 3 is a seed.
//! 3. Rail budget: `seed.min_height_rem + tolerance_rem`. Candidates must
//!    have effective span 1; the rail holds at most `max_rail_items`; the
//!    cumulative height (`sum(heights) + gap * (n - 1)`) must stay within
//!    budget.
//! 4. Capture backward first, nearest first, stopping at the first RowBlock
//!    or non-qualifying widget. Only when nothing was captured backward is
//!    the forward direction tried.
//! 5. The block takes the position where the captured run begins; the rail
//!    keeps source order.
//! 6. A seed that captured nothing stays a plain widget.
//!
//! # Invariants
//!
//! 1. RowBlocks are only produced when `col_count == 4`.
//! 2. `1 <= rail.len() <= max_rail_items`.
//! 3. Every input widget appears exactly once in the output, in an order that
//!    is a stable regrouping of the input.

use serde::Serialize;

use crate::config::RowBlockConfig;
use crate::model::{Widget, WidgetId};

/// Column count at which RowBlocks are formed.
pub const ROW_BLOCK_COLUMNS: u8 = 4;

/// Effective span a widget needs to seed a RowBlock.
pub const ROW_BLOCK_MAIN_SPAN: u8 = 3;

/// A main widget plus the rail of small widgets stacked beside it.
///
/// Derived on every layout pass; never stored in the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowBlock {
    pub main: Widget,
    pub rail: Vec<Widget>,
}

impl RowBlock {
    /// Identifier derived from the main widget.
    #[must_use]
    pub fn id(&self) -> String {
        format!("rowblock:{}", self.main.id)
    }

    /// The main widget followed by the rail.
    pub fn members(&self) -> impl Iterator<Item = &Widget> {
        std::iter::once(&self.main).chain(self.rail.iter())
    }

    /// Whether `id` is the main widget or sits in the rail.
    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.members().any(|w| &w.id == id)
    }
}

/// One unit of packing: a plain widget or a RowBlock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutItem {
    Widget(Widget),
    RowBlock(RowBlock),
}

impl LayoutItem {
    #[must_use]
    pub fn is_row_block(&self) -> bool {
        matches!(self, LayoutItem::RowBlock(_))
    }

    /// Identifier of the item (the main widget's id for RowBlocks).
    #[must_use]
    pub fn widget_id(&self) -> &WidgetId {
        match self {
            LayoutItem::Widget(w) => &w.id,
            LayoutItem::RowBlock(block) => &block.main.id,
        }
    }
}

/// Running rail capture with its accumulated height.
struct Rail<'a> {
    config: &'a RowBlockConfig,
    budget_rem: f64,
    used_rem: f64,
    len: usize,
}

impl<'a> Rail<'a> {
    fn new(seed: &Widget, config: &'a RowBlockConfig) -> Self {
        Self {
            config,
            budget_rem: seed.min_height_rem() + config.tolerance_rem,
            used_rem: 0.0,
            len: 0,
        }
    }

    /// Accept `candidate` if it qualifies, updating the running totals.
    fn try_accept(&mut self, candidate: &Widget, col_count: u8) -> bool {
        if self.len >= self.config.max_rail_items || candidate.effective_span(col_count) != 1 {
            return false;
        }
        let gap = if self.len == 0 {
            0.0
        } else {
            self.config.rail_gap_rem
        };
        let next = self.used_rem + gap + candidate.min_height_rem();
        if next > self.budget_rem {
            return false;
        }
        self.used_rem = next;
        self.len += 1;
        true
    }
}

/// Regroup `items` into plain widgets and RowBlocks.
#[must_use]
pub fn compose(items: &[Widget], col_count: u8, config: &RowBlockConfig) -> Vec<LayoutItem> {
    if col_count != ROW_BLOCK_COLUMNS {
        return items.iter().cloned().map(LayoutItem::Widget).collect();
    }

    let mut out: Vec<LayoutItem> = Vec::with_capacity(items.len());
    let mut i = 0;
    while i < items.len() {
        let seed = &items[i];
        i += 1;
        if seed.effective_span(col_count) != ROW_BLOCK_MAIN_SPAN {
            out.push(LayoutItem::Widget(seed.clone()));
            continue;
        }

        let mut rail = Rail::new(seed, config);

        // Backward: walk the already-emitted tail, nearest first.
        let mut backward = 0;
        for item in out.iter().rev() {
            match item {
                LayoutItem::Widget(w) if rail.try_accept(w, col_count) => backward += 1,
                _ => break,
            }
        }

        if backward > 0 {
            let start = out.len() - backward;
            let members: Vec<Widget> = out
                .drain(start..)
                .filter_map(|item| match item {
                    LayoutItem::Widget(w) => Some(w),
                    LayoutItem::RowBlock(_) => None,
                })
                .collect();
            out.push(LayoutItem::RowBlock(RowBlock {
                main: seed.clone(),
                rail: members,
            }));
            continue;
        }

        // Forward: only when nothing qualified behind the seed.
        let start = i;
        while i < items.len() && rail.try_accept(&items[i], col_count) {
            i += 1;
        }
        if i > start {
            out.push(LayoutItem::RowBlock(RowBlock {
                main: seed.clone(),
                rail: items[start..i].to_vec(),
            }));
        } else {
            out.push(LayoutItem::Widget(seed.clone()));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeightMode, WidgetId, WidgetSize};

    fn w(id: &str, size: WidgetSize) -> Widget {
        Widget::new(WidgetId::new(id).unwrap(), size)
    }

    fn tall(id: &str, height: f64) -> Widget {
        Widget::with_constraints(
            WidgetId::new(id).unwrap(),
            WidgetSize::S,
            1,
            height,
            HeightMode::StretchRow,
        )
        .unwrap()
    }

    fn ids(items: &[LayoutItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                LayoutItem::Widget(w) => w.id.to_string(),
                LayoutItem::RowBlock(b) => {
                    let rail: Vec<&str> = b.rail.iter().map(|r| r.id.as_str()).collect();
                    format!("[{}|{}]", b.main.id, rail.join(","))
                }
            })
            .collect()
    }

    fn cfg() -> RowBlockConfig {
        RowBlockConfig::default()
    }

    #[test]
    fn non_four_columns_pass_through() {
        let items = vec![w("a", WidgetSize::S), w("l", WidgetSize::L)];
        for cols in 1..=3 {
            let out = compose(&items, cols, &cfg());
            assert_eq!(ids(&out), vec!["a", "l"]);
        }
    }

    #[test]
    fn forward_capture_respects_height_budget() {
        // L = 24 rem, budget 26: three S need 8 * 3 + 0.75 * 2 = 25.5, a fourth does not fit.
        let items = vec![
            w("l", WidgetSize::L),
            w("s1", WidgetSize::S),
            w("s2", WidgetSize::S),
            w("s3", WidgetSize::S),
            w("s4", WidgetSize::S),
        ];
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["[l|s1,s2,s3]", "s4"]);
    }

    #[test]
    fn backward_capture_wins_and_keeps_source_order() {
        let items = vec![
            w("x1", WidgetSize::Xs),
            w("x2", WidgetSize::Xs),
            w("l", WidgetSize::L),
            w("x3", WidgetSize::Xs),
        ];
        // 6 + 0.75 + 6 = 12.75 <= 26, so both backward items join; forward is skipped.
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["[l|x1,x2]", "x3"]);
    }

    #[test]
    fn backward_stops_at_first_non_qualifying() {
        let items = vec![
            w("x1", WidgetSize::Xs),
            w("m", WidgetSize::M),
            w("x2", WidgetSize::Xs),
            w("l", WidgetSize::L),
        ];
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["x1", "m", "[l|x2]"]);
    }

    #[test]
    fn backward_stops_at_too_tall_item() {
        let items = vec![
            w("x1", WidgetSize::Xs),
            tall("big", 30.0),
            w("x2", WidgetSize::Xs),
            w("l", WidgetSize::L),
        ];
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["x1", "big", "[l|x2]"]);
    }

    #[test]
    fn rail_capped_at_max_items() {
        let items: Vec<Widget> = std::iter::once(w("l", WidgetSize::L))
            .chain((0..6).map(|n| tall(&format!("t{n}"), 1.0)))
            .collect();
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["[l|t0,t1,t2,t3]", "t4", "t5"]);
    }

    #[test]
    fn configured_rail_limit_applies() {
        let config = RowBlockConfig {
            max_rail_items: 2,
            ..RowBlockConfig::default()
        };
        let items = vec![
            w("l", WidgetSize::L),
            tall("a", 1.0),
            tall("b", 1.0),
            tall("c", 1.0),
        ];
        let out = compose(&items, 4, &config);
        assert_eq!(ids(&out), vec!["[l|a,b]", "c"]);
    }

    #[test]
    fn isolated_seed_stays_plain() {
        let items = vec![w("m", WidgetSize::M), w("l", WidgetSize::L), w("xl", WidgetSize::XlRow)];
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["m", "l", "xl"]);
        assert!(out.iter().all(|item| !item.is_row_block()));
    }

    #[test]
    fn formed_blocks_are_not_recaptured() {
        // First L takes s1,s2 forward; second L sees a RowBlock behind it and
        // must fall through to forward capture.
        let items = vec![
            w("l1", WidgetSize::L),
            w("s1", WidgetSize::S),
            w("s2", WidgetSize::S),
            w("l2", WidgetSize::L),
            w("s3", WidgetSize::S),
        ];
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["[l1|s1,s2]", "[l2|s3]"]);
    }

    #[test]
    fn adjacent_seeds_do_not_capture_each_other() {
        let items = vec![w("l1", WidgetSize::L), w("l2", WidgetSize::L), w("s", WidgetSize::S)];
        let out = compose(&items, 4, &cfg());
        assert_eq!(ids(&out), vec!["l1", "[l2|s]"]);
    }

    #[test]
    fn every_widget_kept_once() {
        let items = vec![
            w("s0", WidgetSize::S),
            w("l1", WidgetSize::L),
            w("s1", WidgetSize::S),
            w("m", WidgetSize::M),
            w("l2", WidgetSize::L),
            w("x", WidgetSize::Xs),
        ];
        let out = compose(&items, 4, &cfg());
        let mut seen: Vec<String> = out
            .iter()
            .flat_map(|item| match item {
                LayoutItem::Widget(w) => vec![w.id.to_string()],
                LayoutItem::RowBlock(b) => b.members().map(|m| m.id.to_string()).collect(),
            })
            .collect();
        seen.sort();
        let mut expected: Vec<String> = items.iter().map(|w| w.id.to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn row_block_id_derives_from_main() {
        let block = RowBlock {
            main: w("main", WidgetSize::L),
            rail: vec![w("r", WidgetSize::S)],
        };
        assert_eq!(block.id(), "rowblock:main");
        assert!(block.contains(&WidgetId::new("r").unwrap()));
        assert!(!block.contains(&WidgetId::new("zz").unwrap()));
    }
}
