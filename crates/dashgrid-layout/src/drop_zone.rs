#![forbid(unsafe_code)]

//! Drop-zone resolution: pointer position + drag state -> landing spot.
//!
//! The resolver turns the current section sequence and a geometry snapshot
//! into an ordered list of [`DropZone`]s, marks the ones the dragged item
//! could not legally land in, and hit-tests the pointer against them.
//!
//! # Zone generation
//!
//! Sections are visited in visual order. For each one:
//!
//! - **Widget section**: RowBlock rail zones first (top and bottom half of
//!   every rail widget), then a before/after pair per top-level item.
//!   Items are clustered into visual rows by their top edge (within
//!   `row_tolerance_px`) and ordered by x inside a row; before/after zones
//!   stretch to the full height of their row.
//! - **Filter group**: a before/after pair per widget, each widget rectangle
//!   grown by `edge_margin_px`.
//! - A section that produced no item zones gets one zone covering the whole
//!   section, inserting at the end.
//! - Two between-sections zones straddle the top and bottom edges. The first
//!   section additionally gets a tall zone above it.
//!
//! With no sections at all, a single between-sections zone fills the canvas.
//!
//! # Resolution
//!
//! Valid zones are tried in generation order and the first one containing
//! the pointer wins; invalid zones are tried next in the same order. A
//! pointer outside the canvas never resolves.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Section rectangle missing | Section's zones skipped, logged at `warn` |
//! | Widget rectangle missing | Widget's zones skipped |
//! | Canvas rectangle missing | Resolution returns `None` |

use std::fmt;

use dashgrid_core::geometry::{Point, Rect, Sides};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::fit::{DragSize, FitOracle};
use crate::model::{FilterGroup, Section, SectionId, Widget, WidgetId};
use crate::row_block::{LayoutItem, RowBlock, compose};

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// What a drop into the zone would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropZoneKind {
    /// Insert into a widget section.
    WithinSection,
    /// Insert into a filter group's widgets.
    WithinFilterGroup,
    /// Insert a section into the section sequence.
    BetweenSections,
}

impl DropZoneKind {
    #[must_use]
    pub const fn is_within(self) -> bool {
        !matches!(self, DropZoneKind::BetweenSections)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DropZoneKind::WithinSection => "within_section",
            DropZoneKind::WithinFilterGroup => "within_filter_group",
            DropZoneKind::BetweenSections => "between_sections",
        }
    }
}

impl fmt::Display for DropZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular landing area with its insertion target.
///
/// `position` indexes the target section's flat widget sequence for within
/// zones and the section sequence for between zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropZone {
    #[serde(rename = "type")]
    pub kind: DropZoneKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    pub position: usize,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub is_rail_drop_zone: bool,
    pub is_invalid: bool,
}

impl DropZone {
    fn within(kind: DropZoneKind, section_id: &SectionId, position: usize, rect: Rect) -> Self {
        Self {
            kind,
            section_id: Some(section_id.clone()),
            position,
            top: rect.top(),
            bottom: rect.bottom(),
            left: rect.left(),
            right: rect.right(),
            is_rail_drop_zone: false,
            is_invalid: false,
        }
    }

    fn between(position: usize, rect: Rect) -> Self {
        Self {
            kind: DropZoneKind::BetweenSections,
            section_id: None,
            position,
            top: rect.top(),
            bottom: rect.bottom(),
            left: rect.left(),
            right: rect.right(),
            is_rail_drop_zone: false,
            is_invalid: false,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_edges(self.left, self.top, self.right, self.bottom)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

// ---------------------------------------------------------------------------
// Drag state
// ---------------------------------------------------------------------------

/// What the user is currently dragging.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    /// A new item dragged in from the palette.
    PanelDrag { size: DragSize },
    /// An existing widget being relocated.
    WidgetMove { widget_id: WidgetId, size: DragSize },
    /// A whole section being reordered.
    SectionMove { section_id: SectionId },
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Source of on-screen rectangles, in CSS pixels.
///
/// Rectangles must come from the most recent render of the current layout.
/// `None` means the entity is not (or no longer) on screen.
pub trait GeometryProvider {
    fn canvas_rect(&self) -> Option<Rect>;
    fn section_rect(&self, id: &SectionId) -> Option<Rect>;
    fn widget_rect(&self, id: &WidgetId) -> Option<Rect>;
    /// Rail container of the RowBlock whose main widget is `main`.
    fn rail_rect(&self, main: &WidgetId) -> Option<Rect>;
}

/// Hash-map backed [`GeometryProvider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySnapshot {
    canvas: Option<Rect>,
    sections: FxHashMap<SectionId, Rect>,
    widgets: FxHashMap<WidgetId, Rect>,
    rails: FxHashMap<WidgetId, Rect>,
}

impl GeometrySnapshot {
    #[must_use]
    pub fn new(canvas: Rect) -> Self {
        Self {
            canvas: Some(canvas),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_section(mut self, id: SectionId, rect: Rect) -> Self {
        self.insert_section(id, rect);
        self
    }

    #[must_use]
    pub fn with_widget(mut self, id: WidgetId, rect: Rect) -> Self {
        self.insert_widget(id, rect);
        self
    }

    #[must_use]
    pub fn with_rail(mut self, main: WidgetId, rect: Rect) -> Self {
        self.insert_rail(main, rect);
        self
    }

    pub fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = Some(canvas);
    }

    pub fn insert_section(&mut self, id: SectionId, rect: Rect) {
        self.sections.insert(id, rect);
    }

    pub fn insert_widget(&mut self, id: WidgetId, rect: Rect) {
        self.widgets.insert(id, rect);
    }

    pub fn insert_rail(&mut self, main: WidgetId, rect: Rect) {
        self.rails.insert(main, rect);
    }

    /// Forget every rectangle except the canvas.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.widgets.clear();
        self.rails.clear();
    }
}

impl GeometryProvider for GeometrySnapshot {
    fn canvas_rect(&self) -> Option<Rect> {
        self.canvas
    }

    fn section_rect(&self, id: &SectionId) -> Option<Rect> {
        self.sections.get(id).copied()
    }

    fn widget_rect(&self, id: &WidgetId) -> Option<Rect> {
        self.widgets.get(id).copied()
    }

    fn rail_rect(&self, main: &WidgetId) -> Option<Rect> {
        self.rails.get(main).copied()
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// A top-level item with its rectangle and flat index range.
#[derive(Debug, Clone, Copy)]
struct Placed {
    rect: Rect,
    first: usize,
    last: usize,
}

/// Generates and hit-tests drop zones over a borrowed section sequence.
#[derive(Debug, Clone, Copy)]
pub struct DropZoneResolver<'a> {
    sections: &'a [Section],
    container_width: f64,
    config: &'a LayoutConfig,
}

impl<'a> DropZoneResolver<'a> {
    #[must_use]
    pub fn new(sections: &'a [Section], container_width: f64, config: &'a LayoutConfig) -> Self {
        Self {
            sections,
            container_width,
            config,
        }
    }

    /// Find the zone under `point`, preferring valid zones.
    pub fn resolve<G>(&self, point: Point, geometry: &G, drag: &DragState) -> Option<DropZone>
    where
        G: GeometryProvider + ?Sized,
    {
        let span = tracing::debug_span!(
            "drop.resolve",
            x = point.x,
            y = point.y,
            zones = tracing::field::Empty,
            hit = tracing::field::Empty,
        )
        .entered();

        let canvas = geometry.canvas_rect()?;
        if !canvas.contains(point) {
            return None;
        }

        let zones = self.zones(geometry, drag);
        span.record("zones", zones.len());

        let hit = zones
            .iter()
            .find(|z| !z.is_invalid && z.contains(point))
            .or_else(|| zones.iter().find(|z| z.is_invalid && z.contains(point)))
            .cloned();
        if let Some(zone) = &hit {
            span.record("hit", zone.kind.as_str());
        }
        hit
    }

    /// Every zone in generation order, with validity applied for `drag`.
    pub fn zones<G>(&self, geometry: &G, drag: &DragState) -> Vec<DropZone>
    where
        G: GeometryProvider + ?Sized,
    {
        let mut zones = self.collect_zones(geometry);
        self.mark_validity(&mut zones, drag);
        zones
    }

    fn collect_zones<G>(&self, geometry: &G) -> Vec<DropZone>
    where
        G: GeometryProvider + ?Sized,
    {
        let Some(canvas) = geometry.canvas_rect() else {
            return Vec::new();
        };
        if self.sections.is_empty() {
            return vec![DropZone::between(0, canvas)];
        }

        let col_count = self.config.breakpoints.col_count(self.container_width);
        let mut zones = Vec::new();
        for (index, section) in self.sections.iter().enumerate() {
            let Some(section_rect) = geometry.section_rect(section.id()) else {
                tracing::warn!(
                    target: "dashgrid.drop",
                    section = %section.id(),
                    "no geometry for section; skipping its zones"
                );
                continue;
            };

            let start = zones.len();
            match section {
                Section::Widgets { id, widgets } => {
                    self.widget_section_zones(id, widgets, col_count, geometry, &mut zones);
                }
                Section::FilterGroup { id, group } => {
                    self.filter_group_zones(id, group, geometry, &mut zones);
                }
            }
            if zones.len() == start {
                zones.push(DropZone::within(
                    section_kind_zone(section),
                    section.id(),
                    section.items().len(),
                    section_rect,
                ));
            }
            self.between_zones(index, section_rect, canvas, &mut zones);

            tracing::trace!(
                target: "dashgrid.drop",
                section = %section.id(),
                zones = zones.len() - start,
                "zones generated"
            );
        }
        zones
    }

    fn widget_section_zones<G>(
        &self,
        section_id: &SectionId,
        widgets: &[Widget],
        col_count: u8,
        geometry: &G,
        zones: &mut Vec<DropZone>,
    ) where
        G: GeometryProvider + ?Sized,
    {
        let index_of = flat_indices(widgets);
        let items = compose(widgets, col_count, &self.config.row_block);

        let mut placed = Vec::with_capacity(items.len());
        for item in &items {
            match item {
                LayoutItem::Widget(widget) => {
                    let (Some(rect), Some(&k)) =
                        (geometry.widget_rect(&widget.id), index_of.get(&widget.id))
                    else {
                        continue;
                    };
                    placed.push(Placed {
                        rect,
                        first: k,
                        last: k,
                    });
                }
                LayoutItem::RowBlock(block) => {
                    rail_zones(section_id, block, &index_of, geometry, zones);
                    if let Some(p) = place_block(block, &index_of, geometry) {
                        placed.push(p);
                    }
                }
            }
        }

        let margin = self.config.drop_zones.edge_margin_px;
        for row in cluster_rows(placed, self.config.drop_zones.row_tolerance_px) {
            let top = row.iter().map(|p| p.rect.top()).fold(f64::INFINITY, f64::min) - margin;
            let bottom = row
                .iter()
                .map(|p| p.rect.bottom())
                .fold(f64::NEG_INFINITY, f64::max)
                + margin;
            for p in &row {
                let mid = p.rect.center_x();
                zones.push(DropZone::within(
                    DropZoneKind::WithinSection,
                    section_id,
                    p.first,
                    Rect::from_edges(p.rect.left() - margin, top, mid, bottom),
                ));
                zones.push(DropZone::within(
                    DropZoneKind::WithinSection,
                    section_id,
                    p.last + 1,
                    Rect::from_edges(mid, top, p.rect.right() + margin, bottom),
                ));
            }
        }
    }

    fn filter_group_zones<G>(
        &self,
        section_id: &SectionId,
        group: &FilterGroup,
        geometry: &G,
        zones: &mut Vec<DropZone>,
    ) where
        G: GeometryProvider + ?Sized,
    {
        let margin = Sides::all(self.config.drop_zones.edge_margin_px);
        for (k, widget) in group.widgets.iter().enumerate() {
            let Some(rect) = geometry.widget_rect(&widget.id) else {
                continue;
            };
            let grown = rect.outset(margin);
            let mid = rect.center_x();
            zones.push(DropZone::within(
                DropZoneKind::WithinFilterGroup,
                section_id,
                k,
                Rect::from_edges(grown.left(), grown.top(), mid, grown.bottom()),
            ));
            zones.push(DropZone::within(
                DropZoneKind::WithinFilterGroup,
                section_id,
                k + 1,
                Rect::from_edges(mid, grown.top(), grown.right(), grown.bottom()),
            ));
        }
    }

    fn between_zones(&self, index: usize, section: Rect, canvas: Rect, zones: &mut Vec<DropZone>) {
        let band = self.config.drop_zones.between_band_px;
        let (left, right) = (canvas.left(), canvas.right());
        zones.push(DropZone::between(
            index,
            Rect::from_edges(left, section.top() - band, right, section.top() + band),
        ));
        zones.push(DropZone::between(
            index + 1,
            Rect::from_edges(left, section.bottom() - band, right, section.bottom() + band),
        ));
        if index == 0 {
            let lead = self.config.drop_zones.leading_zone_px;
            zones.push(DropZone::between(
                0,
                Rect::from_edges(left, section.top() - lead, right, section.top()),
            ));
        }
    }

    fn mark_validity(&self, zones: &mut [DropZone], drag: &DragState) {
        let size = match drag {
            DragState::Idle => return,
            DragState::SectionMove { .. } => {
                for zone in zones.iter_mut().filter(|z| z.kind.is_within()) {
                    zone.is_invalid = true;
                }
                return;
            }
            DragState::PanelDrag { size } | DragState::WidgetMove { size, .. } => *size,
        };

        let oracle = FitOracle::new(self.sections, self.container_width, self.config);
        let mut fits: FxHashMap<SectionId, bool> = FxHashMap::default();
        for zone in zones.iter_mut() {
            if !zone.kind.is_within() {
                continue;
            }
            let ok = match zone.section_id.as_ref() {
                Some(id) => *fits
                    .entry(id.clone())
                    .or_insert_with(|| oracle.would_fit(size, id)),
                None => continue,
            };
            zone.is_invalid = !ok;
        }
    }
}

fn section_kind_zone(section: &Section) -> DropZoneKind {
    match section {
        Section::Widgets { .. } => DropZoneKind::WithinSection,
        Section::FilterGroup { .. } => DropZoneKind::WithinFilterGroup,
    }
}

fn flat_indices(widgets: &[Widget]) -> FxHashMap<&WidgetId, usize> {
    widgets.iter().enumerate().map(|(k, w)| (&w.id, k)).collect()
}

/// Top and bottom half of every rail widget; one zone over an empty rail.
fn rail_zones<G>(
    section_id: &SectionId,
    block: &RowBlock,
    index_of: &FxHashMap<&WidgetId, usize>,
    geometry: &G,
    zones: &mut Vec<DropZone>,
) where
    G: GeometryProvider + ?Sized,
{
    let start = zones.len();
    for member in &block.rail {
        let (Some(rect), Some(&k)) = (geometry.widget_rect(&member.id), index_of.get(&member.id))
        else {
            continue;
        };
        let mid = rect.center_y();
        for (position, half) in [
            (k, Rect::from_edges(rect.left(), rect.top(), rect.right(), mid)),
            (k + 1, Rect::from_edges(rect.left(), mid, rect.right(), rect.bottom())),
        ] {
            let mut zone = DropZone::within(DropZoneKind::WithinSection, section_id, position, half);
            zone.is_rail_drop_zone = true;
            zones.push(zone);
        }
    }

    if zones.len() == start {
        let (Some(rail), Some(&main)) = (geometry.rail_rect(&block.main.id), index_of.get(&block.main.id))
        else {
            return;
        };
        let mut zone = DropZone::within(DropZoneKind::WithinSection, section_id, main + 1, rail);
        zone.is_rail_drop_zone = true;
        zones.push(zone);
    }
}

/// Block rectangle is the main widget's rectangle joined with its rail.
fn place_block<G>(block: &RowBlock, index_of: &FxHashMap<&WidgetId, usize>, geometry: &G) -> Option<Placed>
where
    G: GeometryProvider + ?Sized,
{
    let main = geometry.widget_rect(&block.main.id)?;
    let rect = match geometry.rail_rect(&block.main.id) {
        Some(rail) => main.union(&rail),
        None => main,
    };
    let indices = block.members().filter_map(|w| index_of.get(&w.id).copied());
    let (first, last) = indices.fold((usize::MAX, 0), |(lo, hi), k| (lo.min(k), hi.max(k)));
    (first != usize::MAX).then_some(Placed { rect, first, last })
}

/// Group items into visual rows by top edge, each row ordered by x.
fn cluster_rows(mut placed: Vec<Placed>, tolerance: f64) -> Vec<Vec<Placed>> {
    placed.sort_by(|a, b| a.rect.top().total_cmp(&b.rect.top()));
    let mut rows: Vec<Vec<Placed>> = Vec::new();
    for p in placed {
        match rows.last_mut() {
            Some(row) if (p.rect.top() - row[0].rect.top()).abs() <= tolerance => row.push(p),
            _ => rows.push(vec![p]),
        }
    }
    for row in &mut rows {
        row.sort_by(|a, b| a.rect.left().total_cmp(&b.rect.left()));
    }
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
