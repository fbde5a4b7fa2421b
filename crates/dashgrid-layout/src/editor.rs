#![forbid(unsafe_code)]

//! In-memory dashboard editor.
//!
//! [`Dashboard`] owns the section sequence, the container width, and the
//! [`LayoutConfig`]. Read-side calls (layout, fit, drop resolution) borrow
//! that state; mutations take `&mut self`, so nothing can change between a
//! resolve and the commit that follows it.
//!
//! # Invariants
//!
//! 1. Section ids are unique; widget ids are unique across all sections.
//! 2. A widget lives in exactly one section.
//! 3. Every mutation either applies completely or leaves the dashboard
//!    untouched.
//!
//! # Positions
//!
//! Positions are insertion indices into the sequence as it is *before* the
//! mutation, matching what [`DropZone::position`] reports. Moves remove
//! first and shift the index down by one when the source sat before it.

use std::fmt;

use dashgrid_core::geometry::Point;
use rustc_hash::FxHashSet;

use crate::config::LayoutConfig;
use crate::drop_zone::{DragState, DropZone, DropZoneKind, DropZoneResolver, GeometryProvider};
use crate::fit::{DragSize, FitOracle};
use crate::model::{FilterGroup, Section, SectionId, Widget, WidgetId};
use crate::section_layout::{Layout, layout_section};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by editor mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    SectionNotFound(SectionId),
    WidgetNotFound(WidgetId),
    DuplicateWidget(WidgetId),
    DuplicateSection(SectionId),
    PositionOutOfRange { position: usize, len: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionNotFound(id) => write!(f, "section {id} not found"),
            Self::WidgetNotFound(id) => write!(f, "widget {id} not found"),
            Self::DuplicateWidget(id) => write!(f, "widget {id} already exists"),
            Self::DuplicateSection(id) => write!(f, "section {id} already exists"),
            Self::PositionOutOfRange { position, len } => {
                write!(f, "position {position} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for EditError {}

// ---------------------------------------------------------------------------
// Drop commits
// ---------------------------------------------------------------------------

/// What is being dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    NewWidget(Widget),
    MoveWidget(WidgetId),
    MoveSection(SectionId),
    NewFilterGroup(FilterGroup),
}

/// Why a drop was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The zone was flagged invalid.
    InvalidTarget,
    /// The zone refers to something that no longer exists.
    StaleTarget,
    /// The payload cannot land in this kind of zone.
    IncompatiblePayload,
}

impl RejectReason {
    fn from_edit(err: &EditError) -> Self {
        match err {
            EditError::SectionNotFound(_)
            | EditError::WidgetNotFound(_)
            | EditError::PositionOutOfRange { .. } => RejectReason::StaleTarget,
            EditError::DuplicateWidget(_) | EditError::DuplicateSection(_) => {
                RejectReason::IncompatiblePayload
            }
        }
    }
}

/// Result of [`Dashboard::apply_drop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    WidgetInserted { section_id: SectionId, position: usize },
    WidgetMoved { section_id: SectionId, position: usize },
    SectionCreated { section_id: SectionId, position: usize },
    SectionMoved { section_id: SectionId, position: usize },
    Rejected(RejectReason),
}

impl DropOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, DropOutcome::Rejected(_))
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Owner of the section sequence.
#[derive(Debug, Clone)]
pub struct Dashboard {
    sections: Vec<Section>,
    container_width: f64,
    config: LayoutConfig,
    generated_sections: u64,
}

impl Dashboard {
    /// An empty dashboard.
    #[must_use]
    pub fn new(container_width: f64, config: LayoutConfig) -> Self {
        Self {
            sections: Vec::new(),
            container_width,
            config,
            generated_sections: 0,
        }
    }

    /// A dashboard over existing sections, rejecting duplicate ids.
    pub fn with_sections(
        sections: Vec<Section>,
        container_width: f64,
        config: LayoutConfig,
    ) -> Result<Self, EditError> {
        let mut section_ids = FxHashSet::default();
        let mut widget_ids = FxHashSet::default();
        for section in &sections {
            if !section_ids.insert(section.id()) {
                return Err(EditError::DuplicateSection(section.id().clone()));
            }
            for widget in section.items() {
                if !widget_ids.insert(&widget.id) {
                    return Err(EditError::DuplicateWidget(widget.id.clone()));
                }
            }
        }
        Ok(Self {
            sections,
            container_width,
            config,
            generated_sections: 0,
        })
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    #[must_use]
    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Record a resize. Subsequent layouts and resolutions use `width`.
    pub fn set_container_width(&mut self, width: f64) {
        tracing::debug!(
            target: "dashgrid.editor",
            from = self.container_width,
            to = width,
            "container width changed"
        );
        self.container_width = width;
    }

    // -- queries -----------------------------------------------------------

    #[must_use]
    pub fn layout(&self, id: &SectionId) -> Option<Layout> {
        self.section(id)
            .map(|s| layout_section(s, self.container_width, &self.config))
    }

    /// Layouts of every section, in order.
    #[must_use]
    pub fn layouts(&self) -> Vec<Layout> {
        self.sections
            .iter()
            .map(|s| layout_section(s, self.container_width, &self.config))
            .collect()
    }

    #[must_use]
    pub fn would_fit(&self, size: DragSize, id: &SectionId) -> bool {
        FitOracle::new(&self.sections, self.container_width, &self.config).would_fit(size, id)
    }

    pub fn drop_zones<G>(&self, geometry: &G, drag: &DragState) -> Vec<DropZone>
    where
        G: GeometryProvider + ?Sized,
    {
        self.resolver().zones(geometry, drag)
    }

    pub fn resolve_drop<G>(&self, point: Point, geometry: &G, drag: &DragState) -> Option<DropZone>
    where
        G: GeometryProvider + ?Sized,
    {
        self.resolver().resolve(point, geometry, drag)
    }

    fn resolver(&self) -> DropZoneResolver<'_> {
        DropZoneResolver::new(&self.sections, self.container_width, &self.config)
    }

    // -- lookups -----------------------------------------------------------

    fn section_index(&self, id: &SectionId) -> Result<usize, EditError> {
        self.sections
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| EditError::SectionNotFound(id.clone()))
    }

    /// `(section index, widget index)` of `id`.
    fn locate_widget(&self, id: &WidgetId) -> Result<(usize, usize), EditError> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(s, section)| {
                section
                    .items()
                    .iter()
                    .position(|w| &w.id == id)
                    .map(|k| (s, k))
            })
            .ok_or_else(|| EditError::WidgetNotFound(id.clone()))
    }

    fn has_widget(&self, id: &WidgetId) -> bool {
        self.locate_widget(id).is_ok()
    }

    fn check_new_section(&self, section: &Section) -> Result<(), EditError> {
        if self.section(section.id()).is_some() {
            return Err(EditError::DuplicateSection(section.id().clone()));
        }
        let mut seen = FxHashSet::default();
        for widget in section.items() {
            if !seen.insert(&widget.id) || self.has_widget(&widget.id) {
                return Err(EditError::DuplicateWidget(widget.id.clone()));
            }
        }
        Ok(())
    }

    /// Next free `section-N` id and its counter value. Does not reserve it.
    fn peek_section_id(&self) -> (u64, SectionId) {
        let mut n = self.generated_sections;
        loop {
            n += 1;
            let id = SectionId::generated(n);
            if self.section(&id).is_none() {
                return (n, id);
            }
        }
    }

    /// Insert a section under a fresh generated id. The counter only
    /// advances once the insert has been validated.
    fn insert_generated_section(
        &mut self,
        position: usize,
        make: impl FnOnce(SectionId) -> Section,
    ) -> Result<DropOutcome, EditError> {
        let (n, id) = self.peek_section_id();
        let section = make(id.clone());
        self.insert_section(position, section)?;
        self.generated_sections = n;
        Ok(DropOutcome::SectionCreated {
            section_id: id,
            position,
        })
    }

    // -- mutations ---------------------------------------------------------

    pub fn insert_section(&mut self, position: usize, section: Section) -> Result<(), EditError> {
        check_position(position, self.sections.len())?;
        self.check_new_section(&section)?;
        tracing::debug!(
            target: "dashgrid.editor",
            section = %section.id(),
            position,
            "insert section"
        );
        self.sections.insert(position, section);
        Ok(())
    }

    pub fn remove_section(&mut self, id: &SectionId) -> Result<Section, EditError> {
        let index = self.section_index(id)?;
        tracing::debug!(target: "dashgrid.editor", section = %id, "remove section");
        Ok(self.sections.remove(index))
    }

    /// Move a section; returns its final index.
    pub fn move_section(&mut self, id: &SectionId, position: usize) -> Result<usize, EditError> {
        let from = self.section_index(id)?;
        check_position(position, self.sections.len())?;
        let to = adjusted(from, position);
        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        tracing::debug!(target: "dashgrid.editor", section = %id, from, to, "move section");
        Ok(to)
    }

    pub fn insert_widget(
        &mut self,
        section_id: &SectionId,
        position: usize,
        widget: Widget,
    ) -> Result<(), EditError> {
        let s = self.section_index(section_id)?;
        check_position(position, self.sections[s].items().len())?;
        if self.has_widget(&widget.id) {
            return Err(EditError::DuplicateWidget(widget.id.clone()));
        }
        tracing::debug!(
            target: "dashgrid.editor",
            widget = %widget.id,
            section = %section_id,
            position,
            "insert widget"
        );
        self.sections[s].items_mut().insert(position, widget);
        Ok(())
    }

    pub fn remove_widget(&mut self, id: &WidgetId) -> Result<Widget, EditError> {
        let (s, k) = self.locate_widget(id)?;
        tracing::debug!(target: "dashgrid.editor", widget = %id, "remove widget");
        Ok(self.sections[s].items_mut().remove(k))
    }

    /// Move a widget into `section_id`; returns its final index there.
    pub fn move_widget(
        &mut self,
        id: &WidgetId,
        section_id: &SectionId,
        position: usize,
    ) -> Result<usize, EditError> {
        let (from_s, from_k) = self.locate_widget(id)?;
        let to_s = self.section_index(section_id)?;
        check_position(position, self.sections[to_s].items().len())?;

        let to = if from_s == to_s {
            adjusted(from_k, position)
        } else {
            position
        };
        let widget = self.sections[from_s].items_mut().remove(from_k);
        self.sections[to_s].items_mut().insert(to, widget);
        tracing::debug!(
            target: "dashgrid.editor",
            widget = %id,
            section = %section_id,
            to,
            "move widget"
        );
        Ok(to)
    }

    // -- drop commit -------------------------------------------------------

    /// Commit a drop onto a previously resolved zone.
    ///
    /// Rejections never mutate the dashboard.
    pub fn apply_drop(&mut self, zone: &DropZone, payload: DropPayload) -> DropOutcome {
        let outcome = if zone.is_invalid {
            DropOutcome::Rejected(RejectReason::InvalidTarget)
        } else if zone.kind.is_within() {
            self.drop_within(zone, payload)
        } else {
            self.drop_between(zone.position, payload)
        };
        tracing::debug!(
            target: "dashgrid.editor",
            zone = %zone.kind,
            position = zone.position,
            ?outcome,
            "drop committed"
        );
        outcome
    }

    fn drop_within(&mut self, zone: &DropZone, payload: DropPayload) -> DropOutcome {
        let Some(section_id) = zone.section_id.clone() else {
            return DropOutcome::Rejected(RejectReason::StaleTarget);
        };
        let kind_matches = self.section(&section_id).is_some_and(|s| {
            matches!(
                (zone.kind, s),
                (DropZoneKind::WithinSection, Section::Widgets { .. })
                    | (DropZoneKind::WithinFilterGroup, Section::FilterGroup { .. })
            )
        });
        if !kind_matches {
            return DropOutcome::Rejected(RejectReason::StaleTarget);
        }

        let result = match payload {
            DropPayload::NewWidget(widget) => self
                .insert_widget(&section_id, zone.position, widget)
                .map(|()| DropOutcome::WidgetInserted {
                    section_id: section_id.clone(),
                    position: zone.position,
                }),
            DropPayload::MoveWidget(id) => self
                .move_widget(&id, &section_id, zone.position)
                .map(|position| DropOutcome::WidgetMoved {
                    section_id: section_id.clone(),
                    position,
                }),
            DropPayload::MoveSection(_) | DropPayload::NewFilterGroup(_) => {
                return DropOutcome::Rejected(RejectReason::IncompatiblePayload);
            }
        };
        result.unwrap_or_else(|err| DropOutcome::Rejected(RejectReason::from_edit(&err)))
    }

    fn drop_between(&mut self, position: usize, payload: DropPayload) -> DropOutcome {
        let result = match payload {
            DropPayload::NewWidget(widget) => self
                .insert_generated_section(position, |id| Section::widgets(id, vec![widget])),
            DropPayload::NewFilterGroup(group) => self
                .insert_generated_section(position, |id| Section::filter_group(id, group)),
            DropPayload::MoveWidget(widget_id) => self.widget_to_new_section(&widget_id, position),
            DropPayload::MoveSection(section_id) => self
                .move_section(&section_id, position)
                .map(|position| DropOutcome::SectionMoved {
                    section_id,
                    position,
                }),
        };
        result.unwrap_or_else(|err| DropOutcome::Rejected(RejectReason::from_edit(&err)))
    }

    /// Pull a widget out of its section into a fresh section at `position`.
    fn widget_to_new_section(
        &mut self,
        widget_id: &WidgetId,
        position: usize,
    ) -> Result<DropOutcome, EditError> {
        let (s, k) = self.locate_widget(widget_id)?;
        check_position(position, self.sections.len())?;
        let (n, id) = self.peek_section_id();
        self.generated_sections = n;
        let widget = self.sections[s].items_mut().remove(k);
        self.sections
            .insert(position, Section::widgets(id.clone(), vec![widget]));
        Ok(DropOutcome::SectionCreated {
            section_id: id,
            position,
        })
    }
}

fn check_position(position: usize, len: usize) -> Result<(), EditError> {
    if position > len {
        return Err(EditError::PositionOutOfRange { position, len });
    }
    Ok(())
}

/// Insertion index after removing the element at `from`.
fn adjusted(from: usize, position: usize) -> usize {
    if from < position { position - 1 } else { position }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
