#![forbid(unsafe_code)]

//! Fit validation: would a candidate widget join a section without adding a row?
//!
//! [`FitOracle::would_fit`] lays the target section out twice, once as-is
//! and once with a synthetic widget of the candidate size appended, and
//! compares row counts. Both passes go through
//! [`layout_section`](crate::section_layout::layout_section), so the answer
//! always agrees with what the renderer will draw.
//!
//! # Failure Modes
//!
//! The oracle never surfaces errors. Internal faults (unknown section,
//! unconstructible candidate) are logged at `warn` under `dashgrid.fit` and
//! answered with `true` so a drop is never blocked by the oracle itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::model::{ModelError, Section, SectionId, Widget, WidgetId, WidgetSize};
use crate::section_layout::layout_section;

/// Identifier given to the synthetic widget appended during a fit check.
pub const CANDIDATE_WIDGET_ID: &str = "__candidate__";

/// Size of the thing being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSize {
    /// A widget of the given size.
    Widget(WidgetSize),
    /// A filter chip. Filters never fit into a widget grid.
    Filter,
}

impl From<WidgetSize> for DragSize {
    fn from(size: WidgetSize) -> Self {
        DragSize::Widget(size)
    }
}

impl fmt::Display for DragSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragSize::Widget(size) => write!(f, "{size}"),
            DragSize::Filter => f.write_str("FILTER"),
        }
    }
}

/// Internal reasons a fit check could not be computed.
#[derive(Debug, Clone, PartialEq)]
enum FitFault {
    SectionNotFound(SectionId),
    Candidate(ModelError),
}

impl fmt::Display for FitFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitFault::SectionNotFound(id) => write!(f, "section {id} not found"),
            FitFault::Candidate(err) => write!(f, "candidate widget: {err}"),
        }
    }
}

/// Row-count oracle over a borrowed section sequence.
#[derive(Debug, Clone, Copy)]
pub struct FitOracle<'a> {
    sections: &'a [Section],
    container_width: f64,
    config: &'a LayoutConfig,
}

impl<'a> FitOracle<'a> {
    #[must_use]
    pub fn new(sections: &'a [Section], container_width: f64, config: &'a LayoutConfig) -> Self {
        Self {
            sections,
            container_width,
            config,
        }
    }

    /// Whether appending a widget of `size` to `target` keeps its row count.
    ///
    /// `Filter` never fits. Faults fail open.
    #[must_use]
    pub fn would_fit(&self, size: DragSize, target: &SectionId) -> bool {
        match self.check(size, target) {
            Ok(fits) => fits,
            Err(fault) => {
                tracing::warn!(
                    target: "dashgrid.fit",
                    section = %target,
                    candidate = %size,
                    %fault,
                    "fit check failed; allowing drop"
                );
                true
            }
        }
    }

    fn check(&self, size: DragSize, target: &SectionId) -> Result<bool, FitFault> {
        let section = self
            .sections
            .iter()
            .find(|s| s.id() == target)
            .ok_or_else(|| FitFault::SectionNotFound(target.clone()))?;

        let size = match size {
            DragSize::Filter => return Ok(false),
            DragSize::Widget(size) => size,
        };

        let candidate =
            Widget::new(WidgetId::new(CANDIDATE_WIDGET_ID).map_err(FitFault::Candidate)?, size);
        let mut widgets = section.items().to_vec();
        widgets.push(candidate);
        let extended = Section::widgets(section.id().clone(), widgets);

        let before = layout_section(section, self.container_width, self.config).row_count();
        let after = layout_section(&extended, self.container_width, self.config).row_count();
        tracing::trace!(
            target: "dashgrid.fit",
            section = %target,
            before,
            after,
            "fit check"
        );
        Ok(after == before)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
