#![forbid(unsafe_code)]

//! Section layout orchestration: width + section contents -> [`Layout`].
//!
//! [`layout_section`] resolves the column count, composes RowBlocks, and
//! packs rows. It is a pure function of the section and width and is the
//! single source of truth for both rendering and fit validation.
//!
//! # Invariants
//!
//! 1. Repeated calls with unchanged inputs return equal layouts.
//! 2. Filter-group layouts carry the group's metadata; widget layouts don't.
//!
//! # Failure Modes
//!
//! None. Empty sections produce a layout with zero rows.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::model::{Section, SectionKind};
use crate::packer::{Row, pack};
use crate::row_block::compose;

/// Pass-through metadata for filter-group sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterGroupMeta {
    pub group_id: String,
    pub title: String,
    pub filter_count: usize,
}

/// Renderable layout of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub col_count: u8,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<FilterGroupMeta>,
}

impl Layout {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Serialize for the rendering layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Lay out one section at the given container width.
#[must_use]
pub fn layout_section(section: &Section, container_width: f64, config: &LayoutConfig) -> Layout {
    let col_count = config.breakpoints.col_count(container_width);
    let _span = tracing::debug_span!(
        "layout.section",
        section = %section.id(),
        col_count,
        rows = tracing::field::Empty,
    )
    .entered();

    let composed = compose(section.items(), col_count, &config.row_block);
    let rows = pack(composed, col_count);
    tracing::Span::current().record("rows", rows.len());

    let container = match section {
        Section::FilterGroup { group, .. } => Some(FilterGroupMeta {
            group_id: group.id.clone(),
            title: group.title.clone(),
            filter_count: group.filters.len(),
        }),
        Section::Widgets { .. } => None,
    };

    tracing::trace!(
        target: "dashgrid.layout",
        section = %section.id(),
        col_count,
        rows = rows.len(),
        "section laid out"
    );

    Layout {
        kind: section.kind(),
        col_count,
        rows,
        container,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
