#![forbid(unsafe_code)]

//! Responsive dashboard layout and drop-target resolution.
//!
//! The pipeline for one section is:
//!
//! ```text
//! container width ──► responsive::col_count
//!                          │
//! section widgets ──► row_block::compose ──► packer::pack ──► Layout
//! ```
//!
//! [`fit::FitOracle`] reuses that pipeline to decide whether a dragged
//! widget would add a row, and [`drop_zone::DropZoneResolver`] combines it
//! with rendered geometry to find where a pointer would drop.
//! [`editor::Dashboard`] owns the sections and commits drops.
//!
//! Everything here is synchronous and pure apart from the editor's
//! mutations. Layouts are recomputed on every call; nothing is cached
//! between calls.

pub mod config;
pub mod drop_zone;
pub mod editor;
pub mod fit;
pub mod model;
pub mod packer;
pub mod responsive;
pub mod row_block;
pub mod section_layout;

pub use config::{ConfigError, DropZoneConfig, LayoutConfig, RowBlockConfig};
pub use dashgrid_core::geometry::{Point, Rect, Sides};
pub use drop_zone::{
    DragState, DropZone, DropZoneKind, DropZoneResolver, GeometryProvider, GeometrySnapshot,
};
pub use editor::{Dashboard, DropOutcome, DropPayload, EditError, RejectReason};
pub use fit::{DragSize, FitOracle};
pub use model::{
    FilterChip, FilterGroup, HeightMode, MAX_COLUMNS, ModelError, Section, SectionId, SectionKind,
    Widget, WidgetId, WidgetSize,
};
pub use packer::{Cell, Row, pack};
pub use responsive::{Breakpoint, Breakpoints, col_count};
pub use row_block::{LayoutItem, RowBlock, compose};
pub use section_layout::{FilterGroupMeta, Layout, layout_section};
