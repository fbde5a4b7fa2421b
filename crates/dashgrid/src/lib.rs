#![forbid(unsafe_code)]

//! dashgrid public facade crate.
//!
//! Re-exports the layout engine, drop-zone resolver, and editor from the
//! internal crates, adds a unified [`Error`] with a graceful-degradation
//! mapping, and (with the `logging` feature) a one-call tracing setup.
//!
//! ```
//! use dashgrid::prelude::*;
//!
//! let section = Section::widgets(
//!     SectionId::new("overview").unwrap(),
//!     vec![
//!         Widget::new(WidgetId::new("chart").unwrap(), WidgetSize::L),
//!         Widget::new(WidgetId::new("kpi").unwrap(), WidgetSize::S),
//!     ],
//! );
//! let layout = layout_section(&section, 1280.0, &LayoutConfig::default());
//! assert_eq!(layout.col_count, 4);
//! assert_eq!(layout.row_count(), 1);
//! ```

pub mod error;
#[cfg(feature = "logging")]
pub mod logging;

pub use error::{DegradationAction, Error, Result};

// --- Geometry re-exports ---------------------------------------------------

pub use dashgrid_core::geometry::{Point, Rect, Sides};

// --- Layout re-exports -----------------------------------------------------

pub use dashgrid_layout::{
    Breakpoint, Breakpoints, Cell, ConfigError, DragSize, DragState, DropZone, DropZoneConfig,
    DropZoneKind, DropZoneResolver, EditError, FilterChip, FilterGroup, FilterGroupMeta, FitOracle,
    GeometryProvider, GeometrySnapshot, HeightMode, Layout, LayoutConfig, LayoutItem, ModelError,
    Row, RowBlock, RowBlockConfig, Section, SectionId, SectionKind, Widget, WidgetId, WidgetSize,
    col_count, layout_section,
};

// --- Editor re-exports -----------------------------------------------------

pub use dashgrid_layout::{Dashboard, DropOutcome, DropPayload, RejectReason};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Dashboard, DragSize, DragState, DropOutcome, DropPayload, DropZone, Error,
        GeometryProvider, GeometrySnapshot, Layout, LayoutConfig, Point, Rect, Result, Section,
        SectionId, Widget, WidgetId, WidgetSize, col_count, layout_section,
    };

    pub use crate::{core, layout};
}

pub use dashgrid_core as core;
pub use dashgrid_layout as layout;
