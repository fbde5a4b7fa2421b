#![forbid(unsafe_code)]

//! Core: geometry shared by the layout engine and its rendering adapters.
//!
//! # Role in dashgrid
//! `dashgrid-core` holds the pixel-space primitives ([`Rect`], [`Point`],
//! [`Sides`]) that the rendering layer reports and the drop-zone resolver
//! hit-tests against. It has no knowledge of widgets or sections.

pub mod geometry;

pub use geometry::{Point, Rect, Sides};
