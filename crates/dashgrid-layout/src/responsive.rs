#![forbid(unsafe_code)]

//! Responsive column resolution: map a container width to a column count.
//!
//! [`Breakpoints`] holds the three width thresholds that split the width
//! axis into four [`Breakpoint`] tiers. Each tier has a fixed column count
//! from 1 to 4.
//!
//! # Usage
//!
//! ```
//! use dashgrid_layout::responsive::{col_count, Breakpoint, Breakpoints};
//!
//! assert_eq!(col_count(1280.0), 4);
//! assert_eq!(col_count(640.0), 2);
//! assert_eq!(Breakpoints::default().classify(950.0), Breakpoint::Md);
//! ```
//!
//! # Invariants
//!
//! 1. Thresholds are evaluated high to low; a width equal to a threshold
//!    belongs to the larger tier.
//! 2. Column count is monotonically non-decreasing in width.
//! 3. Non-finite or negative widths classify as [`Breakpoint::Xs`].
//!
//! # Failure Modes
//!
//! None. Misordered thresholds are reported by
//! [`crate::config::LayoutConfig::validate`], not here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width tier, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 4] = [Breakpoint::Xs, Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg];

    /// Number of grid columns at this tier.
    #[must_use]
    pub const fn columns(self) -> u8 {
        match self {
            Breakpoint::Xs => 1,
            Breakpoint::Sm => 2,
            Breakpoint::Md => 3,
            Breakpoint::Lg => 4,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        };
        f.write_str(name)
    }
}

/// Minimum container widths (px) at which each tier starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub sm: f64,
    pub md: f64,
    pub lg: f64,
}

impl Breakpoints {
    pub const DEFAULT: Breakpoints = Breakpoints {
        sm: 600.0,
        md: 900.0,
        lg: 1200.0,
    };

    /// Classify a container width.
    #[must_use]
    pub fn classify(&self, width: f64) -> Breakpoint {
        if width >= self.lg {
            Breakpoint::Lg
        } else if width >= self.md {
            Breakpoint::Md
        } else if width >= self.sm {
            Breakpoint::Sm
        } else {
            Breakpoint::Xs
        }
    }

    /// Column count for a container width.
    #[must_use]
    pub fn col_count(&self, width: f64) -> u8 {
        self.classify(width).columns()
    }

    /// Whether thresholds are finite, positive, and strictly increasing.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        [self.sm, self.md, self.lg]
            .iter()
            .all(|t| t.is_finite() && *t > 0.0)
            && self.sm < self.md
            && self.md < self.lg
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Column count for a container width using the default thresholds.
#[must_use]
pub fn col_count(width: f64) -> u8 {
    Breakpoints::DEFAULT.col_count(width)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
