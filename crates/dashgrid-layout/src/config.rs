#![forbid(unsafe_code)]

//! Layout-as-data configuration.
//!
//! Every tunable constant used by the composer, the packer, and the
//! drop-zone resolver lives in a single [`LayoutConfig`] that can be loaded
//! from TOML or JSON. Every level is `serde(default)`, so a file only needs
//! to name the values it overrides.
//!
//! # Loading
//!
//! ```toml
//! # dashgrid.toml
//! [breakpoints]
//! lg = 1280.0
//!
//! [row_block]
//! tolerance_rem = 3.0
//!
//! [drop_zones]
//! edge_margin_px = 12.0
//! ```
//!
//! ```rust,ignore
//! let config = LayoutConfig::from_toml_file("dashgrid.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! `LayoutConfig::default()` reproduces the stock dashboard: breakpoints at
//! 600/900/1200 px, 2 rem rail tolerance, 0.75 rem rail gap, four rail slots.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::responsive::Breakpoints;

// ---------------------------------------------------------------------------
// Top-level LayoutConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for layout and drop resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width thresholds for the column tiers.
    pub breakpoints: Breakpoints,
    /// RowBlock composition parameters.
    pub row_block: RowBlockConfig,
    /// Drop-zone geometry parameters.
    pub drop_zones: DropZoneConfig,
}

impl LayoutConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns every problem found. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.breakpoints.is_ordered() {
            errors.push(format!(
                "breakpoints must be positive and strictly increasing, got sm={} md={} lg={}",
                self.breakpoints.sm, self.breakpoints.md, self.breakpoints.lg
            ));
        }

        if !self.row_block.tolerance_rem.is_finite() || self.row_block.tolerance_rem < 0.0 {
            errors.push(format!(
                "row_block.tolerance_rem must be >= 0, got {}",
                self.row_block.tolerance_rem
            ));
        }
        if !self.row_block.rail_gap_rem.is_finite() || self.row_block.rail_gap_rem < 0.0 {
            errors.push(format!(
                "row_block.rail_gap_rem must be >= 0, got {}",
                self.row_block.rail_gap_rem
            ));
        }
        if self.row_block.max_rail_items == 0 || self.row_block.max_rail_items > 4 {
            errors.push(format!(
                "row_block.max_rail_items must be in 1..=4, got {}",
                self.row_block.max_rail_items
            ));
        }

        let zones = &self.drop_zones;
        for (name, value) in [
            ("drop_zones.edge_margin_px", zones.edge_margin_px),
            ("drop_zones.row_tolerance_px", zones.row_tolerance_px),
            ("drop_zones.between_band_px", zones.between_band_px),
            ("drop_zones.leading_zone_px", zones.leading_zone_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be >= 0, got {value}"));
            }
        }

        errors
    }

    /// Return `self` if it validates, otherwise every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"dashgrid-layout-config-v1","bp_sm":{},"bp_md":{},"bp_lg":{},"tolerance_rem":{},"rail_gap_rem":{},"max_rail_items":{},"edge_margin_px":{},"between_band_px":{}}}"#,
            self.breakpoints.sm,
            self.breakpoints.md,
            self.breakpoints.lg,
            self.row_block.tolerance_rem,
            self.row_block.rail_gap_rem,
            self.row_block.max_rail_items,
            self.drop_zones.edge_margin_px,
            self.drop_zones.between_band_px,
        )
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// RowBlock composition parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowBlockConfig {
    /// Slack added to the main widget's height when filling the rail. Default: 2.0.
    pub tolerance_rem: f64,
    /// Vertical gap charged between consecutive rail items. Default: 0.75.
    pub rail_gap_rem: f64,
    /// Maximum rail length. Default: 4.
    pub max_rail_items: usize,
}

impl Default for RowBlockConfig {
    fn default() -> Self {
        Self {
            tolerance_rem: 2.0,
            rail_gap_rem: 0.75,
            max_rail_items: 4,
        }
    }
}

/// Drop-zone geometry parameters, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropZoneConfig {
    /// Margin added around widget rectangles for before/after zones. Default: 8.
    pub edge_margin_px: f64,
    /// Max top-edge difference for two widgets to share a visual row. Default: 4.
    pub row_tolerance_px: f64,
    /// Half-height of the zone straddling each section edge. Default: 16.
    pub between_band_px: f64,
    /// Extra height of the zone above the first section. Default: 64.
    pub leading_zone_px: f64,
}

impl Default for DropZoneConfig {
    fn default() -> Self {
        Self {
            edge_margin_px: 8.0,
            row_tolerance_px: 4.0,
            between_band_px: 16.0,
            leading_zone_px: 64.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a layout configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
