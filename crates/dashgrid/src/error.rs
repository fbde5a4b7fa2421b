#![forbid(unsafe_code)]

//! dashgrid error model and graceful degradation.
//!
//! # Design Principles
//!
//! 1. **Result everywhere**: no panics on the layout or drop path.
//! 2. **Domain-specific errors**: each subsystem keeps its own typed error
//!    ([`ModelError`], [`EditError`], [`ConfigError`]) so callers can match
//!    on what matters; [`Error`] unifies them for `?`.
//! 3. **Graceful degradation**: every variant maps to a
//!    [`DegradationAction`]. None of them is fatal; the worst outcome is
//!    "no drop, no layout change".

use std::fmt;

use dashgrid_layout::{ConfigError, EditError, ModelError};

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for dashgrid callers.
#[derive(Debug)]
pub enum Error {
    /// A widget or section could not be constructed.
    Model(ModelError),
    /// An editor mutation was refused.
    Edit(EditError),
    /// A layout configuration could not be loaded or validated.
    Config(ConfigError),
}

/// Standard result type for dashgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Abort the drag; the dashboard is unchanged.
    RejectDrop,
    /// Keep the current layout; skip the offending item.
    KeepLayout,
    /// Fall back to `LayoutConfig::default()`.
    UseDefaults,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    #[must_use]
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Model(_) => DegradationAction::KeepLayout,
            Self::Edit(_) => DegradationAction::RejectDrop,
            Self::Config(_) => DegradationAction::UseDefaults,
        }
    }

    /// Error type label for tracing fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Model(_) => "model",
            Self::Edit(_) => "edit",
            Self::Config(_) => "config",
        }
    }

    /// Whether the host can carry on. Always true: no dashgrid error is fatal.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self.degradation() {
            DegradationAction::RejectDrop
            | DegradationAction::KeepLayout
            | DegradationAction::UseDefaults => true,
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(err) => write!(f, "model: {err}"),
            Self::Edit(err) => write!(f, "edit: {err}"),
            Self::Config(err) => write!(f, "config: {err}"),
        }
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectDrop => write!(f, "reject_drop"),
            Self::KeepLayout => write!(f, "keep_layout"),
            Self::UseDefaults => write!(f, "use_defaults"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Edit(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<EditError> for Error {
    fn from(err: EditError) -> Self {
        Self::Edit(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
