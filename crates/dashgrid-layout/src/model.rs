//! Dashboard data model: widgets, sections, and filter groups.
//!
//! These are plain data entities. Layout, fit validation, and drop-zone
//! resolution all operate on them without mutating them; the editor
//! ([`crate::editor`]) is the only owner that splices them.
//!
//! # Invariants
//!
//! 1. Widget and section identifiers are non-empty.
//! 2. `min_col_span` is in `1..=MAX_COLUMNS`.
//! 3. `min_height_rem` is finite and strictly positive.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest column count any breakpoint produces.
pub const MAX_COLUMNS: u8 = 4;

/// Stable identifier of a widget.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WidgetId(String);

impl WidgetId {
    /// Create a widget id, rejecting empty strings.
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WidgetId {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<WidgetId> for String {
    fn from(id: WidgetId) -> Self {
        id.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Create a section id, rejecting empty strings.
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SectionId {
    /// Editor-generated id of the form `section-N`.
    pub(crate) fn generated(n: u64) -> Self {
        Self(format!("section-{n}"))
    }
}

impl TryFrom<String> for SectionId {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared widget size. Each size maps to a preset of layout constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetSize {
    Xs,
    S,
    M,
    L,
    XlRow,
    XlFill,
}

impl WidgetSize {
    pub const ALL: [WidgetSize; 6] = [
        WidgetSize::Xs,
        WidgetSize::S,
        WidgetSize::M,
        WidgetSize::L,
        WidgetSize::XlRow,
        WidgetSize::XlFill,
    ];

    /// Minimum column span for this size.
    #[must_use]
    pub const fn min_col_span(self) -> u8 {
        match self {
            WidgetSize::Xs | WidgetSize::S => 1,
            WidgetSize::M => 2,
            WidgetSize::L => 3,
            WidgetSize::XlRow | WidgetSize::XlFill => 4,
        }
    }

    /// Minimum height in rem for this size.
    #[must_use]
    pub const fn min_height_rem(self) -> f64 {
        match self {
            WidgetSize::Xs => 6.0,
            WidgetSize::S => 8.0,
            WidgetSize::M => 12.0,
            WidgetSize::L | WidgetSize::XlRow => 24.0,
            WidgetSize::XlFill => 32.0,
        }
    }

    #[must_use]
    pub const fn height_mode(self) -> HeightMode {
        match self {
            WidgetSize::XlFill => HeightMode::FillViewport,
            _ => HeightMode::StretchRow,
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidgetSize::Xs => "XS",
            WidgetSize::S => "S",
            WidgetSize::M => "M",
            WidgetSize::L => "L",
            WidgetSize::XlRow => "XL_row",
            WidgetSize::XlFill => "XL_fill",
        };
        f.write_str(name)
    }
}

/// How a widget's height relates to its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightMode {
    /// Grow to the tallest item in the row.
    #[default]
    StretchRow,
    /// Fill the visible viewport height.
    FillViewport,
}

/// A user-configurable dashboard panel.
///
/// Deserialization goes through [`Widget::with_constraints`], so decoded
/// widgets hold the same invariants as constructed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWidget")]
pub struct Widget {
    pub id: WidgetId,
    pub size: WidgetSize,
    min_col_span: u8,
    min_height_rem: f64,
    pub height_mode: HeightMode,
    pub title: String,
}

impl Widget {
    /// Create a widget whose constraints come from the size preset.
    #[must_use]
    pub fn new(id: WidgetId, size: WidgetSize) -> Self {
        Self {
            id,
            size,
            min_col_span: size.min_col_span(),
            min_height_rem: size.min_height_rem(),
            height_mode: size.height_mode(),
            title: String::new(),
        }
    }

    /// Create a widget with explicit constraints.
    pub fn with_constraints(
        id: WidgetId,
        size: WidgetSize,
        min_col_span: u8,
        min_height_rem: f64,
        height_mode: HeightMode,
    ) -> Result<Self, ModelError> {
        if !(1..=MAX_COLUMNS).contains(&min_col_span) {
            return Err(ModelError::InvalidColSpan {
                widget: id,
                span: min_col_span,
            });
        }
        if !min_height_rem.is_finite() || min_height_rem <= 0.0 {
            return Err(ModelError::InvalidHeight {
                widget: id,
                height_rem: min_height_rem,
            });
        }
        Ok(Self {
            id,
            size,
            min_col_span,
            min_height_rem,
            height_mode,
            title: String::new(),
        })
    }

    /// Set the title (builder pattern).
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub const fn min_col_span(&self) -> u8 {
        self.min_col_span
    }

    #[must_use]
    pub const fn min_height_rem(&self) -> f64 {
        self.min_height_rem
    }

    /// Declared span capped at the current column count.
    #[must_use]
    pub fn effective_span(&self, col_count: u8) -> u8 {
        self.min_col_span.min(col_count.max(1))
    }
}

/// Unchecked wire form of [`Widget`].
#[derive(Deserialize)]
struct RawWidget {
    id: WidgetId,
    size: WidgetSize,
    min_col_span: u8,
    min_height_rem: f64,
    #[serde(default)]
    height_mode: HeightMode,
    #[serde(default)]
    title: String,
}

impl TryFrom<RawWidget> for Widget {
    type Error = ModelError;

    fn try_from(raw: RawWidget) -> Result<Self, Self::Error> {
        let widget = Self::with_constraints(
            raw.id,
            raw.size,
            raw.min_col_span,
            raw.min_height_rem,
            raw.height_mode,
        )?;
        Ok(widget.titled(raw.title))
    }
}

/// One filter chip displayed in a filter group header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChip {
    pub id: String,
    pub label: String,
}

/// A group of filters with the widgets they apply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: String,
    pub title: String,
    pub filters: Vec<FilterChip>,
    pub widgets: Vec<Widget>,
}

/// Discriminates the two section flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Widgets,
    FilterGroup,
}

/// A top-level band of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Widgets { id: SectionId, widgets: Vec<Widget> },
    FilterGroup { id: SectionId, group: FilterGroup },
}

impl Section {
    /// Convenience constructor for a widget section.
    #[must_use]
    pub fn widgets(id: SectionId, widgets: Vec<Widget>) -> Self {
        Section::Widgets { id, widgets }
    }

    /// Convenience constructor for a filter-group section.
    #[must_use]
    pub fn filter_group(id: SectionId, group: FilterGroup) -> Self {
        Section::FilterGroup { id, group }
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        match self {
            Section::Widgets { id, .. } | Section::FilterGroup { id, .. } => id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Widgets { .. } => SectionKind::Widgets,
            Section::FilterGroup { .. } => SectionKind::FilterGroup,
        }
    }

    /// The widgets laid out by this section, in source order.
    #[must_use]
    pub fn items(&self) -> &[Widget] {
        match self {
            Section::Widgets { widgets, .. } => widgets,
            Section::FilterGroup { group, .. } => &group.widgets,
        }
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Widget> {
        match self {
            Section::Widgets { widgets, .. } => widgets,
            Section::FilterGroup { group, .. } => &mut group.widgets,
        }
    }
}

/// Errors raised while constructing model values.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    EmptyId,
    InvalidColSpan { widget: WidgetId, span: u8 },
    InvalidHeight { widget: WidgetId, height_rem: f64 },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identifier must not be empty"),
            Self::InvalidColSpan { widget, span } => write!(
                f,
                "widget {widget}: min column span {span} outside 1..={MAX_COLUMNS}"
            ),
            Self::InvalidHeight { widget, height_rem } => write!(
                f,
                "widget {widget}: min height {height_rem} rem must be finite and positive"
            ),
        }
    }
}

impl std::error::Error for ModelError {}
