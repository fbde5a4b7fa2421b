//! Structured-logging contract: span names, recorded fields, and targets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dashgrid_layout::{
    Dashboard, DragSize, DragState, FitOracle, GeometrySnapshot, LayoutConfig, Point, Rect,
    Section, SectionId, Widget, WidgetId, WidgetSize, layout_section,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Capture layer
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    by_id: HashMap<u64, usize>,
    events: Vec<CapturedEvent>,
}

struct SpanCapture {
    inner: Arc<Mutex<Captured>>,
}

impl SpanCapture {
    fn new() -> (Self, CaptureHandle) {
        let inner = Arc::new(Mutex::new(Captured::default()));
        (
            Self {
                inner: inner.clone(),
            },
            CaptureHandle { inner },
        )
    }
}

struct CaptureHandle {
    inner: Arc<Mutex<Captured>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.inner.lock().unwrap().spans.clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.inner.lock().unwrap().events.clone()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        for field in attrs.metadata().fields() {
            fields.entry(field.name().to_string()).or_default();
        }
        let mut captured = self.inner.lock().unwrap();
        let index = captured.spans.len();
        captured.spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields,
        });
        captured.by_id.insert(id.into_u64(), index);
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        values.record(&mut visitor);
        let mut captured = self.inner.lock().unwrap();
        if let Some(&index) = captured.by_id.get(&id.into_u64()) {
            captured.spans[index].fields.extend(visitor.0);
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.inner.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F, R>(f: F) -> (R, CaptureHandle)
where
    F: FnOnce() -> R,
{
    let (layer, handle) = SpanCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, handle)
}

// ============================================================================
// Helpers
// ============================================================================

fn w(id: &str, size: WidgetSize) -> Widget {
    Widget::new(WidgetId::new(id).unwrap(), size)
}

fn sid(id: &str) -> SectionId {
    SectionId::new(id).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn layout_section_span_records_rows() {
    let section = Section::widgets(
        sid("main"),
        vec![w("a", WidgetSize::M), w("b", WidgetSize::L)],
    );
    let (layout, handle) =
        with_captured_tracing(|| layout_section(&section, 1300.0, &LayoutConfig::default()));

    let spans = handle.spans();
    let span = spans
        .iter()
        .find(|s| s.name == "layout.section")
        .expect("layout.section span");
    assert_eq!(span.fields["section"], "main");
    assert_eq!(span.fields["col_count"], "4");
    assert_eq!(span.fields["rows"], layout.row_count().to_string());
}

#[test]
fn missing_section_warns_under_fit_target() {
    let sections = vec![Section::widgets(sid("a"), vec![])];
    let config = LayoutConfig::default();
    let (fits, handle) = with_captured_tracing(|| {
        FitOracle::new(&sections, 1300.0, &config).would_fit(DragSize::Filter, &sid("ghost"))
    });
    assert!(fits);
    let warnings: Vec<CapturedEvent> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].target, "dashgrid.fit");
    assert_eq!(warnings[0].fields["section"], "ghost");
}

#[test]
fn drop_resolve_span_records_hit_kind() {
    let dashboard = Dashboard::with_sections(
        vec![Section::widgets(sid("a"), vec![w("m", WidgetSize::M)])],
        1300.0,
        LayoutConfig::default(),
    )
    .unwrap();
    let geometry = GeometrySnapshot::new(Rect::new(0.0, 0.0, 1300.0, 600.0))
        .with_section(sid("a"), Rect::new(0.0, 100.0, 1300.0, 200.0))
        .with_widget(WidgetId::new("m").unwrap(), Rect::new(0.0, 100.0, 1300.0, 200.0));

    let (hit, handle) = with_captured_tracing(|| {
        dashboard.resolve_drop(Point::new(200.0, 200.0), &geometry, &DragState::Idle)
    });
    assert!(hit.is_some());

    let spans = handle.spans();
    let span = spans
        .iter()
        .find(|s| s.name == "drop.resolve")
        .expect("drop.resolve span");
    assert_eq!(span.fields["hit"], "within_section");
    assert_eq!(span.fields["zones"], "5");
}

#[test]
fn stale_section_geometry_warns_under_drop_target() {
    let dashboard = Dashboard::with_sections(
        vec![Section::widgets(sid("a"), vec![])],
        1300.0,
        LayoutConfig::default(),
    )
    .unwrap();
    let geometry = GeometrySnapshot::new(Rect::new(0.0, 0.0, 1300.0, 600.0));
    let (zones, handle) =
        with_captured_tracing(|| dashboard.drop_zones(&geometry, &DragState::Idle));
    assert!(zones.is_empty());
    assert!(
        handle
            .events()
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.target == "dashgrid.drop")
    );
}
