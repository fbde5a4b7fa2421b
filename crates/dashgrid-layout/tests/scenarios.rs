//! End-to-end dashboard scenarios: layout, fit, resolution, and commit.

use dashgrid_layout::{
    Dashboard, DragSize, DragState, DropOutcome, DropPayload, DropZoneKind, GeometrySnapshot,
    LayoutConfig, LayoutItem, Point, Rect, Section, SectionId, Widget, WidgetId, WidgetSize,
    layout_section,
};

fn w(id: &str, size: WidgetSize) -> Widget {
    Widget::new(WidgetId::new(id).unwrap(), size)
}

fn wid(id: &str) -> WidgetId {
    WidgetId::new(id).unwrap()
}

fn sid(id: &str) -> SectionId {
    SectionId::new(id).unwrap()
}

#[test]
fn three_small_and_one_large_form_a_single_row() {
    let section = Section::widgets(
        sid("main"),
        vec![
            w("s1", WidgetSize::S),
            w("s2", WidgetSize::S),
            w("s3", WidgetSize::S),
            w("l", WidgetSize::L),
        ],
    );
    let layout = layout_section(&section, 1440.0, &LayoutConfig::default());
    assert_eq!(layout.col_count, 4);
    assert_eq!(layout.row_count(), 1);
    let cell = &layout.rows[0].cells[0];
    assert_eq!(cell.span, 4);
    let LayoutItem::RowBlock(block) = &cell.item else {
        panic!("expected a RowBlock, got {:?}", cell.item);
    };
    assert_eq!(block.main.id, wid("l"));
    assert_eq!(block.rail.len(), 3);
    assert_eq!(block.id(), "rowblock:l");
}

#[test]
fn five_extra_small_split_four_and_one() {
    let widgets = (1..=5).map(|n| w(&format!("x{n}"), WidgetSize::Xs)).collect();
    let layout = layout_section(&Section::widgets(sid("s"), widgets), 1440.0, &LayoutConfig::default());
    let spans: Vec<Vec<u8>> = layout
        .rows
        .iter()
        .map(|r| r.cells.iter().map(|c| c.span).collect())
        .collect();
    assert_eq!(spans, vec![vec![1, 1, 1, 1], vec![4]]);
}

#[test]
fn large_does_not_fit_beside_medium() {
    let dashboard = Dashboard::with_sections(
        vec![Section::widgets(sid("s"), vec![w("m", WidgetSize::M)])],
        1440.0,
        LayoutConfig::default(),
    )
    .unwrap();
    assert!(!dashboard.would_fit(DragSize::Widget(WidgetSize::L), &sid("s")));
}

#[test]
fn valid_between_zone_wins_over_invalid_within_zone() {
    let dashboard = Dashboard::with_sections(
        vec![
            Section::widgets(sid("top"), vec![w("m", WidgetSize::M)]),
            Section::widgets(sid("bottom"), vec![w("xl", WidgetSize::XlRow)]),
        ],
        1440.0,
        LayoutConfig::default(),
    )
    .unwrap();
    let geometry = GeometrySnapshot::new(Rect::new(0.0, 0.0, 1440.0, 900.0))
        .with_section(sid("top"), Rect::new(0.0, 0.0, 1440.0, 300.0))
        .with_widget(wid("m"), Rect::new(0.0, 0.0, 1440.0, 300.0))
        .with_section(sid("bottom"), Rect::new(0.0, 320.0, 1440.0, 300.0))
        .with_widget(wid("xl"), Rect::new(0.0, 320.0, 1440.0, 300.0));
    let drag = DragState::PanelDrag {
        size: DragSize::Widget(WidgetSize::L),
    };

    // Near the bottom edge of `top`: inside the M's after zone (invalid for L)
    // and inside the band between the two sections.
    let point = Point::new(1000.0, 295.0);
    let zones = dashboard.drop_zones(&geometry, &drag);
    assert!(zones.iter().any(|z| z.is_invalid && z.contains(point)));

    let hit = dashboard.resolve_drop(point, &geometry, &drag).unwrap();
    assert_eq!(hit.kind, DropZoneKind::BetweenSections);
    assert_eq!(hit.position, 1);
    assert!(!hit.is_invalid);
}

#[test]
fn drag_a_widget_into_a_new_section_between_two_others() {
    let mut dashboard = Dashboard::with_sections(
        vec![
            Section::widgets(sid("a"), vec![w("a1", WidgetSize::S), w("a2", WidgetSize::M)]),
            Section::widgets(sid("b"), vec![w("b1", WidgetSize::L)]),
        ],
        1440.0,
        LayoutConfig::default(),
    )
    .unwrap();
    let geometry = GeometrySnapshot::new(Rect::new(0.0, 0.0, 1440.0, 900.0))
        .with_section(sid("a"), Rect::new(0.0, 0.0, 1440.0, 200.0))
        .with_section(sid("b"), Rect::new(0.0, 240.0, 1440.0, 400.0));
    let drag = DragState::WidgetMove {
        widget_id: wid("a1"),
        size: DragSize::Widget(WidgetSize::S),
    };

    let zone = dashboard
        .resolve_drop(Point::new(700.0, 210.0), &geometry, &drag)
        .unwrap();
    assert_eq!(zone.kind, DropZoneKind::BetweenSections);

    let outcome = dashboard.apply_drop(&zone, DropPayload::MoveWidget(wid("a1")));
    assert_eq!(
        outcome,
        DropOutcome::SectionCreated {
            section_id: sid("section-1"),
            position: 1,
        }
    );
    let order: Vec<&str> = dashboard.sections().iter().map(|s| s.id().as_str()).collect();
    assert_eq!(order, vec!["a", "section-1", "b"]);
    assert_eq!(dashboard.layouts().len(), 3);
}

#[test]
fn resize_changes_block_formation() {
    let mut dashboard = Dashboard::with_sections(
        vec![Section::widgets(
            sid("s"),
            vec![w("l", WidgetSize::L), w("x", WidgetSize::Xs)],
        )],
        1440.0,
        LayoutConfig::default(),
    )
    .unwrap();
    let wide = dashboard.layout(&sid("s")).unwrap();
    assert_eq!(wide.row_count(), 1);
    assert!(wide.rows[0].cells[0].item.is_row_block());

    dashboard.set_container_width(1000.0);
    let narrow = dashboard.layout(&sid("s")).unwrap();
    assert_eq!(narrow.col_count, 3);
    assert_eq!(narrow.row_count(), 2);
    assert!(narrow.rows.iter().all(|r| !r.cells[0].item.is_row_block()));
}
