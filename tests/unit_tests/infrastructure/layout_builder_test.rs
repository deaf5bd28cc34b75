use docextract::domain::{Bounds, TextSpan};
use docextract::infrastructure::text_processing::build_page_layout;

fn span(text: &str, left: f32, bottom: f32) -> TextSpan {
    TextSpan::new(text, Bounds::new(left, bottom, left + 40.0, bottom + 12.0))
}

#[test]
fn given_unordered_spans_when_building_layout_then_lines_and_blocks_follow_reading_order() {
    let layout = build_page_layout(
        3,
        612.0,
        792.0,
        vec![
            span("Footer", 10.0, 100.0),
            span("World", 60.0, 700.0),
            span("   ", 200.0, 700.0),
            span("Next line", 10.0, 686.0),
            span("Hello", 10.0, 700.0),
        ],
    );

    assert_eq!(layout.number, 3);
    assert_eq!(layout.blocks.len(), 2);
    assert_eq!(layout.blocks[0].lines.len(), 2);
    assert_eq!(layout.blocks[0].lines[0].text(), "Hello World");
    assert_eq!(layout.plain_text(), "Hello World\nNext line\nFooter");
}

#[test]
fn given_slightly_offset_baselines_when_building_layout_then_spans_share_a_line() {
    let layout = build_page_layout(
        1,
        612.0,
        792.0,
        vec![span("Qty", 10.0, 500.0), span("2", 200.0, 503.0)],
    );

    assert_eq!(layout.lines().count(), 1);
    assert_eq!(layout.plain_text(), "Qty 2");
}

#[test]
fn given_no_spans_when_building_layout_then_page_is_empty() {
    let layout = build_page_layout(1, 612.0, 792.0, Vec::new());

    assert!(layout.blocks.is_empty());
    assert_eq!(layout.plain_text(), "");
}
