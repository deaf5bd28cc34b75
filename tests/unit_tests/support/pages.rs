use docextract::domain::{Bounds, PageLayout, TextBlock, TextLine, TextSpan};

const LINE_HEIGHT: f32 = 12.0;
const LINE_PITCH: f32 = 14.0;
const PAGE_TOP: f32 = 760.0;

fn line_at(y: f32, cells: &[(f32, &str)]) -> TextLine {
    TextLine::new(
        cells
            .iter()
            .map(|(x, text)| {
                let width = text.len() as f32 * 5.0;
                TextSpan::new(*text, Bounds::new(*x, y, x + width, y + LINE_HEIGHT))
            })
            .collect(),
    )
}

/// One block, one single-span line per entry.
pub fn text_page(number: u32, lines: &[&str]) -> PageLayout {
    let lines = lines
        .iter()
        .enumerate()
        .map(|(i, text)| line_at(PAGE_TOP - i as f32 * LINE_PITCH, &[(72.0, text)]))
        .collect();
    PageLayout::new(number, 612.0, 792.0, vec![TextBlock::new(lines)])
}

/// A page image with no text layer.
pub fn scanned_page(number: u32) -> PageLayout {
    PageLayout::new(number, 612.0, 792.0, Vec::new())
}

pub const TABLE_ROWS: [[&str; 3]; 3] = [
    ["Item", "Qty", "Amount"],
    ["Widget", "2", "40.00"],
    ["Gadget", "1", "15.50"],
];

/// A heading followed by `TABLE_ROWS` laid out in three aligned columns.
pub fn table_page(number: u32) -> PageLayout {
    let mut lines = vec![line_at(PAGE_TOP, &[(72.0, "Line items for this invoice")])];
    for (i, row) in TABLE_ROWS.iter().enumerate() {
        let y = PAGE_TOP - (i as f32 + 1.0) * LINE_PITCH;
        lines.push(line_at(y, &[(72.0, row[0]), (250.0, row[1]), (400.0, row[2])]));
    }
    PageLayout::new(number, 612.0, 792.0, vec![TextBlock::new(lines)])
}
