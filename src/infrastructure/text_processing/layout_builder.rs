use crate::domain::{PageLayout, TextBlock, TextLine, TextSpan};

const BLOCK_GAP_FACTOR: f32 = 1.5;

/// Groups loose spans into lines (shared vertical centre) and lines into blocks
/// (broken by vertical gaps wider than 1.5 line heights).
pub fn build_page_layout(number: u32, width: f32, height: f32, spans: Vec<TextSpan>) -> PageLayout {
    let mut spans: Vec<TextSpan> = spans
        .into_iter()
        .filter(|s| !s.text.trim().is_empty())
        .collect();
    spans.sort_by(|a, b| {
        b.bounds
            .vertical_center()
            .total_cmp(&a.bounds.vertical_center())
            .then(a.bounds.left.total_cmp(&b.bounds.left))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for span in spans {
        let joins_last = lines.last().and_then(TextLine::bounds).is_some_and(|line| {
            let tolerance = line.height().max(span.bounds.height()) / 2.0;
            (line.vertical_center() - span.bounds.vertical_center()).abs() <= tolerance
        });
        match lines.last_mut() {
            Some(line) if joins_last => line.spans.push(span),
            _ => lines.push(TextLine::new(vec![span])),
        }
    }
    for line in &mut lines {
        line.spans.sort_by(|a, b| a.bounds.left.total_cmp(&b.bounds.left));
    }

    let mut blocks: Vec<TextBlock> = Vec::new();
    let mut previous: Option<crate::domain::Bounds> = None;
    for line in lines {
        let Some(bounds) = line.bounds() else { continue };
        let starts_block = previous.is_none_or(|above| {
            let gap = above.bottom - bounds.top;
            gap > BLOCK_GAP_FACTOR * above.height().max(bounds.height())
        });
        previous = Some(bounds);

        match blocks.last_mut() {
            Some(block) if !starts_block => block.lines.push(line),
            _ => blocks.push(TextBlock::new(vec![line])),
        }
    }

    PageLayout::new(number, width, height, blocks)
}
