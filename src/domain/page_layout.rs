/// Axis-aligned box in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Bounds {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn height(&self) -> f32 {
        (self.top - self.bottom).abs()
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).abs()
    }

    pub fn vertical_center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn overlaps_horizontally(&self, other: &Self) -> bool {
        self.left < other.right && other.left < self.right
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub bounds: Bounds,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// Spans sharing a baseline, kept in reading order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.spans
            .iter()
            .map(|s| s.bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Spans joined with single spaces and trimmed.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }
}

/// Native text of one page, structured as blocks of lines of spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<TextBlock>,
}

impl PageLayout {
    pub fn new(number: u32, width: f32, height: f32, blocks: Vec<TextBlock>) -> Self {
        Self {
            number,
            width,
            height,
            blocks,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Non-empty lines of the page joined with newlines.
    pub fn plain_text(&self) -> String {
        self.lines()
            .map(TextLine::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
