//! What the view hands to whoever does the drawing. Colors are the
//! renderer's business; every record only says what kind of thing it is.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLabel {
    pub text: String,
    pub left: i64,
    pub cold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexSpan {
    pub text: String,
    pub left: i64,
    pub width: i64,
    pub selected: bool,
    pub cold: bool,
    /// Every other word drawn in a frame is flagged, so renderers can
    /// alternate colors.
    pub alternate: bool,
    /// The gap between this word and the next is highlighted too.
    pub gap_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiGlyph {
    pub ch: char,
    pub left: i64,
    pub selected: bool,
    pub printable: bool,
    pub cold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPaint {
    /// Pixel offset of the top of this row.
    pub top: i64,
    pub height: i64,
    pub address: Option<AddressLabel>,
    pub hex: Vec<HexSpan>,
    pub ascii: Vec<AsciiGlyph>,
    pub comment: Option<(i64, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Horizontal translation to apply to every x coordinate.
    pub translate_x: i64,
    pub width: i64,
    pub height: i64,
}

pub trait Renderer {
    fn begin_frame(&mut self, frame: &Frame);
    fn row(&mut self, row: &RowPaint);
    /// A full-height vertical column separator.
    fn separator(&mut self, x: i64);
}

/// Keeps everything it is handed. Useful for hosts that want to diff
/// frames, and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frame: Option<Frame>,
    pub rows: Vec<RowPaint>,
    pub separators: Vec<i64>,
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, frame: &Frame) {
        self.frame = Some(*frame);
        self.rows.clear();
        self.separators.clear();
    }

    fn row(&mut self, row: &RowPaint) {
        self.rows.push(row.clone());
    }

    fn separator(&mut self, x: i64) {
        self.separators.push(x);
    }
}
