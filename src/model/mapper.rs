//! Translation between pointer positions and word indices.
//!
//! Word indices count `word_width`-sized words from the start of the
//! stream, shifted so that a row grid with a misaligned origin still maps
//! its first full word to a whole index. [`CoordinateMapper::word_to_byte`]
//! undoes that shift.

use thiserror::Error;

use crate::model::addr;
use crate::model::layout;
use crate::model::viewport;

/// Which column family an in-progress pointer gesture is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    #[default]
    None,
    Data,
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Pixel mapping only makes sense while a gesture has picked a column.
    #[error("pixel mapping requested with no active selection gesture")]
    NoActiveGesture,
}

pub struct CoordinateMapper<'a> {
    pub layout: &'a layout::Layout,
    pub viewport: &'a viewport::Viewport,
}

/* qBound: never panics when lo > hi, lo wins */
fn bound(lo: i64, x: i64, hi: i64) -> i64 {
    std::cmp::max(lo, std::cmp::min(x, hi))
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(layout: &'a layout::Layout, viewport: &'a viewport::Viewport) -> Self {
        CoordinateMapper { layout, viewport }
    }

    /// Pulls `x` into the span the given column family accepts clicks in.
    /// The hex column gets one extra character on the right so that clicks
    /// just past the last glyph still land on it.
    pub fn clamp_x(&self, mode: HighlightMode, x: i64) -> Result<i64, MappingError> {
        let l = self.layout;
        match mode {
            HighlightMode::Data => Ok(bound(l.line1, x, l.line2 + l.cw())),
            HighlightMode::Ascii => Ok(bound(l.ascii_left, x, l.line3)),
            HighlightMode::None => Err(MappingError::NoActiveGesture),
        }
    }

    /// Row (relative to the first visible row) and word column under a
    /// pointer position. The column can come out as `row_width` at the far
    /// right edge, which is the boundary after the row's last word.
    pub fn pixel_to_cell(&self, mode: HighlightMode, x: i64, y: i64) -> Result<(i64, i64), MappingError> {
        let l = self.layout;
        let cw = l.cw();
        let x = self.clamp_x(mode, x)?;

        let column = match mode {
            HighlightMode::Data => {
                let x = x - l.line1;
                /* round to the nearest character boundary */
                let chars = x / cw + if x % cw >= cw / 2 { 1 } else { 0 };
                chars / (l.chars_per_word + 1)
            },
            HighlightMode::Ascii => {
                let x = x - l.ascii_left;
                (x / cw) / l.word_width
            },
            HighlightMode::None => return Err(MappingError::NoActiveGesture),
        };

        Ok((y.div_euclid(l.ch()), column))
    }

    /// Word index of the first word in the first visible row, rounding up
    /// when the row grid does not start on a word boundary.
    pub fn start_word_offset(&self) -> i64 {
        let ww = self.layout.word_width;
        let mut start = self.viewport.normalized_offset(self.layout.bytes_per_row) / ww;

        if self.viewport.origin % ww != 0 {
            start+= 1;
        }

        start
    }

    pub fn pixel_to_word(&self, mode: HighlightMode, x: i64, y: i64) -> Result<i64, MappingError> {
        let (row, column) = self.pixel_to_cell(mode, x, y)?;
        Ok(row * self.layout.row_width + column + self.start_word_offset())
    }

    /// Byte offset where a word index starts, correcting for a row grid that
    /// is not word-aligned.
    pub fn word_to_byte(&self, word: i64) -> addr::Offset {
        let ww = self.layout.word_width;
        let mut offset = word * ww;
        let misalignment = self.viewport.origin % ww;

        if misalignment != 0 {
            offset-= ww - misalignment;
        }

        offset
    }

    /// Left edge of a word column, the inverse of [`pixel_to_cell`](Self::pixel_to_cell).
    pub fn cell_left(&self, mode: HighlightMode, column: i64) -> Result<i64, MappingError> {
        let l = self.layout;
        match mode {
            HighlightMode::Data => Ok(l.hex_word_left(column)),
            HighlightMode::Ascii => Ok(l.ascii_byte_left(column * l.word_width)),
            HighlightMode::None => Err(MappingError::NoActiveGesture),
        }
    }

    /// Width of one word cell including its trailing gap, in pixels.
    pub fn cell_pitch(&self, mode: HighlightMode) -> Result<i64, MappingError> {
        let l = self.layout;
        match mode {
            HighlightMode::Data => Ok((l.chars_per_word + 1) * l.cw()),
            HighlightMode::Ascii => Ok(l.word_width * l.cw()),
            HighlightMode::None => Err(MappingError::NoActiveGesture),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use crate::model::config;
    use crate::model::versioned::Versioned;

    const CW: i64 = 8;
    const CH: i64 = 16;

    fn layout(word_width: usize, row_width: usize) -> layout::Layout {
        let mut config = config::ViewConfiguration::default();
        config.change(config::Change::address_size(addr::AddressSize::Address32)).unwrap();
        config.change(config::Change::word_width(word_width)).unwrap();
        config.change(config::Change::row_width(row_width)).unwrap();
        layout::Layout::new(&config, layout::FontMetrics::new(CW, CH))
    }

    /// Center of a word's digits in the hex column.
    fn hex_center(layout: &layout::Layout, column: i64) -> i64 {
        layout.hex_word_left(column) + layout.hex_word_width() / 2
    }

    #[test]
    fn none_mode_is_a_contract_violation() {
        let layout = layout(1, 16);
        let vp = viewport::Viewport::new(800, 160);
        let mapper = CoordinateMapper::new(&layout, &vp);

        assert_matches!(mapper.pixel_to_word(HighlightMode::None, 100, 0), Err(MappingError::NoActiveGesture));
        assert_matches!(mapper.cell_left(HighlightMode::None, 0), Err(MappingError::NoActiveGesture));
    }

    #[test]
    fn data_column_words() {
        let layout = layout(1, 16);
        let vp = viewport::Viewport::new(800, 160);
        let mapper = CoordinateMapper::new(&layout, &vp);

        assert_eq!(mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 0), 0), Ok(0));
        assert_eq!(mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 5), 0), Ok(5));
        assert_eq!(mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 5), CH * 2 + 3), Ok(37));
        /* left of the column clamps to the first word */
        assert_eq!(mapper.pixel_to_word(HighlightMode::Data, 0, 0), Ok(0));
        /* far right is the boundary after the last word */
        assert_eq!(mapper.pixel_to_word(HighlightMode::Data, 10_000, 0), Ok(16));
    }

    #[test]
    fn data_column_wide_words() {
        let layout = layout(2, 8);
        let vp = viewport::Viewport::new(800, 160);
        let mapper = CoordinateMapper::new(&layout, &vp);

        let word = mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 3), 0).unwrap();
        assert_eq!(word, 3);
        assert_eq!(mapper.word_to_byte(word), 6);
    }

    #[test]
    fn ascii_column_words() {
        let layout = layout(2, 8);
        let vp = viewport::Viewport::new(800, 160);
        let mapper = CoordinateMapper::new(&layout, &vp);

        /* bytes 6 and 7 are word 3 */
        assert_eq!(mapper.pixel_to_word(HighlightMode::Ascii, layout.ascii_byte_left(6) + 1, 0), Ok(3));
        assert_eq!(mapper.pixel_to_word(HighlightMode::Ascii, layout.ascii_byte_left(7) + 1, CH), Ok(11));
        assert_eq!(mapper.pixel_to_word(HighlightMode::Ascii, 0, 0), Ok(0));
    }

    #[test]
    fn scrolled_start_offset() {
        let layout = layout(1, 16);
        let mut vp = viewport::Viewport::new(800, 160);
        vp.scroll_to(0x40, 16);
        let mapper = CoordinateMapper::new(&layout, &vp);

        assert_eq!(mapper.start_word_offset(), 0x40);
        assert_eq!(mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 1), 0), Ok(0x41));
    }

    #[test]
    fn misaligned_origin() {
        let layout = layout(2, 8);
        let mut vp = viewport::Viewport::new(800, 160);
        vp.scroll_to(5, 16);
        let mapper = CoordinateMapper::new(&layout, &vp);

        /* first visible row starts at byte 5; word grid rounds up */
        assert_eq!(mapper.start_word_offset(), 3);
        let word = mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 0), 0).unwrap();
        assert_eq!(word, 3);
        assert_eq!(mapper.word_to_byte(word), 5);

        let word = mapper.pixel_to_word(HighlightMode::Data, hex_center(&layout, 2), CH).unwrap();
        assert_eq!(mapper.word_to_byte(word), 5 + 16 + 4);
    }

    #[test]
    fn hidden_ascii_column_does_not_panic() {
        let mut config = config::ViewConfiguration::default();
        config.change(config::Change::show_ascii(false)).unwrap();
        let layout = layout::Layout::new(&config, layout::FontMetrics::new(CW, CH));
        let vp = viewport::Viewport::new(800, 160);
        let mapper = CoordinateMapper::new(&layout, &vp);

        assert_eq!(mapper.clamp_x(HighlightMode::Ascii, 5000), Ok(layout.ascii_left));
    }

    proptest! {
        #[test]
        fn pixel_round_trip(
            ww_index in 0usize..4,
            row_width in 1usize..33,
            cw in 1i64..20,
            ch in 1i64..30,
            data in any::<bool>(),
            x in -100i64..4000,
            y in 0i64..2000,
        ) {
            let ww = [1usize, 2, 4, 8][ww_index];
            let mut config = config::ViewConfiguration::default();
            config.change(config::Change::word_width(ww)).unwrap();
            config.change(config::Change::row_width(row_width)).unwrap();
            let layout = layout::Layout::new(&config, layout::FontMetrics::new(cw, ch));
            let vp = viewport::Viewport::new(800, 600);
            let mapper = CoordinateMapper::new(&layout, &vp);

            let mode = if data { HighlightMode::Data } else { HighlightMode::Ascii };
            let clamped = mapper.clamp_x(mode, x).unwrap();
            let (row, column) = mapper.pixel_to_cell(mode, x, y).unwrap();

            let left = mapper.cell_left(mode, column).unwrap();
            let pitch = mapper.cell_pitch(mode).unwrap();
            prop_assert!(clamped >= left - cw, "x {} left {} cw {}", clamped, left, cw);
            prop_assert!(clamped < left + pitch + cw, "x {} left {} pitch {}", clamped, left, pitch);

            let top = layout.row_top(row);
            prop_assert!(y >= top && y < top + ch);
        }
    }
}
