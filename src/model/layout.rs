//! Column geometry. Everything here is a pure function of the view
//! configuration and the character cell size, in integer pixels.
//!
//! ```text
//!  address   |  hex words                 |  ascii          |  comment
//! 0         line1                        line2             line3
//!             ^hex_left                     ^ascii_left       ^comment_left
//! ```

use crate::model::config;

/// Fixed character cell of the monospace font in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontMetrics {
    pub width: i64,
    pub height: i64,
}

impl FontMetrics {
    pub fn new(width: i64, height: i64) -> FontMetrics {
        /* a zero-sized cell would make every pixel conversion divide by zero */
        FontMetrics {
            width: std::cmp::max(1, width),
            height: std::cmp::max(1, height),
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        FontMetrics::new(8, 16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub metrics: FontMetrics,

    pub word_width: i64,
    pub row_width: i64,
    pub bytes_per_row: i64,
    pub chars_per_word: i64,
    pub address_length: i64,

    /// Right edge of the address column.
    pub line1: i64,
    pub hex_left: i64,
    /// Right edge of the hex column.
    pub line2: i64,
    pub ascii_left: i64,
    /// Right edge of the ascii column.
    pub line3: i64,
    pub comment_left: i64,
}

impl Layout {
    pub fn new(config: &config::ViewConfiguration, metrics: FontMetrics) -> Layout {
        let metrics = FontMetrics::new(metrics.width, metrics.height);
        let cw = metrics.width;

        let word_width = config.word_width();
        let row_width = config.row_width();
        let bytes_per_row = config.bytes_per_row();
        let chars_per_word = config.chars_per_word();
        let address_length = config.address_format().length() as i64;

        let line1 = if config.show_address {
            address_length * cw + cw / 2
        } else {
            0
        };
        let hex_left = line1 + cw / 2;

        let line2 = if config.show_hex {
            let elements = row_width * (chars_per_word + 1) - 1;
            hex_left + elements * cw + cw / 2
        } else {
            line1
        };
        let ascii_left = line2 + cw / 2;

        let line3 = if config.show_ascii {
            ascii_left + bytes_per_row * cw + cw / 2
        } else {
            line2
        };
        let comment_left = line3 + cw / 2;

        Layout {
            metrics,
            word_width,
            row_width,
            bytes_per_row,
            chars_per_word,
            address_length,
            line1,
            hex_left,
            line2,
            ascii_left,
            line3,
            comment_left,
        }
    }

    pub fn cw(&self) -> i64 {
        self.metrics.width
    }

    pub fn ch(&self) -> i64 {
        self.metrics.height
    }

    /// Left edge of the `column`th word's digits in the hex column.
    pub fn hex_word_left(&self, column: i64) -> i64 {
        self.hex_left + column * (self.chars_per_word + 1) * self.cw()
    }

    pub fn hex_word_width(&self) -> i64 {
        self.chars_per_word * self.cw()
    }

    /// Left edge of the `column`th byte's glyph in the ascii column.
    pub fn ascii_byte_left(&self, column: i64) -> i64 {
        self.ascii_left + column * self.cw()
    }

    pub fn row_top(&self, row: i64) -> i64 {
        row * self.ch()
    }

    /// Number of whole rows that fit in `height` pixels.
    pub fn rows_in(&self, height: i64) -> i64 {
        std::cmp::max(0, height) / self.ch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::model::addr;
    use crate::model::versioned::Versioned;

    fn config32() -> config::ViewConfiguration {
        let mut config = config::ViewConfiguration::default();
        config.change(config::Change::address_size(addr::AddressSize::Address32)).unwrap();
        config
    }

    #[test]
    fn default_columns() {
        /* "0000:0000" is 9 characters */
        let layout = Layout::new(&config32(), FontMetrics::new(8, 16));

        assert_eq!(layout.bytes_per_row, 16);
        assert_eq!(layout.line1, 9 * 8 + 4);
        assert_eq!(layout.hex_left, 80);
        /* 16 words of 2 chars with single spaces between them: 47 chars */
        assert_eq!(layout.line2, 80 + 47 * 8 + 4);
        assert_eq!(layout.ascii_left, layout.line2 + 4);
        assert_eq!(layout.line3, layout.ascii_left + 16 * 8 + 4);
        assert_eq!(layout.comment_left, layout.line3 + 4);
    }

    #[test]
    fn hidden_columns_collapse() {
        let mut config = config32();
        config.change(config::Change::show_address(false)).unwrap();
        config.change(config::Change::show_hex(false)).unwrap();

        let layout = Layout::new(&config, FontMetrics::new(8, 16));
        assert_eq!(layout.line1, 0);
        assert_eq!(layout.line2, 0);
        assert_eq!(layout.ascii_left, 4);
        assert_eq!(layout.line3, 4 + 128 + 4);

        config.change(config::Change::show_ascii(false)).unwrap();
        let layout = Layout::new(&config, FontMetrics::new(8, 16));
        assert_eq!(layout.line3, 0);
        assert_eq!(layout.comment_left, 4);
    }

    #[test]
    fn wide_words() {
        let mut config = config32();
        config.change(config::Change::word_width(4)).unwrap();
        config.change(config::Change::row_width(4)).unwrap();

        let layout = Layout::new(&config, FontMetrics::new(10, 20));
        assert_eq!(layout.bytes_per_row, 16);
        assert_eq!(layout.chars_per_word, 8);
        assert_eq!(layout.hex_word_left(0), layout.hex_left);
        assert_eq!(layout.hex_word_left(2), layout.hex_left + 2 * 9 * 10);
        assert_eq!(layout.hex_word_width(), 80);
        /* 4 words * 9 - 1 = 35 chars */
        assert_eq!(layout.line2, layout.hex_left + 350 + 5);
    }

    #[test]
    fn address_length_follows_format() {
        let mut config = config::ViewConfiguration::default();
        config.change(config::Change::address_size(addr::AddressSize::Address64)).unwrap();
        assert_eq!(Layout::new(&config, FontMetrics::new(8, 16)).address_length, 17);

        config.change(config::Change::hide_leading_address_zeros(true)).unwrap();
        assert_eq!(Layout::new(&config, FontMetrics::new(8, 16)).address_length, 13);

        config.change(config::Change::show_address_separator(false)).unwrap();
        assert_eq!(Layout::new(&config, FontMetrics::new(8, 16)).line1, 12 * 8 + 4);
    }

    #[test]
    fn degenerate_metrics_are_clamped() {
        let metrics = FontMetrics::new(0, -3);
        assert_eq!(metrics, FontMetrics { width: 1, height: 1 });
    }

    #[test]
    fn rows_in_viewport() {
        let layout = Layout::new(&config32(), FontMetrics::new(8, 16));
        assert_eq!(layout.rows_in(100), 6);
        assert_eq!(layout.rows_in(-5), 0);
    }
}
