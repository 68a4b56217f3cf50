//! Row-structured text for a byte range: the same address/hex/ascii/comment
//! columns the view draws, as pipe-delimited lines.

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use tracing::{event, instrument, Level};

use crate::model::addr;
use crate::model::comment;
use crate::model::config;
use crate::model::selection;
use crate::model::space;
use crate::util;

/// Formats one word as a little-endian integer printed most significant
/// digit first, so `[0x34, 0x12]` comes out as `"1234"`.
pub fn format_word(bytes: &[u8]) -> String {
    let n = std::cmp::min(bytes.len(), 8);
    let mut acc = String::with_capacity(n * 2);
    if n > 0 {
        util::write_hex_fixed(&mut acc, LittleEndian::read_uint(&bytes[..n], n), n * 2);
    }
    acc
}

/// Whether a byte goes into exported text as itself. Control whitespace
/// does not.
pub fn is_exportable(ch: u8) -> bool {
    util::is_printable(ch) && !matches!(ch, b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// The bytes backing one row. Rows that start before offset 0 (possible when
/// the grid is shifted by a nonzero origin) have nothing at those positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBytes {
    pub offset: addr::Offset,
    bytes: Vec<u8>,
    /// The stream came up short on this row; nothing follows it.
    pub short: bool,
}

impl RowBytes {
    pub fn read(stream: &dyn space::ByteStream, offset: addr::Offset, bytes_per_row: i64) -> RowBytes {
        let data_size = std::cmp::max(0, stream.size());
        let begin = std::cmp::max(0, offset);
        let end = std::cmp::min(offset.saturating_add(bytes_per_row), data_size);

        if end <= begin {
            return RowBytes { offset, bytes: Vec::new(), short: true };
        }

        let wanted = (end - begin) as usize;
        let (bytes, short) = match stream.read(begin, wanted) {
            space::FetchResult::Ok(mut bytes) => {
                let short = bytes.len() < wanted;
                bytes.truncate(wanted);
                (bytes, short)
            },
            other => (other.into_bytes(), true),
        };

        RowBytes { offset, bytes, short: short || end == data_size }
    }

    /// First offset past the bytes this row actually has.
    pub fn end(&self) -> addr::Offset {
        std::cmp::max(0, self.offset) + self.bytes.len() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at absolute offset `index`, if this row has it.
    pub fn get(&self, index: addr::Offset) -> Option<u8> {
        if index < 0 {
            return None;
        }
        let rel = index - std::cmp::max(0, self.offset);
        usize::try_from(rel).ok().and_then(|rel| self.bytes.get(rel).copied())
    }

    /// The word starting at absolute offset `index`, only if every byte of
    /// it is present.
    pub fn word(&self, index: addr::Offset, word_width: i64) -> Option<&[u8]> {
        if index < 0 || word_width <= 0 || index + word_width > self.end() {
            return None;
        }
        let rel = (index - std::cmp::max(0, self.offset)) as usize;
        self.bytes.get(rel..rel + word_width as usize)
    }
}

/// Whether every byte of the word at `index` is selected.
pub fn word_selected(selection: &selection::Selection, index: addr::Offset, word_width: i64, data_size: addr::Offset) -> bool {
    selection.contains(index, data_size) && selection.contains(index + word_width - 1, data_size)
}

/// One exported row. Fields are `None` when their column is hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowRecord {
    pub address: Option<String>,
    pub hex: Option<String>,
    pub ascii: Option<String>,
    pub comment: Option<String>,
}

impl RowRecord {
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        for field in [&self.address, &self.hex, &self.ascii].into_iter().flatten() {
            line.push_str(field);
            line.push('|');
        }
        if let Some(comment) = &self.comment {
            line.push_str(comment);
        }
        line
    }
}

pub struct RowSerializer<'a> {
    pub config: &'a config::ViewConfiguration,
    pub stream: &'a dyn space::ByteStream,
    pub comments: Option<&'a dyn comment::CommentProvider>,
}

impl<'a> RowSerializer<'a> {
    pub fn new(config: &'a config::ViewConfiguration, stream: &'a dyn space::ByteStream) -> Self {
        RowSerializer { config, stream, comments: None }
    }

    pub fn with_comments(mut self, comments: Option<&'a dyn comment::CommentProvider>) -> Self {
        self.comments = comments;
        self
    }

    /// Renders the hex field of a row.
    pub fn hex_field(&self, row: &RowBytes, selection: &selection::Selection) -> String {
        let ww = self.config.word_width();
        let data_size = space::size_of(Some(self.stream));
        let mut words = Vec::with_capacity(self.config.row_width);

        for column in 0..self.config.row_width() {
            let index = row.offset + column * ww;
            if index + ww > row.end() {
                break;
            }

            match row.word(index, ww) {
                Some(bytes) if word_selected(selection, index, ww, data_size) => words.push(format_word(bytes)),
                _ => words.push(" ".repeat(self.config.chars_per_word() as usize)),
            }
        }

        itertools::join(words, " ")
    }

    /// Renders the ascii field of a row.
    pub fn ascii_field(&self, row: &RowBytes, selection: &selection::Selection) -> String {
        let data_size = space::size_of(Some(self.stream));
        let mut acc = String::new();

        for i in 0..self.config.bytes_per_row() {
            let index = row.offset + i;
            if index >= row.end() {
                break;
            }

            acc.push(match row.get(index) {
                Some(b) if selection.contains(index, data_size) => {
                    if is_exportable(b) { util::byte_glyph(b) } else { self.config.unprintable_char }
                },
                _ => ' ',
            });
        }

        acc
    }

    pub fn record(&self, row: &RowBytes, selection: &selection::Selection) -> RowRecord {
        let address = addr::rebase(self.config.address_offset, row.offset);

        RowRecord {
            address: self.config.show_address.then(|| self.config.address_format().format(address)),
            hex: self.config.show_hex.then(|| self.hex_field(row, selection)),
            ascii: self.config.show_ascii.then(|| self.ascii_field(row, selection)),
            comment: match self.comments {
                Some(provider) if self.config.show_comments => Some(provider.comment(address, self.config.word_width)),
                _ => None,
            },
        }
    }

    /// Every row touching the selection. Rows sit on the grid shifted by
    /// `phase`, the same one the view scrolls on, so exported text lines up
    /// with what was on screen. A selection reaching into the partial row in
    /// front of a shifted grid is exported on the unshifted grid.
    #[instrument(level = "debug", skip(self))]
    pub fn rows(&self, selection: &selection::Selection, phase: addr::Offset) -> Vec<RowRecord> {
        let bpr = self.config.bytes_per_row();
        let (begin, end) = match selection.range() {
            Some(range) if bpr > 0 => range,
            _ => return Vec::new(),
        };

        let phase = phase.rem_euclid(bpr);
        let mut offset = begin - (begin - phase).rem_euclid(bpr);
        if offset < 0 {
            /* the view drops a shifted grid at the top, so does the export */
            offset = begin - begin.rem_euclid(bpr);
        }
        let mut records = Vec::new();

        while offset < end {
            let row = RowBytes::read(self.stream, offset, bpr);
            if row.is_empty() {
                break;
            }

            records.push(self.record(&row, selection));

            if row.short {
                break;
            }
            offset+= bpr;
        }

        event!(Level::DEBUG, "serialized {} rows", records.len());
        records
    }

    /// Newline-terminated text for every row touching the selection.
    pub fn text(&self, selection: &selection::Selection, phase: addr::Offset) -> String {
        let mut acc = String::new();
        for record in self.rows(selection, phase) {
            acc.push_str(&record.to_line());
            acc.push('\n');
        }
        acc
    }
}
