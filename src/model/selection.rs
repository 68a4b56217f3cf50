//! The selected byte range and the rules for growing and shrinking it.
//!
//! `start` is where the selection was anchored and `end` is where it was
//! dragged or extended to, so `start > end` is perfectly normal for a
//! selection built backwards. Anything consuming the range goes through
//! [`Selection::range`], which orders the two.

use crate::model::addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: addr::Offset,
    pub end: addr::Offset,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::NONE
    }
}

impl Selection {
    pub const NONE: Selection = Selection { start: addr::NO_SELECTION, end: addr::NO_SELECTION };

    pub fn has_selection(&self) -> bool {
        self.start != addr::NO_SELECTION && self.end != addr::NO_SELECTION
    }

    pub fn deselect(&mut self) {
        *self = Selection::NONE;
    }

    pub fn select_all(&mut self, data_size: addr::Offset) {
        self.start = 0;
        self.end = std::cmp::max(0, data_size);
    }

    /// Half-open `[begin, end)` byte interval, if anything is selected.
    pub fn range(&self) -> Option<(addr::Offset, addr::Offset)> {
        if self.has_selection() {
            Some((std::cmp::min(self.start, self.end), std::cmp::max(self.start, self.end)))
        } else {
            None
        }
    }

    pub fn size(&self) -> u64 {
        self.range().map_or(0, |(begin, end)| (end - begin) as u64)
    }

    /// Address of the first selected byte.
    pub fn address(&self, address_offset: addr::Address) -> Option<addr::Address> {
        self.range().map(|(begin, _)| addr::rebase(address_offset, begin))
    }

    /// Whether the byte at `index` is highlighted. Bytes past the end of the
    /// data never are, even if the range extends over them.
    pub fn contains(&self, index: addr::Offset, data_size: addr::Offset) -> bool {
        if index >= data_size || self.start == self.end {
            return false;
        }

        match self.range() {
            Some((begin, end)) => index >= begin && index < end,
            None => false,
        }
    }

    /// Pointer-down on the word starting at `offset`. With `extend`, an
    /// existing selection keeps its anchor and only moves its end; otherwise
    /// a fresh one-word selection starts here. Clicking past the data clears
    /// the selection.
    pub fn press(&mut self, offset: addr::Offset, word_width: i64, extend: bool, data_size: addr::Offset) {
        let offset = std::cmp::max(0, offset);

        if offset < data_size {
            if extend && self.has_selection() {
                self.end = offset;
            } else {
                self.start = offset;
                self.end = offset + word_width;
            }
        } else {
            self.deselect();
        }
    }

    /// Pointer-drag to the word starting at `offset`. Never lets the
    /// selection collapse onto its anchor. Returns false if there is no
    /// anchor to drag from.
    pub fn drag(&mut self, offset: addr::Offset, word_width: i64) -> bool {
        if self.start == addr::NO_SELECTION {
            return false;
        }

        self.end = offset;
        if self.end == self.start {
            self.end+= word_width;
        }

        if self.end < 0 {
            self.end = 0;
        }

        true
    }

    /// Replaces the selection with `[offset, offset + length)`.
    pub fn select_span(&mut self, offset: addr::Offset, length: i64) {
        let offset = std::cmp::max(0, offset);
        self.start = offset;
        self.end = offset + length;
    }

    /// Keyboard extension. Like a text editor, extending left or up from a
    /// one-word selection keeps the anchor word selected and grows past it
    /// instead of shrinking to nothing. Returns whether anything changed.
    pub fn extend(&mut self, direction: Direction, word_width: i64, bytes_per_row: i64, data_size: addr::Offset) -> bool {
        if !self.has_selection() {
            return false;
        }

        let before = *self;
        let ww = word_width;

        match direction {
            Direction::Right => {
                if self.start == self.end && self.start >= ww {
                    self.start-= ww;
                }
                if self.end + ww <= data_size {
                    self.end+= ww;
                }
            },
            Direction::Left => {
                if self.end - ww == self.start && self.end - 2 * ww >= 0 {
                    self.start+= ww;
                    self.end-= ww;
                }
                if self.end >= ww {
                    self.end-= ww;
                }
            },
            Direction::Down => {
                self.end+= bytes_per_row;
                self.end = std::cmp::min(self.end, data_size);
            },
            Direction::Up => {
                if self.end - ww == self.start && self.end - bytes_per_row >= 0 {
                    self.start+= ww;
                }
                self.end = std::cmp::max(0, self.end - bytes_per_row);
            },
        }

        before != *self
    }
}
