//! Vertical and horizontal scroll state.
//!
//! The vertical position is tracked in whole rows ("scroll units"), the way
//! an external scrollbar would report it. Because a jump to an arbitrary
//! byte should land that byte at the start of a row, the row grid can be
//! shifted by an `origin`: once scrolled past the top, rows start at
//! `origin + k * bytes_per_row` and the first scroll unit stands for the
//! short partial row `[0, origin)`.

use tracing::{event, Level};

use crate::model::addr;
use crate::model::layout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollExtents {
    /// Largest vertical scroll unit.
    pub vertical: i64,
    /// Largest horizontal scroll position, in characters.
    pub horizontal: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_unit: i64,
    /// Byte offset of the row grid, `0 <= origin < bytes_per_row`.
    pub origin: i64,
    /// Horizontal scroll position, in characters.
    pub horizontal: i64,

    /// Size of the visible area, in pixels.
    pub width: i64,
    pub height: i64,
}

/// Byte offset of the first fully visible row when scrolled to `scroll_unit`.
pub fn normalized_offset(scroll_unit: i64, origin: i64, bytes_per_row: i64) -> addr::Offset {
    let mut offset = scroll_unit * bytes_per_row;

    if origin != 0 && offset > 0 {
        offset+= origin;
        offset-= bytes_per_row;
    }

    offset
}

impl Viewport {
    pub fn new(width: i64, height: i64) -> Viewport {
        Viewport {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn normalized_offset(&self, bytes_per_row: i64) -> addr::Offset {
        normalized_offset(self.scroll_unit, self.origin, bytes_per_row)
    }

    /// Puts `offset` at the start of a row. If that needs a shifted grid,
    /// the row holding `offset` becomes the second one so the partial row
    /// in front of it stays reachable.
    pub fn scroll_to(&mut self, offset: addr::Offset, bytes_per_row: i64) {
        if bytes_per_row <= 0 {
            self.origin = 0;
            self.scroll_unit = 0;
            return;
        }

        let offset = std::cmp::max(0, offset);
        self.origin = offset % bytes_per_row;
        self.scroll_unit = offset / bytes_per_row;

        if self.origin != 0 {
            self.scroll_unit+= 1;
        }

        event!(Level::TRACE, offset, scroll_unit = self.scroll_unit, origin = self.origin, "scrolled");
    }

    /// Called at the start of a repaint. A shifted grid only means anything
    /// once scrolled past the partial leading row; back at the top it is
    /// dropped. Returns whether anything changed.
    pub fn settle(&mut self) -> bool {
        if self.origin != 0 && self.scroll_unit <= 0 {
            self.origin = 0;
            true
        } else {
            false
        }
    }

    pub fn visible_rows(&self, layout: &layout::Layout) -> i64 {
        layout.rows_in(self.height)
    }

    pub fn extents(&self, data_size: addr::Offset, layout: &layout::Layout) -> ScrollExtents {
        let bpr = layout.bytes_per_row;

        let vertical = if bpr > 0 {
            let rows = data_size / bpr + if data_size % bpr != 0 { 1 } else { 0 };
            std::cmp::max(0, rows - self.visible_rows(layout))
        } else {
            0
        };

        let horizontal = std::cmp::max(0, (layout.line3 - self.width) / layout.cw());

        ScrollExtents { vertical, horizontal }
    }

    /// Keeps both scroll positions inside the scrollbar ranges.
    pub fn clamp(&mut self, extents: &ScrollExtents) {
        self.scroll_unit = self.scroll_unit.clamp(0, extents.vertical);
        self.horizontal = self.horizontal.clamp(0, extents.horizontal);
    }

    /// Whether the byte at `index` falls inside one of the visible rows.
    pub fn is_in_viewable_area(&self, index: addr::Offset, layout: &layout::Layout) -> bool {
        let first = self.normalized_offset(layout.bytes_per_row);
        let last = first + self.visible_rows(layout) * layout.bytes_per_row;

        index >= first && index < last
    }

    /// Moves one row toward `index` if it is off screen. Returns whether the
    /// view moved.
    pub fn step_toward(&mut self, index: addr::Offset, layout: &layout::Layout, extents: &ScrollExtents) -> bool {
        if self.is_in_viewable_area(index, layout) {
            return false;
        }

        let before = self.scroll_unit;
        if index < self.normalized_offset(layout.bytes_per_row) {
            self.scroll_unit = std::cmp::max(0, self.scroll_unit - 1);
        } else {
            self.scroll_unit = std::cmp::min(extents.vertical, self.scroll_unit + 1);
        }

        before != self.scroll_unit
    }

    /// Horizontal translation applied to pointer coordinates and painting.
    pub fn horizontal_pixels(&self, layout: &layout::Layout) -> i64 {
        self.horizontal * layout.cw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::config;
    use crate::model::versioned::Versioned;

    fn layout(row_width: usize) -> layout::Layout {
        let mut config = config::ViewConfiguration::default();
        config.change(config::Change::address_size(addr::AddressSize::Address32)).unwrap();
        config.change(config::Change::row_width(row_width)).unwrap();
        layout::Layout::new(&config, layout::FontMetrics::new(8, 16))
    }

    #[test]
    fn normalized_without_origin() {
        assert_eq!(normalized_offset(0, 0, 16), 0);
        assert_eq!(normalized_offset(3, 0, 16), 48);
    }

    #[test]
    fn normalized_with_origin() {
        /* the first scrolled-past row still starts at byte 5 */
        assert_eq!(normalized_offset(1, 5, 16), 5);
        assert_eq!(normalized_offset(2, 5, 16), 21);
        /* at the top the origin has no effect */
        assert_eq!(normalized_offset(0, 5, 16), 0);
    }

    #[test]
    fn scroll_to_aligned() {
        let mut vp = Viewport::new(800, 160);
        vp.scroll_to(0x40, 16);
        assert_eq!((vp.scroll_unit, vp.origin), (4, 0));
        assert_eq!(vp.normalized_offset(16), 0x40);
    }

    #[test]
    fn scroll_to_unaligned() {
        let mut vp = Viewport::new(800, 160);
        vp.scroll_to(21, 16);
        assert_eq!((vp.scroll_unit, vp.origin), (2, 5));
        assert_eq!(vp.normalized_offset(16), 21);

        vp.scroll_to(5, 16);
        assert_eq!((vp.scroll_unit, vp.origin), (1, 5));
        assert_eq!(vp.normalized_offset(16), 5);
    }

    #[test]
    fn scroll_to_without_rows() {
        let mut vp = Viewport::new(800, 160);
        vp.scroll_to(21, 0);
        assert_eq!((vp.scroll_unit, vp.origin), (0, 0));
    }

    #[test]
    fn settle_drops_origin_at_top() {
        let mut vp = Viewport::new(800, 160);
        vp.scroll_to(5, 16);
        assert!(!vp.settle());
        assert_eq!(vp.origin, 5);

        vp.scroll_unit = 0;
        assert!(vp.settle());
        assert_eq!(vp.origin, 0);
        assert!(!vp.settle());
    }

    #[test]
    fn extents() {
        let layout = layout(16);
        let vp = Viewport::new(200, 160);

        /* 10 rows fit */
        assert_eq!(vp.extents(0, &layout).vertical, 0);
        assert_eq!(vp.extents(160, &layout).vertical, 0);
        assert_eq!(vp.extents(161, &layout).vertical, 1);
        assert_eq!(vp.extents(16 * 25, &layout).vertical, 15);

        assert_eq!(vp.extents(0, &layout).horizontal, (layout.line3 - 200) / 8);

        let wide = Viewport::new(10_000, 160);
        assert_eq!(wide.extents(0, &layout).horizontal, 0);
    }

    #[test]
    fn extents_without_rows() {
        let layout = layout(0);
        assert_eq!(Viewport::new(200, 160).extents(1000, &layout).vertical, 0);
    }

    #[test]
    fn clamp_to_extents() {
        let mut vp = Viewport::new(200, 160);
        vp.scroll_unit = 40;
        vp.horizontal = -2;
        vp.clamp(&ScrollExtents { vertical: 15, horizontal: 3 });
        assert_eq!((vp.scroll_unit, vp.horizontal), (15, 0));
    }

    #[test]
    fn viewable_area_and_stepping() {
        let layout = layout(16);
        let mut vp = Viewport::new(800, 64); /* four rows */
        let extents = vp.extents(16 * 100, &layout);

        assert!(vp.is_in_viewable_area(0, &layout));
        assert!(vp.is_in_viewable_area(63, &layout));
        assert!(!vp.is_in_viewable_area(64, &layout));

        assert!(vp.step_toward(64, &layout, &extents));
        assert_eq!(vp.scroll_unit, 1);
        assert!(!vp.step_toward(64, &layout, &extents));

        assert!(vp.step_toward(0, &layout, &extents));
        assert_eq!(vp.scroll_unit, 0);
        assert!(!vp.step_toward(-16, &layout, &extents));
    }
}
