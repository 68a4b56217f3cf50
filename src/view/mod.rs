//! The host-facing hex view. Owns the configuration, scroll position and
//! selection, turns pointer and key events into selection changes, and
//! drives a [`render::Renderer`] through one frame at a time.

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use tracing::{event, instrument, Level};

use crate::model::addr;
use crate::model::comment;
use crate::model::config;
use crate::model::dump;
use crate::model::layout;
use crate::model::mapper;
use crate::model::selection;
use crate::model::space;
use crate::model::versioned::Versioned;
use crate::model::viewport;
use crate::util;

pub mod clipboard;
pub mod input;
pub mod render;

/// What a tooltip over the selection shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub start: String,
    pub end: String,
    pub hex: String,
    /// The first four selected bytes as little-endian integers, zero-padded.
    pub uint32: u32,
    pub int32: i32,
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Addr: {} - {}", self.start, self.end)?;
        writeln!(f, "Hex: 0x{}", self.hex)?;
        writeln!(f, "UInt32: {}", self.uint32)?;
        write!(f, "Int32: {}", self.int32)
    }
}

pub struct HexView {
    config: config::ViewConfiguration,
    metrics: layout::FontMetrics,

    layout: layout::Layout,
    layout_generation: u64,

    viewport: viewport::Viewport,
    selection: selection::Selection,
    mode: mapper::HighlightMode,

    stream: Option<Box<dyn space::ByteStream>>,
    comments: Option<Box<dyn comment::CommentProvider>>,
}

impl HexView {
    pub fn new(metrics: layout::FontMetrics) -> HexView {
        Self::build(config::ViewConfiguration::default(), metrics)
    }

    /// Starts from saved settings instead of the defaults.
    pub fn with_config(config: config::ViewConfiguration, metrics: layout::FontMetrics) -> Result<HexView, config::ConfigError> {
        config.validate()?;
        Ok(Self::build(config, metrics))
    }

    fn build(config: config::ViewConfiguration, metrics: layout::FontMetrics) -> HexView {
        let layout = layout::Layout::new(&config, metrics);

        HexView {
            layout_generation: config.generation(),
            config,
            metrics,
            layout,
            viewport: viewport::Viewport::default(),
            selection: selection::Selection::default(),
            mode: mapper::HighlightMode::None,
            stream: None,
            comments: None,
        }
    }

    pub fn config(&self) -> &config::ViewConfiguration {
        &self.config
    }

    pub fn layout(&self) -> &layout::Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &viewport::Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> selection::Selection {
        self.selection
    }

    pub fn highlight_mode(&self) -> mapper::HighlightMode {
        self.mode
    }

    fn mapper(&self) -> mapper::CoordinateMapper<'_> {
        mapper::CoordinateMapper::new(&self.layout, &self.viewport)
    }

    fn relayout(&mut self) {
        if self.layout_generation != self.config.generation() || self.layout.metrics != layout::FontMetrics::new(self.metrics.width, self.metrics.height) {
            self.layout = layout::Layout::new(&self.config, self.metrics);
            self.layout_generation = self.config.generation();
            event!(Level::DEBUG, generation = self.layout_generation, bytes_per_row = self.layout.bytes_per_row, "relayout");
        }

        let extents = self.scroll_extents();
        self.viewport.clamp(&extents);
    }

    /*
     * Data
     */

    /// Attaches a stream. Streams that can only be read front to back, or
    /// that don't know their size, are read into memory first.
    #[instrument(skip_all)]
    pub fn set_data(&mut self, stream: Box<dyn space::ByteStream>) {
        let stream: Box<dyn space::ByteStream> = if stream.is_sequential() || stream.size() == 0 {
            event!(Level::DEBUG, "materializing sequential or unsized stream");
            Box::new(space::buffer::MemoryByteStream::materialize(&*stream))
        } else {
            stream
        };

        let size = std::cmp::max(0, stream.size());
        self.stream = Some(stream);
        self.mode = mapper::HighlightMode::None;

        if size > 0xffff_ffff && self.config.address_size != addr::AddressSize::Address64 {
            if let Err(e) = self.config.change(config::Change::address_size(addr::AddressSize::Address64)) {
                event!(Level::ERROR, "failed to widen address column: {}", e);
            }
        }

        self.selection.deselect();
        self.relayout();

        event!(Level::INFO, size, "attached data");
    }

    pub fn clear(&mut self) {
        self.stream = None;
        self.mode = mapper::HighlightMode::None;
        self.selection.deselect();
        self.viewport.scroll_unit = 0;
        self.viewport.origin = 0;
        self.relayout();

        event!(Level::INFO, "detached data");
    }

    pub fn data_size(&self) -> addr::Offset {
        space::size_of(self.stream.as_deref())
    }

    pub fn all_bytes(&self) -> Vec<u8> {
        match &self.stream {
            Some(stream) => space::read_range(&**stream, 0, self.data_size() as usize),
            None => Vec::new(),
        }
    }

    pub fn set_comment_provider(&mut self, provider: Option<Box<dyn comment::CommentProvider>>) {
        self.comments = provider;
    }

    /*
     * Configuration
     */

    /// Applies a configuration change. Anything that moves columns around
    /// is refused while a selection gesture is in progress, since the
    /// gesture's offsets were computed against the old geometry.
    #[instrument(skip(self))]
    pub fn change_config(&mut self, change: config::Change) -> Result<(), config::ConfigError> {
        if change.affects_geometry() && self.mode != mapper::HighlightMode::None {
            event!(Level::WARN, "refusing geometry change during a selection gesture");
            return Err(config::ConfigError::GestureInProgress);
        }

        let top = self.normalized_offset();
        let old_bpr = self.config.bytes_per_row();

        if let Err(e) = self.config.change(change) {
            event!(Level::WARN, "rejected configuration change: {}", e);
            return Err(e);
        }

        if self.config.bytes_per_row() != old_bpr {
            /* keep the same byte at the top */
            self.viewport.scroll_to(top, self.config.bytes_per_row());
        }

        self.relayout();
        Ok(())
    }

    pub fn set_word_width(&mut self, width: i64) -> Result<(), config::ConfigError> {
        let width = config::word_width_from(width)?;
        self.change_config(config::Change::word_width(width))
    }

    pub fn set_row_width(&mut self, width: i64) -> Result<(), config::ConfigError> {
        let width = config::row_width_from(width)?;
        self.change_config(config::Change::row_width(width))
    }

    /// Word width change requested by the user, e.g. from a menu.
    pub fn user_set_word_width(&mut self, width: i64) -> Result<(), config::ConfigError> {
        if !self.config.user_can_set_word_width {
            return Err(config::ConfigError::NotUserConfigurable("word width"));
        }
        self.set_word_width(width)
    }

    /// Row width change requested by the user.
    pub fn user_set_row_width(&mut self, width: i64) -> Result<(), config::ConfigError> {
        if !self.config.user_can_set_row_width {
            return Err(config::ConfigError::NotUserConfigurable("row width"));
        }
        self.set_row_width(width)
    }

    pub fn set_font_metrics(&mut self, metrics: layout::FontMetrics) {
        self.metrics = metrics;
        self.relayout();
    }

    pub fn resize(&mut self, width: i64, height: i64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.relayout();
    }

    /*
     * Scrolling
     */

    pub fn normalized_offset(&self) -> addr::Offset {
        self.viewport.normalized_offset(self.config.bytes_per_row())
    }

    pub fn first_visible_address(&self) -> addr::Address {
        addr::rebase(self.config.address_offset, self.normalized_offset())
    }

    pub fn scroll_extents(&self) -> viewport::ScrollExtents {
        self.viewport.extents(self.data_size(), &self.layout)
    }

    /// Scrolls so that `offset` starts a row, as far as the scroll range allows.
    pub fn scroll_to(&mut self, offset: addr::Offset) {
        self.viewport.scroll_to(offset, self.config.bytes_per_row());
        let extents = self.scroll_extents();
        self.viewport.clamp(&extents);
    }

    /// Scrollbar positions reported back by the host.
    pub fn set_scroll_position(&mut self, vertical: i64, horizontal: i64) {
        self.viewport.scroll_unit = vertical;
        self.viewport.horizontal = horizontal;
        let extents = self.scroll_extents();
        self.viewport.clamp(&extents);
    }

    /*
     * Selection
     */

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.data_size());
    }

    pub fn deselect(&mut self) {
        self.selection.deselect();
    }

    pub fn is_selected(&self, index: addr::Offset) -> bool {
        self.selection.contains(index, self.data_size())
    }

    pub fn selection_address(&self) -> Option<addr::Address> {
        self.selection.address(self.config.address_offset)
    }

    pub fn selection_size(&self) -> u64 {
        self.selection.size()
    }

    /// The selected bytes that actually exist in the stream.
    pub fn selected_bytes(&self) -> Vec<u8> {
        match (&self.stream, self.selection.range()) {
            (Some(stream), Some((begin, end))) => {
                let end = std::cmp::min(end, self.data_size());
                if end <= begin {
                    return Vec::new();
                }
                space::read_range(&**stream, begin, (end - begin) as usize)
            },
            _ => Vec::new(),
        }
    }

    pub fn selection_summary(&self) -> Option<SelectionSummary> {
        let bytes = self.selected_bytes();
        if bytes.is_empty() {
            return None;
        }

        let start = self.selection_address()?;
        let end = start.wrapping_add(bytes.len() as u64);
        let format = self.config.address_format();

        let mut word = [0u8; 4];
        let n = std::cmp::min(word.len(), bytes.len());
        word[..n].copy_from_slice(&bytes[..n]);

        Some(SelectionSummary {
            start: format.format(start),
            end: format.format(end),
            hex: util::fmt_hex_bytes(&bytes),
            uint32: LittleEndian::read_u32(&word),
            int32: LittleEndian::read_i32(&word),
        })
    }

    /*
     * Input
     */

    fn translate_x(&self, x: i64) -> i64 {
        x + self.viewport.horizontal_pixels(&self.layout)
    }

    fn byte_at(&self, mode: mapper::HighlightMode, x: i64, y: i64) -> Result<addr::Offset, mapper::MappingError> {
        let mapper = self.mapper();
        let word = mapper.pixel_to_word(mode, x, y)?;
        Ok(mapper.word_to_byte(word))
    }

    pub fn pointer_down(&mut self, pe: &input::PointerEvent) {
        if pe.button != input::Button::Primary {
            return;
        }

        let x = self.translate_x(pe.x);
        self.mode = if x < self.layout.line2 {
            mapper::HighlightMode::Data
        } else {
            mapper::HighlightMode::Ascii
        };

        match self.byte_at(self.mode, x, pe.y) {
            Ok(offset) => {
                let extend = pe.modifiers.contains(input::Modifiers::SHIFT);
                self.selection.press(offset, self.config.word_width(), extend, self.data_size());
                event!(Level::TRACE, offset, selection = ?self.selection, "pointer down");
            },
            Err(e) => event!(Level::ERROR, "{}", e),
        }
    }

    /// Pointer motion. Only does anything while a gesture is active; returns
    /// whether the selection was updated.
    pub fn pointer_move(&mut self, pe: &input::PointerEvent) -> bool {
        if self.mode == mapper::HighlightMode::None {
            return false;
        }

        let x = self.translate_x(pe.x);
        let offset = match self.byte_at(self.mode, x, pe.y) {
            Ok(offset) => offset,
            Err(e) => {
                event!(Level::ERROR, "{}", e);
                return false;
            },
        };

        if !self.selection.drag(offset, self.config.word_width()) {
            return false;
        }

        let extents = self.scroll_extents();
        if self.viewport.step_toward(self.selection.end, &self.layout, &extents) {
            event!(Level::TRACE, scroll_unit = self.viewport.scroll_unit, "auto-scrolled during drag");
        }

        true
    }

    pub fn pointer_up(&mut self, pe: &input::PointerEvent) {
        if pe.button == input::Button::Primary {
            self.mode = mapper::HighlightMode::None;
        }
    }

    /// Double-click selects the word under the pointer in the hex column,
    /// or the whole row when clicking on an address.
    pub fn double_click(&mut self, pe: &input::PointerEvent) {
        if pe.button != input::Button::Primary {
            return;
        }

        let x = self.translate_x(pe.x);
        let (x, length) = if x >= self.layout.line1 && x < self.layout.line2 {
            (x, self.config.word_width())
        } else if x < self.layout.line1 {
            (self.layout.line1, self.config.bytes_per_row())
        } else {
            return;
        };

        match self.byte_at(mapper::HighlightMode::Data, x, pe.y) {
            Ok(offset) => self.selection.select_span(offset, length),
            Err(e) => event!(Level::ERROR, "{}", e),
        }
    }

    /// Returns false for keys the view does not handle, so the host can
    /// pass them on.
    pub fn key_press(&mut self, ke: &input::KeyEvent) -> bool {
        let ctrl = ke.modifiers.contains(input::Modifiers::CONTROL);
        let shift = ke.modifiers.contains(input::Modifiers::SHIFT);

        if ke.is_select_all() {
            self.select_all();
            return true;
        }

        match ke.key {
            input::Key::Home if ctrl => {
                self.scroll_to(0);
                true
            },
            input::Key::End if ctrl => {
                self.scroll_to(std::cmp::max(0, self.data_size() - self.config.bytes_per_row()));
                true
            },
            input::Key::Down if ctrl => {
                let offset = self.normalized_offset();
                if offset + 1 < self.data_size() {
                    self.scroll_to(offset + 1);
                }
                true
            },
            input::Key::Up if ctrl => {
                let offset = self.normalized_offset();
                if offset > 0 {
                    self.scroll_to(offset - 1);
                }
                true
            },
            key if shift && self.selection.has_selection() => {
                let direction = match key {
                    input::Key::Left => selection::Direction::Left,
                    input::Key::Right => selection::Direction::Right,
                    input::Key::Up => selection::Direction::Up,
                    input::Key::Down => selection::Direction::Down,
                    _ => return false,
                };

                self.selection.extend(direction, self.config.word_width(), self.config.bytes_per_row(), self.data_size());
                true
            },
            _ => false,
        }
    }

    /*
     * Painting
     */

    #[instrument(level = "trace", skip_all)]
    pub fn paint(&mut self, renderer: &mut dyn render::Renderer) {
        if self.viewport.settle() {
            let extents = self.scroll_extents();
            self.viewport.clamp(&extents);
        }

        renderer.begin_frame(&render::Frame {
            translate_x: -self.viewport.horizontal_pixels(&self.layout),
            width: self.viewport.width,
            height: self.viewport.height,
        });

        let bpr = self.layout.bytes_per_row;
        let ch = self.layout.ch();
        let data_size = self.data_size();

        if let Some(stream) = &self.stream {
            if bpr > 0 {
                let mut offset = self.normalized_offset();
                let mut top = 0;
                let mut word_count = 0;

                while top + ch < self.viewport.height && offset < data_size {
                    let row = dump::RowBytes::read(&**stream, offset, bpr);
                    if !row.is_empty() {
                        renderer.row(&self.row_paint(&row, top, &mut word_count));
                    }
                    if row.short {
                        break;
                    }

                    offset+= bpr;
                    top+= ch;
                }
            }
        }

        if self.config.show_column_separators {
            if self.config.show_address {
                renderer.separator(self.layout.line1);
            }
            if self.config.show_hex {
                renderer.separator(self.layout.line2);
            }
            if self.config.show_ascii {
                renderer.separator(self.layout.line3);
            }
        }
    }

    fn row_paint(&self, row: &dump::RowBytes, top: i64, word_count: &mut usize) -> render::RowPaint {
        let cold = self.config.is_cold(row.offset);
        let address = addr::rebase(self.config.address_offset, row.offset);

        render::RowPaint {
            top,
            height: self.layout.ch(),
            address: self.config.show_address.then(|| render::AddressLabel {
                text: self.config.address_format().format(address),
                left: 0,
                cold,
            }),
            hex: if self.config.show_hex { self.hex_spans(row, cold, word_count) } else { Vec::new() },
            ascii: if self.config.show_ascii { self.ascii_glyphs(row, cold) } else { Vec::new() },
            comment: match &self.comments {
                Some(provider) if self.config.show_comments => Some((self.layout.comment_left, provider.comment(address, self.config.word_width))),
                _ => None,
            },
        }
    }

    fn hex_spans(&self, row: &dump::RowBytes, cold: bool, word_count: &mut usize) -> Vec<render::HexSpan> {
        let ww = self.layout.word_width;
        let data_size = self.data_size();
        let mut spans = Vec::with_capacity(self.config.row_width);

        for column in 0..self.layout.row_width {
            let index = row.offset + column * ww;
            if index + ww > row.end() {
                break;
            }
            let Some(bytes) = row.word(index, ww) else { continue };

            let selected = dump::word_selected(&self.selection, index, ww, data_size);
            let gap_selected = selected
                && column != self.layout.row_width - 1
                && dump::word_selected(&self.selection, index + ww, ww, data_size);

            spans.push(render::HexSpan {
                text: dump::format_word(bytes),
                left: self.layout.hex_word_left(column),
                width: self.layout.hex_word_width(),
                selected,
                cold,
                alternate: *word_count % 2 == 1,
                gap_selected,
            });

            *word_count+= 1;
        }

        spans
    }

    fn ascii_glyphs(&self, row: &dump::RowBytes, cold: bool) -> Vec<render::AsciiGlyph> {
        let data_size = self.data_size();
        let mut glyphs = Vec::new();

        for i in 0..self.layout.bytes_per_row {
            let index = row.offset + i;
            if index >= row.end() {
                break;
            }
            let Some(b) = row.get(index) else { continue };

            glyphs.push(render::AsciiGlyph {
                ch: if dump::is_exportable(b) { util::byte_glyph(b) } else { self.config.unprintable_char },
                left: self.layout.ascii_byte_left(i),
                selected: self.selection.contains(index, data_size),
                printable: util::is_printable(b),
                cold,
            });
        }

        glyphs
    }

    /*
     * Clipboard
     */

    /// Row-structured text for the selection, one line per row.
    pub fn copy_selection_text(&self) -> Option<String> {
        if !self.selection.has_selection() {
            return None;
        }

        let stream = self.stream.as_deref()?;
        let serializer = dump::RowSerializer::new(&self.config, stream)
            .with_comments(self.comments.as_deref());

        Some(serializer.text(&self.selection, self.normalized_offset()))
    }

    pub fn copy_address_text(&self) -> Option<String> {
        self.selection_address().map(|address| format!("0x{:x}", address))
    }

    pub fn copy_selection(&self, clipboard: &mut dyn clipboard::Clipboard) -> bool {
        match self.copy_selection_text() {
            Some(text) => {
                clipboard::publish(clipboard, &text);
                true
            },
            None => false,
        }
    }

    pub fn copy_address(&self, clipboard: &mut dyn clipboard::Clipboard) -> bool {
        match self.copy_address_text() {
            Some(text) => {
                clipboard::publish(clipboard, &text);
                true
            },
            None => false,
        }
    }
}
