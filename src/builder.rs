//! Consumes [`Events`] to rasterize Sixel output into an RGBA framebuffer.

use log::warn;

use crate::color::RGBColor;
use crate::events::Events;
use crate::geometry::{clamp, AspectRatio, Coordinate, Size};

/// Builds an RGBA image from a stream of Sixel events.
///
/// Owns its framebuffer and palette-free drawing state for its whole
/// lifetime (the palette itself lives in the parser, per the parser's own
/// module doc — the builder only ever sees materialized `use_color` calls).
pub struct SixelImageBuilder {
    max_size: Size,
    default_color: RGBColor,
    size: Size,
    buffer: Vec<u8>,
    sixel_cursor: Coordinate,
    current_color: RGBColor,
    aspect_ratio: AspectRatio,
}

impl SixelImageBuilder {
    pub fn new(max_size: Size, default_color: RGBColor) -> Self {
        let mut builder = Self {
            max_size,
            default_color,
            size: max_size,
            buffer: Vec::new(),
            sixel_cursor: Coordinate::default(),
            current_color: default_color,
            aspect_ratio: AspectRatio::new(1, 1),
        };
        builder.clear();
        builder
    }

    pub fn default_color(&self) -> RGBColor {
        self.default_color
    }

    pub fn max_size(&self) -> Size {
        self.max_size
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn current_color(&self) -> RGBColor {
        self.current_color
    }

    pub fn sixel_cursor(&self) -> Coordinate {
        self.sixel_cursor
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Read the color at `coord`, wrapping modulo the current image size.
    /// Wrap is intentional for query convenience; it never applies to writes.
    pub fn at(&self, coord: Coordinate) -> RGBColor {
        if self.size.width <= 0 || self.size.height <= 0 {
            return self.default_color;
        }
        let row = coord.row.rem_euclid(self.size.height) as usize;
        let col = coord.column.rem_euclid(self.size.width) as usize;
        let idx = (row * self.size.width as usize + col) * 4;
        RGBColor::new(self.buffer[idx], self.buffer[idx + 1], self.buffer[idx + 2])
    }

    /// Refill the framebuffer with `default_color` at full opacity.
    pub fn clear(&mut self) {
        let len = self.size.rgba_byte_len();
        self.buffer = vec![0u8; len];
        let [r, g, b] = [self.default_color.red, self.default_color.green, self.default_color.blue];
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[r, g, b, 0xFF]);
        }
    }

    fn write(&mut self, coord: Coordinate, color: RGBColor) {
        if coord.row < 0
            || coord.column < 0
            || coord.row >= self.size.height
            || coord.column >= self.size.width
        {
            return; // I2: out-of-bounds writes are silently dropped.
        }
        let idx = (coord.row as usize * self.size.width as usize + coord.column as usize) * 4;
        self.buffer[idx..idx + 4].copy_from_slice(&[color.red, color.green, color.blue, 0xFF]);
    }
}

impl Events for SixelImageBuilder {
    fn use_color(&mut self, color: RGBColor) {
        self.current_color = color;
    }

    fn rewind(&mut self) {
        self.sixel_cursor.column = 0;
    }

    fn newline(&mut self) {
        self.sixel_cursor.column = 0;
        // Only advance if the *next* band also fits, so sixel_cursor.row
        // stays within [0, size.height - 6] (I1/P5) even for a height that
        // isn't a multiple of 6 — a stricter reading than the one-band-ahead
        // check the source's own wording suggests, but the one that keeps
        // both invariants true for every height rather than just height %
        // 6 == 0. See DESIGN.md.
        let next_row = self.sixel_cursor.row + 6;
        if next_row + 6 <= self.size.height {
            self.sixel_cursor.row = next_row;
        }
    }

    fn set_raster(&mut self, pan: i32, pad: i32, image_size: Size) {
        self.aspect_ratio = AspectRatio::new(pan, pad);
        self.size = Size::new(
            clamp(image_size.width, 0, self.max_size.width),
            clamp(image_size.height, 0, self.max_size.height),
        );
        if self.size.width != image_size.width || self.size.height != image_size.height {
            warn!(
                "sixel: raster size {}x{} clamped to {}x{} (max {}x{})",
                image_size.width,
                image_size.height,
                self.size.width,
                self.size.height,
                self.max_size.width,
                self.max_size.height
            );
        }
        self.buffer = vec![0u8; self.size.rgba_byte_len()];
    }

    fn render(&mut self, sixel: u8) {
        let x = self.sixel_cursor.column;
        if x >= self.size.width {
            return;
        }
        for bit in 0..6 {
            if (sixel >> bit) & 1 != 0 {
                let coord = Coordinate::new(self.sixel_cursor.row + bit, x);
                let color = self.current_color;
                self.write(coord, color);
            }
        }
        self.sixel_cursor.column += 1;
    }
}
