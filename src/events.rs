//! The event contract between [`crate::parser::SixelParser`] and whatever
//! consumes its output.
//!
//! Anything that implements this trait can sit behind the parser: a null
//! sink for conformance tests, a recording sink that just logs the call
//! sequence, or [`crate::builder::SixelImageBuilder`] for real pixels.

use crate::color::RGBColor;
use crate::geometry::Size;

pub trait Events {
    /// Use `color` for subsequent `render` calls.
    fn use_color(&mut self, color: RGBColor);

    /// Move the sixel cursor back to column 0 (graphics carriage return).
    fn rewind(&mut self);

    /// Move the sixel cursor to column 0 of the next sixel band.
    fn newline(&mut self);

    /// Record the aspect ratio and resize to `image_size` (clamped to the
    /// consumer's own maximum).
    fn set_raster(&mut self, pan: i32, pad: i32, image_size: Size);

    /// Paint `sixel` (a 6-bit vertical pixel pattern, bit 0 = top) at the
    /// current cursor position, then advance the cursor one column.
    fn render(&mut self, sixel: u8);
}
