//! Property-based tests for the invariants listed in the sixel pipeline's
//! public contract: the parser always returns to `Ground`, the framebuffer
//! length tracks `size`, `render` paints exactly `popcount` pixels, and the
//! cursor's rewind/newline rules hold for arbitrary byte streams.

use proptest::prelude::*;

use crate::builder::SixelImageBuilder;
use crate::color::RGBColor;
use crate::events::Events;
use crate::geometry::Size;
use crate::parser::{ParserState, SixelParser};

#[derive(Default)]
struct NullSink;

impl Events for NullSink {
    fn use_color(&mut self, _color: RGBColor) {}
    fn rewind(&mut self) {}
    fn newline(&mut self) {}
    fn set_raster(&mut self, _pan: i32, _pad: i32, _image_size: Size) {}
    fn render(&mut self, _sixel: u8) {}
}

proptest! {
    /// P1: for every byte sequence, `parse(s); done()` ends in `Ground`.
    #[test]
    fn p1_always_returns_to_ground(bytes: Vec<u8>) {
        let mut sink = NullSink;
        let mut parser = SixelParser::new(&mut sink);
        parser.parse_fragment(&bytes);
        parser.done();
        prop_assert_eq!(parser.state(), ParserState::Ground);
    }

    /// P2: framebuffer length always equals `width * height * 4`.
    #[test]
    fn p2_framebuffer_len_tracks_size(bytes: Vec<u8>) {
        let mut builder = SixelImageBuilder::new(Size::new(20, 18), RGBColor::BLACK);
        crate::parse(&bytes, &mut builder);
        prop_assert_eq!(builder.data().len(), builder.size().rgba_byte_len());
    }

    /// P3: `render(sixel)` with the cursor in bounds paints exactly
    /// `popcount(sixel & 0x3F)` pixels to `current_color`.
    #[test]
    fn p3_render_paints_popcount_pixels(sixel in 0u8..=0x3F) {
        let mut builder = SixelImageBuilder::new(Size::new(4, 6), RGBColor::BLACK);
        let red = RGBColor::new(255, 0, 0);
        builder.use_color(red);
        builder.render(sixel);

        let painted = (0..6)
            .filter(|row| builder.at(crate::geometry::Coordinate::new(*row, 0)) == red)
            .count();
        prop_assert_eq!(painted, sixel.count_ones() as usize);
    }

    /// P4: `rewind()` is idempotent.
    #[test]
    fn p4_rewind_is_idempotent(sixel in 0u8..=0x3F) {
        let mut builder = SixelImageBuilder::new(Size::new(4, 6), RGBColor::BLACK);
        builder.render(sixel);
        builder.rewind();
        let once = builder.sixel_cursor();
        builder.rewind();
        prop_assert_eq!(builder.sixel_cursor(), once);
    }

    /// P5: `newline()` never advances the cursor row past `height - 6`.
    #[test]
    fn p5_newline_never_overshoots(height in 0i32..200, newlines in 0u8..40) {
        let mut builder = SixelImageBuilder::new(Size::new(4, height), RGBColor::BLACK);
        for _ in 0..newlines {
            builder.newline();
        }
        prop_assert!(builder.sixel_cursor().row <= (height - 6).max(0));
    }

    /// P6: splitting a byte stream across arbitrary call boundaries never
    /// changes the resulting framebuffer.
    #[test]
    fn p6_split_feed_matches_whole_feed(bytes: Vec<u8>, split_at in 0usize..64) {
        let mut whole = SixelImageBuilder::new(Size::new(16, 12), RGBColor::BLACK);
        crate::parse(&bytes, &mut whole);

        let mut split = SixelImageBuilder::new(Size::new(16, 12), RGBColor::BLACK);
        let mut parser = SixelParser::new(&mut split);
        let at = split_at.min(bytes.len());
        parser.parse_fragment(&bytes[..at]);
        parser.parse_fragment(&bytes[at..]);
        parser.done();

        prop_assert_eq!(whole.data(), split.data());
    }
}
