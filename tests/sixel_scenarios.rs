//! Integration scenarios for the sixel parser/builder pipeline, mirroring
//! the worked examples a sixel implementation is expected to get right:
//! palette definition, repeat introducers, band newlines, raster sizing,
//! and silent recovery from malformed color definitions.

use sixel_core::{parse, Coordinate, RGBColor, Size, SixelImageBuilder};

fn builder(max: Size) -> SixelImageBuilder {
    SixelImageBuilder::new(max, RGBColor::BLACK)
}

#[test]
fn two_pixel_red_dot_sets_no_bits() {
    // '?' == sixel value 0: no bits set, every pixel stays black.
    let mut b = builder(Size::new(10, 6));
    parse(b"#1;2;100;0;0#1?", &mut b);
    for row in 0..6 {
        assert_eq!(b.at(Coordinate::new(row, 0)), RGBColor::BLACK);
    }
    assert_eq!(b.sixel_cursor(), Coordinate::new(0, 1));
}

#[test]
fn full_column_red() {
    // '~' == sixel value 63: all 6 bits set.
    let mut b = builder(Size::new(10, 6));
    parse(b"#1;2;100;0;0#1~", &mut b);
    for row in 0..6 {
        assert_eq!(b.at(Coordinate::new(row, 0)), RGBColor::new(255, 0, 0));
    }
    assert_eq!(b.sixel_cursor(), Coordinate::new(0, 1));
}

#[test]
fn repeat_introducer_paints_three_columns() {
    let mut b = builder(Size::new(10, 6));
    parse(b"#1;2;100;0;0#1!3~", &mut b);
    for col in 0..3 {
        for row in 0..6 {
            assert_eq!(b.at(Coordinate::new(row, col)), RGBColor::new(255, 0, 0));
        }
    }
    assert_eq!(b.sixel_cursor(), Coordinate::new(0, 3));
}

#[test]
fn newline_band_stacks_below_the_first() {
    let mut b = builder(Size::new(10, 12));
    parse(b"#1;2;0;100;0#1~-~", &mut b);

    for row in 0..6 {
        assert_eq!(b.at(Coordinate::new(row, 0)), RGBColor::new(0, 255, 0));
    }
    for row in 6..12 {
        assert_eq!(b.at(Coordinate::new(row, 0)), RGBColor::new(0, 255, 0));
    }
    assert_eq!(b.sixel_cursor(), Coordinate::new(6, 1));
}

#[test]
fn raster_settings_resizes_the_framebuffer() {
    let mut b = builder(Size::new(100, 100));
    parse(b"\"1;1;20;12", &mut b);
    assert_eq!(b.size(), Size::new(20, 12));
    assert_eq!(b.data().len(), 20 * 12 * 4);
}

#[test]
fn malformed_four_param_color_definition_is_silently_dropped() {
    // Five params are required to define a color; four leaves the
    // pre-existing current color (black) in place, no event fires.
    let mut b = builder(Size::new(10, 6));
    parse(b"#1;2;100;0~", &mut b);
    for row in 0..6 {
        assert_eq!(b.at(Coordinate::new(row, 0)), RGBColor::BLACK);
    }
}

#[test]
fn stream_of_blank_sixels_leaves_the_framebuffer_at_clear_state() {
    let mut b = builder(Size::new(8, 12));
    let after_clear = b.data().to_vec();
    parse(b"#1;2;100;0;0#1" ,&mut b); // select a non-black current color
    parse(&vec![b'?'; 20], &mut b); // but never paint a bit
    assert_eq!(b.data(), after_clear.as_slice());
}

#[test]
fn repeated_color_selection_is_idempotent_on_current_color() {
    let mut b = builder(Size::new(10, 6));
    parse(b"#1;2;100;0;0#1#1~", &mut b);
    assert_eq!(b.at(Coordinate::new(0, 0)), RGBColor::new(255, 0, 0));
}

#[test]
fn facade_is_single_use_and_discards_partial_state() {
    let mut b = builder(Size::new(10, 6));
    sixel_core::parse(b"#1;2;100;0;0#1~", &mut b);
    // A second, independent parse starts from Ground again.
    sixel_core::parse(b"-", &mut b);
    assert_eq!(b.sixel_cursor(), Coordinate::new(0, 0));
}
