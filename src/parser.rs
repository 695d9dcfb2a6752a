//! Streaming byte-level Sixel command parser.
//!
//! Parses a sixel data stream and emits structured [`Events`] calls. The
//! stream is assumed already stripped of its DCS introducer and string
//! terminator — that split belongs to the outer VT parser, which is not
//! this crate's concern.
//!
//! ## Sequence structure
//! ```text
//! [ " pan;pad;xPx;yPx ] [ # Pc[;Pu;Px;Py;Pz] ]* [ sixel-data | ! N sixel | $ | - ]*
//! ```
//! - `0x3F..=0x7E` ('?' to '~'): a sixel, 6 bits of vertical pixels, LSB = top.
//! - `#Pc` selects palette index `Pc`; `#Pc;Pu;Px;Py;Pz` defines it (`Pu == 2`
//!   is RGB, given as percentages 0..100). `Pu == 1` (HLS) is recognized and
//!   parsed but leaves the palette untouched — this release does not convert it.
//! - `!n<sixel>` repeats the following sixel `n` times.
//! - `$` is graphics carriage return, `-` is graphics newline.
//! - `"pan;pad;xPx;yPx` sets the aspect ratio and image dimensions.
//!
//! ## References
//! - VT340 Graphics Programming: <https://vt100.net/docs/vt3xx-gp/chapter14.html>
//! - Sixel format: <https://en.wikipedia.org/wiki/Sixel>

use log::trace;

use crate::color::{Palette, RGBColor};
use crate::events::Events;
use crate::geometry::Size;

/// Parser state. No terminal state; [`SixelParser::done`] forces a
/// transition back to `Ground` so any pending leave-action still fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Ground,
    RasterSettings,
    RepeatIntroducer,
    ColorIntroducer,
    ColorParam,
}

#[inline]
fn is_digit(value: u8) -> bool {
    value.is_ascii_digit()
}

#[inline]
fn to_digit(value: u8) -> u32 {
    u32::from(value - b'0')
}

#[inline]
fn is_sixel(value: u8) -> bool {
    (0x3F..=0x7E).contains(&value)
}

#[inline]
fn to_sixel(value: u8) -> u8 {
    value - 0x3F
}

/// Converts a color component on the DEC 0..100 percentage scale to 0..255,
/// rounding to nearest and wrapping modulo 256 the way the source's
/// `static_cast<uint8_t>(...)` truncation effectively does for in-range input.
fn convert_component(value: u32) -> u8 {
    (((u64::from(value) * 255 + 50) / 100) % 256) as u8
}

/// Parses a Sixel byte stream, dispatching structured events to `E`.
///
/// Holds a borrowed `events` sink for its whole lifetime and otherwise owns
/// only transient parse state (current state, the accumulating parameter
/// list, and the color palette — the palette is parser-local: the builder
/// never reads it, only the materialized `use_color` events it fires).
pub struct SixelParser<'a, E: Events> {
    state: ParserState,
    params: Vec<u32>,
    palette: Palette,
    events: &'a mut E,
}

impl<'a, E: Events> SixelParser<'a, E> {
    pub fn new(events: &'a mut E) -> Self {
        Self { state: ParserState::Ground, params: Vec::new(), palette: Palette::new(), events }
    }

    /// One-shot convenience: parse a complete payload and flush.
    pub fn parse_all(bytes: &[u8], events: &'a mut E) {
        let mut parser = Self::new(events);
        parser.parse_fragment(bytes);
        parser.done();
    }

    /// Feed a contiguous range of bytes.
    pub fn parse_fragment(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.parse(byte);
        }
    }

    /// Feed one byte. Never fails; unrecognized bytes in `Ground` are
    /// silently ignored.
    pub fn parse(&mut self, value: u8) {
        match self.state {
            ParserState::Ground => self.fallback(value),

            ParserState::RepeatIntroducer => {
                if is_digit(value) {
                    self.param_shift_and_add_digit(to_digit(value));
                } else if is_sixel(value) {
                    let sixel = to_sixel(value);
                    let count = self.params.first().copied().unwrap_or(0);
                    for _ in 0..count {
                        self.events.render(sixel);
                    }
                    self.transition_to(ParserState::Ground);
                } else {
                    self.fallback(value);
                }
            }

            ParserState::ColorIntroducer => {
                if is_digit(value) {
                    self.param_shift_and_add_digit(to_digit(value));
                    self.transition_to(ParserState::ColorParam);
                } else {
                    self.fallback(value);
                }
            }

            ParserState::ColorParam => {
                if is_digit(value) {
                    self.param_shift_and_add_digit(to_digit(value));
                } else if value == b';' {
                    self.params.push(0);
                } else {
                    self.fallback(value);
                }
            }

            ParserState::RasterSettings => {
                if is_digit(value) {
                    self.param_shift_and_add_digit(to_digit(value));
                } else if value == b';' {
                    self.params.push(0);
                } else {
                    self.fallback(value);
                }
            }
        }
    }

    /// Signal end-of-stream: fires the current state's leave-action, then
    /// returns to `Ground`.
    pub fn done(&mut self) {
        self.transition_to(ParserState::Ground);
    }

    /// The parser's current state (P1: always `Ground` after `done()`).
    pub fn state(&self) -> ParserState {
        self.state
    }

    fn fallback(&mut self, value: u8) {
        match value {
            b'#' => self.transition_to(ParserState::ColorIntroducer),
            b'!' => self.transition_to(ParserState::RepeatIntroducer),
            b'"' => self.transition_to(ParserState::RasterSettings),
            b'$' => {
                self.transition_to(ParserState::Ground);
                self.events.rewind();
            }
            b'-' => {
                self.transition_to(ParserState::Ground);
                self.events.newline();
            }
            _ => {
                if self.state != ParserState::Ground {
                    self.transition_to(ParserState::Ground);
                }
                if is_sixel(value) {
                    self.events.render(to_sixel(value));
                }
            }
        }
    }

    /// Replaces the last accumulated parameter `n` with `n*10 + d`,
    /// saturating so a pathologically long digit run clamps instead of
    /// wrapping or panicking.
    fn param_shift_and_add_digit(&mut self, digit: u32) {
        if let Some(last) = self.params.last_mut() {
            *last = last.saturating_mul(10).saturating_add(digit);
        }
    }

    fn transition_to(&mut self, new_state: ParserState) {
        self.leave_state();
        self.state = new_state;
        self.enter_state();
    }

    fn enter_state(&mut self) {
        match self.state {
            ParserState::ColorIntroducer | ParserState::RepeatIntroducer | ParserState::RasterSettings => {
                self.params.clear();
                self.params.push(0);
            }
            ParserState::Ground | ParserState::ColorParam => {}
        }
    }

    fn leave_state(&mut self) {
        match self.state {
            ParserState::Ground | ParserState::ColorIntroducer | ParserState::RepeatIntroducer => {}

            ParserState::RasterSettings => {
                if self.params.len() == 4 {
                    let pan = self.params[0] as i32;
                    let pad = self.params[1] as i32;
                    let x_pixels = self.params[2] as i32;
                    let y_pixels = self.params[3] as i32;
                    trace!("sixel: raster settings {}:{} {}x{}", pan, pad, x_pixels, y_pixels);
                    self.events.set_raster(pan, pad, Size::new(x_pixels, y_pixels));
                }
            }

            ParserState::ColorParam => self.leave_color_param(),
        }
    }

    fn leave_color_param(&mut self) {
        match self.params.len() {
            1 => {
                let index = self.params[0] as usize;
                let color = self.palette.get(index);
                trace!("sixel: use color #{}", index);
                self.events.use_color(color);
            }
            5 => {
                let index = self.params[0] as usize;
                match self.params[1] {
                    2 => {
                        let color = RGBColor::new(
                            convert_component(self.params[2]),
                            convert_component(self.params[3]),
                            convert_component(self.params[4]),
                        );
                        trace!("sixel: color definition #{} = {:?}", index, color);
                        self.palette.set(index, color);
                    }
                    1 => {
                        // HLS is recognized but not converted in this release;
                        // the palette is left untouched (spec.md §9 open question 2).
                        trace!("sixel: color definition #{} uses HLS, not assigned", index);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}
