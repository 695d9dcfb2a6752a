//! RGB color triplet and the indexed palette the Sixel parser keeps.

use log::warn;

/// Palette entries beyond this index are rejected outright (Open Question 3:
/// the original `setColor` gate let index 256 itself through with `<=`,
/// one past the initial 256-entry table; this implementation clamps to `<`).
pub const MAX_COLOR_COUNT: usize = 256;

/// An 8-bit RGB triplet. No alpha channel — alpha is synthesized as `0xFF`
/// whenever a color is written into a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RGBColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RGBColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const BLACK: RGBColor = RGBColor::new(0, 0, 0);
}

/// An indexed color table, seeded to 256 zero (black) entries.
///
/// Lookup (`get`) wraps modulo the current length. Assignment (`set`) is
/// gated to `index < `[`MAX_COLOR_COUNT`] (Open Question 3), and the table
/// is always constructed at exactly that length, so every accepted index is
/// already in bounds — there is no backing-vector growth to perform. (The
/// source's `setColor` grows the vector to `index` entries before indexing
/// into `index`, an off-by-one that reads/writes past the end whenever that
/// growth branch is taken; Open Question 3's fixed-size, gated table sidesteps
/// the bug entirely rather than reproducing it with a corrected bound.)
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Palette {
    pub fn new() -> Self {
        Self { colors: vec![RGBColor::default(); MAX_COLOR_COUNT] }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Read the color at `index`, wrapped modulo the palette's length (I4).
    pub fn get(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    /// Write `color` at `index`. Rejects `index >= `[`MAX_COLOR_COUNT`]
    /// (Open Question 3); every accepted index already fits the fixed-size
    /// table built by [`Palette::new`].
    pub fn set(&mut self, index: usize, color: RGBColor) {
        if index >= MAX_COLOR_COUNT {
            warn!("sixel: color index {} rejected, palette limit is {}", index, MAX_COLOR_COUNT);
            return;
        }
        self.colors[index] = color;
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_wraps_modulo_len() {
        let palette = Palette::new();
        assert_eq!(palette.get(0), palette.get(MAX_COLOR_COUNT));
    }

    #[test]
    fn set_writes_in_place_without_changing_len() {
        let mut palette = Palette::new();
        let before_len = palette.len();
        let red = RGBColor::new(255, 0, 0);
        palette.set(10, red);
        assert_eq!(palette.get(10), red);
        assert_eq!(palette.len(), before_len);
    }

    #[test]
    fn set_rejects_index_at_limit() {
        let mut palette = Palette::new();
        let before_len = palette.len();
        palette.set(MAX_COLOR_COUNT, RGBColor::new(1, 2, 3));
        assert_eq!(palette.len(), before_len);
        assert_eq!(palette.get(MAX_COLOR_COUNT), RGBColor::default());
    }
}
