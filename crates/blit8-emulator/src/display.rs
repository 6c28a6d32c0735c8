use std::fmt;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_ROW_BYTES, DISPLAY_WIDTH, FRAMEBUFFER_SIZE};

/// A copy of the screen contents, handed to whatever renders the pixels.
///
/// Pixels are packed one bit each, row-major, 8 bytes per row. Bit 7 of a byte is the leftmost of
/// its 8 pixels.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Framebuffer([u8; FRAMEBUFFER_SIZE]);

impl Framebuffer {
    pub fn as_bytes(&self) -> &[u8; FRAMEBUFFER_SIZE] {
        &self.0
    }

    /// Whether the pixel at column `x`, row `y` is lit
    ///
    /// # Panics
    /// When (`x`, `y`) lies outside the 64x32 screen
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(
            x < DISPLAY_WIDTH as usize && y < DISPLAY_HEIGHT as usize,
            "pixel ({x}, {y}) is off the screen"
        );
        let byte = self.0[y * DISPLAY_ROW_BYTES + x / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// The 8 packed bytes making up row `y`
    ///
    /// # Panics
    /// When `y` is not one of the 32 rows
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < DISPLAY_HEIGHT as usize, "row {y} is off the screen");
        let start = y * DISPLAY_ROW_BYTES;
        &self.0[start..start + DISPLAY_ROW_BYTES]
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    pub fn lit_pixels(&self) -> u32 {
        self.0.iter().map(|byte| byte.count_ones()).sum()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer([0; FRAMEBUFFER_SIZE])
    }
}

/// One line of `#` and `.` per display row
impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..DISPLAY_HEIGHT as usize {
            for x in 0..DISPLAY_WIDTH as usize {
                f.write_str(if self.pixel(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Framebuffer ({} lit)", self.lit_pixels())?;
        fmt::Display::fmt(self, f)
    }
}

/// The monochrome 64x32 screen. Sprites are XOR'ed onto it; the display owns its framebuffer and
/// only ever hands out copies.
#[derive(Clone, Default, Debug)]
pub struct Display {
    framebuffer: Framebuffer,
}

impl Display {
    /// XOR's the sprite rows onto the screen with the top left corner at (`x`, `y`) and returns
    /// whether any lit pixel was switched off.
    ///
    /// Rows wrap around to the top of the screen. Within a row, the bits that fall off the right
    /// edge wrap around to column 0 of that same row, never into the next one.
    pub fn draw(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let shift = x % 8;
        let column = usize::from(x / 8) % DISPLAY_ROW_BYTES;
        let mut collision = false;

        for (offset, bits) in sprite.iter().enumerate() {
            let row = (usize::from(y) + offset) % DISPLAY_HEIGHT as usize;
            let row_start = row * DISPLAY_ROW_BYTES;
            let left = row_start + column;
            let right = row_start + (column + 1) % DISPLAY_ROW_BYTES;

            let left_bits = bits >> shift;
            // shifting by 8 would be an overflow, and with no shift nothing spills over anyway
            let right_bits = bits.checked_shl(u32::from(8 - shift)).unwrap_or(0);

            let pixels = &mut self.framebuffer.0;
            collision |= pixels[left] & left_bits != 0 || pixels[right] & right_bits != 0;
            pixels[left] ^= left_bits;
            pixels[right] ^= right_bits;
        }
        collision
    }

    pub fn clear(&mut self) {
        self.framebuffer = Framebuffer::default();
    }

    pub fn snapshot(&self) -> Framebuffer {
        self.framebuffer
    }
}
