/// The width of the display in pixels
pub const DISPLAY_WIDTH: u8 = 64;
/// The height of the display in pixels
pub const DISPLAY_HEIGHT: u8 = 32;
/// Bytes per framebuffer row, every byte packs 8 horizontal pixels
pub const DISPLAY_ROW_BYTES: usize = DISPLAY_WIDTH as usize / 8;
/// Size of the packed framebuffer, 2048 bits
pub const FRAMEBUFFER_SIZE: usize = DISPLAY_ROW_BYTES * DISPLAY_HEIGHT as usize;
/// The size of ram in bytes
pub const RAM_SIZE: usize = 4096;
/// Every computed address wraps with this mask
pub const ADDRESS_MASK: u16 = 0x0FFF;
/// For the regular chip 8 roms
pub const ROM_START_ADDRESS: u16 = 0x200;
/// The biggest rom that fits between the start address and the end of ram
pub const MAX_ROM_SIZE: usize = RAM_SIZE - ROM_START_ADDRESS as usize;
/// Where the hexadecimal font lives in ram
pub const FONT_START_ADDRESS: u16 = 0x000;
/// Each font glyph is 5 rows tall
pub const FONT_GLYPH_HEIGHT: u8 = 5;
/// Amount of registers CHIP-8 has
pub const NUM_REGISTERS: u8 = 16;
/// Amount of keys on the hexadecimal keypad
pub const NUM_KEYS: u8 = 16;
/// Nested subroutine depth before the stack overflows
pub const STACK_DEPTH: usize = 16;
/// How many cycles the cpu advances for every timer tick. This decides how fast the cpu will run
pub const CYCLES_PER_FRAME: usize = 5;
/// The timers count down this many times per second
pub const TIMER_HZ: u32 = 60;
/// Seed used for the random number generator unless configured otherwise
pub const DEFAULT_SEED: u64 = 2;

/// The hexadecimal font, 16 glyphs of 4x5 pixels. Only the high nibble of every byte is used.
#[rustfmt::skip]
pub const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, //0
    0x20, 0x60, 0x20, 0x20, 0x70, //1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, //2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, //3
    0x90, 0x90, 0xF0, 0x10, 0x10, //4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, //5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, //6
    0xF0, 0x10, 0x20, 0x40, 0x40, //7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, //8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, //9
    0xF0, 0x90, 0xF0, 0x90, 0x90, //a
    0xE0, 0x90, 0xE0, 0x90, 0xE0, //b
    0xF0, 0x80, 0x80, 0x80, 0xF0, //c
    0xE0, 0x90, 0x90, 0x90, 0xE0, //d
    0xF0, 0x80, 0xF0, 0x80, 0xF0, //e
    0xF0, 0x80, 0xF0, 0x80, 0x80, //f
];
