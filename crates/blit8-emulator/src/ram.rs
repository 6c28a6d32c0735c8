use crate::constants::{ADDRESS_MASK, FONT_START_ADDRESS, FONTSET, RAM_SIZE, ROM_START_ADDRESS};
use crate::rombuffer::RomBuffer;

///The ram of the chip8 cpu, uses big endian, and is laid out in the following way:
///0x000 to 0x050 the hexadecimal fontset
///0x050 to 0x200 zeroed, historically the interpreter itself
///0x200 start of the loaded program
///0xfff end of chip8 ram
///
///Every address wraps around at the end of ram.
#[derive(Debug, Clone)]
pub struct Ram {
    bytes: [u8; RAM_SIZE],
}

impl Ram {
    /// Returns the ram with the fontset already loaded
    pub fn with_fonts() -> Self {
        // Write out the bytes of a glyph in binary below one another and the ones draw the
        // character. F0 90 90 90 F0 is
        //
        // 1111
        // 1  1
        // 1  1
        // 1  1
        // 1111
        let mut ram = Self {
            bytes: [0; RAM_SIZE],
        };
        let start = FONT_START_ADDRESS as usize;
        ram.bytes[start..start + FONTSET.len()].copy_from_slice(&FONTSET);
        ram
    }

    /// Fonts at the bottom, the rom at 0x200 and zeroes everywhere else
    pub fn with_rom(rom: &RomBuffer) -> Self {
        let mut ram = Self::with_fonts();
        let start = ROM_START_ADDRESS as usize;
        ram.bytes[start..start + rom.len()].copy_from_slice(rom.contents());
        ram
    }

    /// Returns the big endian opcode stored at `address` and the byte after it
    pub fn get_opcode(&self, address: u16) -> u16 {
        u16::from_be_bytes([self.get_byte(address), self.get_byte(address.wrapping_add(1))])
    }

    pub fn get_byte(&self, address: u16) -> u8 {
        self.bytes[usize::from(address & ADDRESS_MASK)]
    }

    pub fn set(&mut self, address: u16, value: u8) {
        self.bytes[usize::from(address & ADDRESS_MASK)] = value;
    }

    /// Copies `len` bytes starting at `address`, wrapping past the end of ram
    pub fn read_wrapping(&self, address: u16, len: u8) -> Vec<u8> {
        (0..u16::from(len))
            .map(|offset| self.get_byte(address.wrapping_add(offset)))
            .collect()
    }

    pub fn bytes(&self) -> &[u8; RAM_SIZE] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fonts_are_loaded_and_the_rest_is_zeroed() {
        let ram = Ram::with_fonts();
        assert_eq!(ram.bytes[..80], FONTSET);
        assert!(ram.bytes[80..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn rom_lands_at_0x200() {
        let rom = RomBuffer::from_bytes(vec![0x12, 0x34, 0x56]).unwrap();
        let ram = Ram::with_rom(&rom);
        assert_eq!(ram.bytes[0x200..0x203], [0x12, 0x34, 0x56]);
        assert!(ram.bytes[0x50..0x200].iter().all(|byte| *byte == 0));
        assert!(ram.bytes[0x203..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn opcodes_are_big_endian() {
        let rom = RomBuffer::from_bytes(vec![0xAA, 0xBB]).unwrap();
        assert_eq!(Ram::with_rom(&rom).get_opcode(0x200), 0xAABB);
    }

    #[test]
    fn fetch_wraps_at_the_end_of_ram() {
        let mut ram = Ram::with_fonts();
        ram.set(0xFFF, 0x12);
        // the low byte comes from address 0x000, the first row of the zero glyph
        assert_eq!(ram.get_opcode(0xFFF), 0x12F0);
    }

    #[test]
    fn addresses_are_masked_to_12_bits() {
        let mut ram = Ram::with_fonts();
        ram.set(0x1300, 7);
        assert_eq!(ram.get_byte(0x300), 7);
    }

    #[test]
    fn reads_wrap_around() {
        let mut ram = Ram::with_fonts();
        ram.set(0xFFE, 1);
        ram.set(0xFFF, 2);
        assert_eq!(ram.read_wrapping(0xFFE, 3), vec![1, 2, 0xF0]);
    }
}
