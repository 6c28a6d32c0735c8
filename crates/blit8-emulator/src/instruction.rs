use std::fmt;

use crate::error::IllegalOpcode;

/// # A list of every instruction in the chip8 language
/// ## nnn
/// a hexadecimal memory address, it's 12 bits long
/// ## kk
/// a hexadecimal byte, 8 bits
/// ## n
/// a "nibble" 4 bits
/// ## x and y
/// Registers
///
/// Instructions keep every operand nibble of the word they were decoded from, so
/// [`Instruction::encode`] gives back that exact word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Turns all the pixels off
    ClearScreen, //00e0
    /// Sets the program counter to the address on top of the stack
    Return, //00ee
    /// Sets the program counter to whatever nnn is
    Jump { nnn: u16 }, //1nnn
    /// Pushes the address of the next instruction and jumps to nnn
    Call { nnn: u16 }, //2nnn
    /// skips the next instruction only if the register X holds the value kk
    SkipIfEqual { x: u8, kk: u8 }, //3xkk
    /// same as previous, except skips if register x does not hold value kk
    SkipIfNotEqual { x: u8, kk: u8 }, //4xkk
    SkipIfRegistersEqual { x: u8, y: u8 }, //5xy0
    /// Set register x to the value kk
    LoadRegister { x: u8, kk: u8 }, //6xkk
    /// Adds the value kk to register x, without touching the carry flag
    AddToRegister { x: u8, kk: u8 }, //7xkk
    /// Stores the value of register Vy in register Vx
    Move { x: u8, y: u8 }, //8xy0
    Or { x: u8, y: u8 },   //8xy1
    And { x: u8, y: u8 },  //8xy2
    Xor { x: u8, y: u8 },  //8xy3
    /// vx + vy, VF is the carry
    AddRegisters { x: u8, y: u8 }, //8xy4
    /// vx - vy, VF is set when there was no borrow
    SubYFromX { x: u8, y: u8 }, //8xy5
    /// VF gets the bit shifted out
    ShiftRight { x: u8, y: u8 }, //8xy6
    /// vy - vx, VF is set when there was no borrow
    SubXFromY { x: u8, y: u8 }, //8xy7
    ShiftLeft { x: u8, y: u8 }, //8xye
    SkipIfRegistersNotEqual { x: u8, y: u8 }, //9xy0
    /// set index register I to nnn
    SetIndex { nnn: u16 }, //annn
    /// jump to address nnn + v0. `x` is the top nibble of nnn, which some interpreters use as
    /// the register instead of v0
    JumpWithOffset { x: u8, nnn: u16 }, //bnnn
    /// A random byte AND'ed with kk
    Random { x: u8, kk: u8 }, //cxkk
    /// draws a sprite at coordinate from vx and vy, of width 8 and height n
    Draw { x: u8, y: u8, n: u8 }, //dxyn
    SkipIfPressed { x: u8 },    //ex9e
    SkipIfNotPressed { x: u8 }, //exa1
    LoadDelay { x: u8 },        //fx07
    /// Blocks until a key is pressed, then stores it in vx
    WaitForKey { x: u8 }, //fx0a
    SetDelay { x: u8 },   //fx15
    SetSound { x: u8 },   //fx18
    AddToIndex { x: u8 }, //fx1e
    /// Points I at the font glyph for the low nibble of vx
    LoadFont { x: u8 }, //fx29
    /// Writes the hundreds, tens and ones of vx to I, I+1 and I+2
    StoreBcd { x: u8 }, //fx33
    /// Writes v0 through vx to memory starting at I
    StoreRegisters { x: u8 }, //fx55
    /// Reads v0 through vx from memory starting at I
    LoadRegisters { x: u8 }, //fx65
}

impl Instruction {
    /// Takes two bytes, and decodes what instruction they represent. Every word decodes to
    /// exactly one instruction, or to [`IllegalOpcode`].
    pub fn decode(opcode: u16) -> Result<Self, IllegalOpcode> {
        let x = Self::get_nibble(opcode, 1);
        let y = Self::get_nibble(opcode, 2);
        let n = Self::get_nibble(opcode, 3);
        let kk = Self::last_byte(opcode);
        let nnn = Self::oxxx(opcode);

        let instruction = match Self::get_nibble(opcode, 0) {
            0x0 => match opcode {
                0x00E0 => Instruction::ClearScreen,
                0x00EE => Instruction::Return,
                _ => return Err(IllegalOpcode(opcode)),
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipIfEqual { x, kk },
            0x4 => Instruction::SkipIfNotEqual { x, kk },
            0x5 if n == 0x0 => Instruction::SkipIfRegistersEqual { x, y },
            0x6 => Instruction::LoadRegister { x, kk },
            0x7 => Instruction::AddToRegister { x, kk },
            0x8 => match n {
                0x0 => Instruction::Move { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddRegisters { x, y },
                0x5 => Instruction::SubYFromX { x, y },
                0x6 => Instruction::ShiftRight { x, y },
                0x7 => Instruction::SubXFromY { x, y },
                0xE => Instruction::ShiftLeft { x, y },
                _ => return Err(IllegalOpcode(opcode)),
            },
            0x9 if n == 0x0 => Instruction::SkipIfRegistersNotEqual { x, y },
            0xA => Instruction::SetIndex { nnn },
            0xB => Instruction::JumpWithOffset { x, nnn },
            0xC => Instruction::Random { x, kk },
            0xD => Instruction::Draw { x, y, n },
            0xE => match kk {
                0x9E => Instruction::SkipIfPressed { x },
                0xA1 => Instruction::SkipIfNotPressed { x },
                _ => return Err(IllegalOpcode(opcode)),
            },
            0xF => match kk {
                0x07 => Instruction::LoadDelay { x },
                0x0A => Instruction::WaitForKey { x },
                0x15 => Instruction::SetDelay { x },
                0x18 => Instruction::SetSound { x },
                0x1E => Instruction::AddToIndex { x },
                0x29 => Instruction::LoadFont { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreRegisters { x },
                0x65 => Instruction::LoadRegisters { x },
                _ => return Err(IllegalOpcode(opcode)),
            },
            // 5xyn and 9xyn with a non-zero n
            _ => return Err(IllegalOpcode(opcode)),
        };
        Ok(instruction)
    }

    /// The word this instruction was decoded from
    pub fn encode(&self) -> u16 {
        let xy = |family: u16, x: u8, y: u8, n: u16| {
            family << 12 | u16::from(x) << 8 | u16::from(y) << 4 | n
        };
        let xkk = |family: u16, x: u8, kk: u8| family << 12 | u16::from(x) << 8 | u16::from(kk);

        match *self {
            Instruction::ClearScreen => 0x00E0,
            Instruction::Return => 0x00EE,
            Instruction::Jump { nnn } => 0x1000 | nnn,
            Instruction::Call { nnn } => 0x2000 | nnn,
            Instruction::SkipIfEqual { x, kk } => xkk(0x3, x, kk),
            Instruction::SkipIfNotEqual { x, kk } => xkk(0x4, x, kk),
            Instruction::SkipIfRegistersEqual { x, y } => xy(0x5, x, y, 0x0),
            Instruction::LoadRegister { x, kk } => xkk(0x6, x, kk),
            Instruction::AddToRegister { x, kk } => xkk(0x7, x, kk),
            Instruction::Move { x, y } => xy(0x8, x, y, 0x0),
            Instruction::Or { x, y } => xy(0x8, x, y, 0x1),
            Instruction::And { x, y } => xy(0x8, x, y, 0x2),
            Instruction::Xor { x, y } => xy(0x8, x, y, 0x3),
            Instruction::AddRegisters { x, y } => xy(0x8, x, y, 0x4),
            Instruction::SubYFromX { x, y } => xy(0x8, x, y, 0x5),
            Instruction::ShiftRight { x, y } => xy(0x8, x, y, 0x6),
            Instruction::SubXFromY { x, y } => xy(0x8, x, y, 0x7),
            Instruction::ShiftLeft { x, y } => xy(0x8, x, y, 0xE),
            Instruction::SkipIfRegistersNotEqual { x, y } => xy(0x9, x, y, 0x0),
            Instruction::SetIndex { nnn } => 0xA000 | nnn,
            Instruction::JumpWithOffset { nnn, .. } => 0xB000 | nnn,
            Instruction::Random { x, kk } => xkk(0xC, x, kk),
            Instruction::Draw { x, y, n } => xy(0xD, x, y, u16::from(n)),
            Instruction::SkipIfPressed { x } => xkk(0xE, x, 0x9E),
            Instruction::SkipIfNotPressed { x } => xkk(0xE, x, 0xA1),
            Instruction::LoadDelay { x } => xkk(0xF, x, 0x07),
            Instruction::WaitForKey { x } => xkk(0xF, x, 0x0A),
            Instruction::SetDelay { x } => xkk(0xF, x, 0x15),
            Instruction::SetSound { x } => xkk(0xF, x, 0x18),
            Instruction::AddToIndex { x } => xkk(0xF, x, 0x1E),
            Instruction::LoadFont { x } => xkk(0xF, x, 0x29),
            Instruction::StoreBcd { x } => xkk(0xF, x, 0x33),
            Instruction::StoreRegisters { x } => xkk(0xF, x, 0x55),
            Instruction::LoadRegisters { x } => xkk(0xF, x, 0x65),
        }
    }

    /// A nibble is 4 bits, so this returns the nth group of 4 bits of an opcode, counting from
    /// the most significant one
    fn get_nibble(opcode: u16, nth: u8) -> u8 {
        assert!(nth < 4);
        ((opcode >> (12 - 4 * nth)) & 0xf) as u8
    }
    /// Returns the last full byte byte of an opcode
    fn last_byte(opcode: u16) -> u8 {
        (opcode & 0xff) as u8
    }
    /// Returns the the last 12 bits of an opcode
    fn oxxx(opcode: u16) -> u16 {
        opcode & 0xfff
    }
}

/// Conventional assembler mnemonics, used when tracing execution
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { nnn } => write!(f, "JP {nnn:#05X}"),
            Instruction::Call { nnn } => write!(f, "CALL {nnn:#05X}"),
            Instruction::SkipIfEqual { x, kk } => write!(f, "SE V{x:X}, {kk:#04X}"),
            Instruction::SkipIfNotEqual { x, kk } => write!(f, "SNE V{x:X}, {kk:#04X}"),
            Instruction::SkipIfRegistersEqual { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Instruction::LoadRegister { x, kk } => write!(f, "LD V{x:X}, {kk:#04X}"),
            Instruction::AddToRegister { x, kk } => write!(f, "ADD V{x:X}, {kk:#04X}"),
            Instruction::Move { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Instruction::Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            Instruction::And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Instruction::Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Instruction::AddRegisters { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Instruction::SubYFromX { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            Instruction::ShiftRight { x, y } => write!(f, "SHR V{x:X}, V{y:X}"),
            Instruction::SubXFromY { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            Instruction::ShiftLeft { x, y } => write!(f, "SHL V{x:X}, V{y:X}"),
            Instruction::SkipIfRegistersNotEqual { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Instruction::SetIndex { nnn } => write!(f, "LD I, {nnn:#05X}"),
            Instruction::JumpWithOffset { nnn, .. } => write!(f, "JP V0, {nnn:#05X}"),
            Instruction::Random { x, kk } => write!(f, "RND V{x:X}, {kk:#04X}"),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Instruction::SkipIfPressed { x } => write!(f, "SKP V{x:X}"),
            Instruction::SkipIfNotPressed { x } => write!(f, "SKNP V{x:X}"),
            Instruction::LoadDelay { x } => write!(f, "LD V{x:X}, DT"),
            Instruction::WaitForKey { x } => write!(f, "LD V{x:X}, K"),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            Instruction::SetSound { x } => write!(f, "LD ST, V{x:X}"),
            Instruction::AddToIndex { x } => write!(f, "ADD I, V{x:X}"),
            Instruction::LoadFont { x } => write!(f, "LD F, V{x:X}"),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            Instruction::StoreRegisters { x } => write!(f, "LD [I], V{x:X}"),
            Instruction::LoadRegisters { x } => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use proptest::prelude::*;

    /// (mask, pattern) of every instruction, in the order of the enum
    const PATTERNS: [(u16, u16); 34] = [
        (0xFFFF, 0x00E0),
        (0xFFFF, 0x00EE),
        (0xF000, 0x1000),
        (0xF000, 0x2000),
        (0xF000, 0x3000),
        (0xF000, 0x4000),
        (0xF00F, 0x5000),
        (0xF000, 0x6000),
        (0xF000, 0x7000),
        (0xF00F, 0x8000),
        (0xF00F, 0x8001),
        (0xF00F, 0x8002),
        (0xF00F, 0x8003),
        (0xF00F, 0x8004),
        (0xF00F, 0x8005),
        (0xF00F, 0x8006),
        (0xF00F, 0x8007),
        (0xF00F, 0x800E),
        (0xF00F, 0x9000),
        (0xF000, 0xA000),
        (0xF000, 0xB000),
        (0xF000, 0xC000),
        (0xF000, 0xD000),
        (0xF0FF, 0xE09E),
        (0xF0FF, 0xE0A1),
        (0xF0FF, 0xF007),
        (0xF0FF, 0xF00A),
        (0xF0FF, 0xF015),
        (0xF0FF, 0xF018),
        (0xF0FF, 0xF01E),
        (0xF0FF, 0xF029),
        (0xF0FF, 0xF033),
        (0xF0FF, 0xF055),
        (0xF0FF, 0xF065),
    ];

    #[test]
    fn decoding_is_total_and_patterns_never_overlap() {
        for opcode in 0..=u16::MAX {
            let matching = PATTERNS
                .iter()
                .filter(|(mask, pattern)| opcode & mask == *pattern)
                .count();
            assert!(matching <= 1, "{opcode:#06X} matches {matching} patterns");
            match Instruction::decode(opcode) {
                Ok(instruction) => {
                    assert_eq!(matching, 1, "{opcode:#06X} decoded as {instruction:?}");
                    assert_eq!(instruction.encode(), opcode);
                }
                Err(IllegalOpcode(illegal)) => {
                    assert_eq!(matching, 0, "{opcode:#06X} should have decoded");
                    assert_eq!(illegal, opcode);
                }
            }
        }
    }

    #[test]
    fn every_instruction_kind_is_reachable() {
        let kinds: HashSet<_> = (0..=u16::MAX)
            .filter_map(|opcode| Instruction::decode(opcode).ok())
            .map(|instruction| std::mem::discriminant(&instruction))
            .collect();
        assert_eq!(kinds.len(), PATTERNS.len());
    }

    #[test]
    fn decodes_operands() {
        assert_eq!(
            Instruction::decode(0xD125),
            Ok(Instruction::Draw { x: 1, y: 2, n: 5 })
        );
        assert_eq!(
            Instruction::decode(0x7A0F),
            Ok(Instruction::AddToRegister { x: 0xA, kk: 0x0F })
        );
        assert_eq!(
            Instruction::decode(0xB2F0),
            Ok(Instruction::JumpWithOffset { x: 2, nnn: 0x2F0 })
        );
        assert_eq!(
            Instruction::decode(0xFC33),
            Ok(Instruction::StoreBcd { x: 0xC })
        );
    }

    #[test]
    fn rejects_near_misses() {
        for opcode in [
            0x0000, 0x0123, 0x00E1, 0x00FE, 0x5121, 0x8008, 0x800F, 0x9001, 0xE0A2, 0xF000, 0xF066,
        ] {
            assert_eq!(Instruction::decode(opcode), Err(IllegalOpcode(opcode)));
        }
    }

    #[test]
    fn formats_as_mnemonics() {
        assert_eq!(Instruction::decode(0x8014).unwrap().to_string(), "ADD V0, V1");
        assert_eq!(Instruction::decode(0xD125).unwrap().to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::decode(0x2ABC).unwrap().to_string(), "CALL 0xABC");
        assert_eq!(Instruction::decode(0x00EE).unwrap().to_string(), "RET");
    }

    proptest! {
        #[test]
        fn single_family_instructions_ignore_the_operands(
            family in prop::sample::select(vec![1u16, 2, 3, 4, 6, 7, 0xA, 0xB, 0xC, 0xD]),
            operands in 0u16..0x1000,
        ) {
            prop_assert!(Instruction::decode(family << 12 | operands).is_ok());
        }
    }
}
