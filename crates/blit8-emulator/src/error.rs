use thiserror::Error;

use crate::constants::MAX_ROM_SIZE;

/// Everything that can stop the machine. A faulting cycle leaves all state as it was before the
/// cycle started, so the program counter still points at the offending instruction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("illegal opcode {opcode:#06X} at {address:#05X}")]
    IllegalOpcode { opcode: u16, address: u16 },

    #[error("stack overflow: call at {address:#05X} with 16 return addresses already stored")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return at {address:#05X} with an empty call stack")]
    StackUnderflow { address: u16 },

    #[error("jump to odd address {target:#05X} at {address:#05X}")]
    MisalignedJump { target: u16, address: u16 },

    #[error("rom is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },
}

impl Fault {
    pub(crate) fn rom_too_large(size: usize) -> Self {
        Fault::RomTooLarge {
            size,
            max: MAX_ROM_SIZE,
        }
    }
}

/// Failure to produce a [`crate::RomBuffer`] from a file on disk
#[derive(Error, Debug)]
pub enum RomError {
    #[error("could not read rom: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Invalid(#[from] Fault),
}

/// A word that matches none of the instruction patterns
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no instruction decodes from {0:#06X}")]
pub struct IllegalOpcode(pub u16);
