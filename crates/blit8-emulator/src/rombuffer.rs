use std::path::Path;

use crate::constants::MAX_ROM_SIZE;
use crate::error::{Fault, RomError};

/// Holds the data from a chip8 file as a vec of bytes. A `RomBuffer` always fits in ram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomBuffer {
    buffer: Vec<u8>,
}

impl RomBuffer {
    /// Reads a rom from disk
    pub fn read(path: impl AsRef<Path>) -> Result<Self, RomError> {
        let buffer = std::fs::read(path.as_ref())?;
        log::debug!(
            "read {} rom bytes from {}",
            buffer.len(),
            path.as_ref().display()
        );
        Ok(Self::from_bytes(buffer)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Fault> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Fault::rom_too_large(bytes.len()));
        }
        Ok(RomBuffer { buffer: bytes })
    }

    pub fn contents(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl TryFrom<&[u8]> for RomBuffer {
    type Error = Fault;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_largest_rom() {
        let rom = RomBuffer::from_bytes(vec![0xAA; MAX_ROM_SIZE]).unwrap();
        assert_eq!(rom.len(), 3584);
    }

    #[test]
    fn rejects_oversized_roms() {
        let err = RomBuffer::from_bytes(vec![0; MAX_ROM_SIZE + 1]).unwrap_err();
        assert_eq!(
            err,
            Fault::RomTooLarge {
                size: 3585,
                max: 3584
            }
        );
    }

    #[test]
    fn reports_missing_files() {
        let err = RomBuffer::read("this/rom/does/not/exist.ch8").unwrap_err();
        assert!(matches!(err, RomError::Io(_)));
    }

    #[test]
    fn reads_files() {
        let path = std::env::temp_dir().join("blit8-rombuffer-reads-files.ch8");
        std::fs::write(&path, [0x00, 0xE0, 0x12, 0x00]).unwrap();
        let rom = RomBuffer::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(rom.contents(), &[0x00, 0xE0, 0x12, 0x00]);
    }
}
