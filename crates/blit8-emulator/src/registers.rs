use crate::constants::{ADDRESS_MASK, NUM_REGISTERS};

/// Index of the flag register, VF
pub const VF: u8 = 0xF;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
///# Holds all the general purpose registers and the index register
pub struct Registers {
    register: [u8; NUM_REGISTERS as usize],
    /// The I register, only the lowest 12 bits are ever set
    vindex: u16,
}

impl Registers {
    pub fn set_index_register(&mut self, value: u16) {
        self.vindex = value & ADDRESS_MASK;
    }
    pub fn get_index_register(&self) -> u16 {
        self.vindex
    }

    pub fn get_register(&self, register: u8) -> u8 {
        self.register[usize::from(register & 0xF)]
    }
    pub fn set_register(&mut self, register: u8, value: u8) {
        self.register[usize::from(register & 0xF)] = value;
    }
    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(VF, u8::from(flag));
    }

    pub fn all(&self) -> &[u8; NUM_REGISTERS as usize] {
        &self.register
    }
}

/// The delay and sound timers. Both count down by one at 60hz until they reach zero
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Timers {
    /// 0 by default, unless its set to a number then it will just start decrementing by one 60 times per
    /// second
    delay: u8,
    /// Decremented at 60hz like the delay timer, except the sound timer causes a beep when its
    /// not zero. So: quiet when 0, beeping when not 0
    sound: u8,
}

impl Timers {
    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }
    pub fn delay(&self) -> u8 {
        self.delay
    }
    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }
    pub fn sound(&self) -> u8 {
        self.sound
    }
    pub fn sound_on(&self) -> bool {
        self.sound > 0
    }

    /// One 60hz tick. Neither timer goes below zero
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}
