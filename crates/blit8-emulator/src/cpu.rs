use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{Config, Quirks};
use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_HEIGHT, FONT_START_ADDRESS, NUM_KEYS,
    RAM_SIZE, ROM_START_ADDRESS,
};
use crate::display::{Display, Framebuffer};
use crate::error::{Fault, IllegalOpcode};
use crate::instruction::Instruction;
use crate::ram::Ram;
use crate::registers::{Registers, Timers, VF};
use crate::rombuffer::RomBuffer;
use crate::stack::{Stack, StackError};

/// What a single cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// Suspended on Fx0A. Nothing was fetched and no state changed
    WaitingForKey,
}

/// Why an instruction could not run. Turned into a [`Fault`] carrying the faulting address
enum ExecuteError {
    Stack(StackError),
    MisalignedJump(u16),
}

impl From<StackError> for ExecuteError {
    fn from(err: StackError) -> Self {
        ExecuteError::Stack(err)
    }
}

/// The main cpu. It owns the memory, registers, stack, timers and the display.
pub struct Cpu {
    /// The monochrome screen, only ever handed out as a copy
    display: Display,
    ///Program counter, used to keep track of what to fetch,decode and execute from ram, initialized at 0x200
    program_counter: u16,
    /// A list of "buttons", for the keyboard. set to true when pressed, false otherwise
    keyboard: [bool; NUM_KEYS as usize],
    /// The memory, stores the rom data when loaded
    memory: Ram,
    /// A seeded random number generator, so the same rom and the same input always give the same run
    rng: ChaCha8Rng,
    seed: u64,
    quirks: Quirks,
    /// Registers 0x0 through 0xF and I
    registers: Registers,
    timers: Timers,
    /// Return addresses, together with the stack pointer
    stack: Stack,
    /// The register that receives the next key press, while Fx0A is blocking
    waiting_for_key: Option<u8>,
}

impl Cpu {
    /// Creates a new cpu object, with the contents of a rom loaded in to memory
    pub fn new(rom: &RomBuffer, config: &Config) -> Self {
        Self {
            display: Display::default(),
            program_counter: ROM_START_ADDRESS,
            keyboard: [false; NUM_KEYS as usize],
            memory: Ram::with_rom(rom),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            quirks: config.quirks,
            registers: Registers::default(),
            timers: Timers::default(),
            stack: Stack::default(),
            waiting_for_key: None,
        }
    }

    /// Puts every bit of state back to how it is at power on, with `rom` loaded at 0x200.
    /// Cancels a pending wait for a key. Keys held down on the host stay held down.
    pub fn reset(&mut self, rom: &RomBuffer) {
        log::debug!("reset with a {} byte rom", rom.len());
        self.display.clear();
        self.program_counter = ROM_START_ADDRESS;
        self.memory = Ram::with_rom(rom);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.registers = Registers::default();
        self.timers = Timers::default();
        self.stack = Stack::default();
        self.waiting_for_key = None;
    }

    /// Returns two bytes from memory at the location where the program counter currently points to
    fn fetch(&self) -> u16 {
        self.memory.get_opcode(self.program_counter)
    }

    /// A single cpu cycle, fetches, decodes and executes one opcode and updates the program
    /// counter. Timers are left alone, they run at their own pace.
    ///
    /// A fault leaves the cpu exactly as it was before the cycle.
    pub fn cycle(&mut self) -> Result<Step, Fault> {
        if self.waiting_for_key.is_some() {
            return Ok(Step::WaitingForKey);
        }

        let address = self.program_counter;
        let opcode = self.fetch();
        let instruction = Instruction::decode(opcode)
            .map_err(|IllegalOpcode(opcode)| Fault::IllegalOpcode { opcode, address })?;
        log::trace!("{address:#05X}  {opcode:04X}  {instruction}");

        self.program_counter = Self::advance(address);
        if let Err(err) = self.execute(&instruction) {
            self.program_counter = address;
            return Err(match err {
                ExecuteError::Stack(StackError::Overflow) => Fault::StackOverflow { address },
                ExecuteError::Stack(StackError::Underflow) => Fault::StackUnderflow { address },
                ExecuteError::MisalignedJump(target) => Fault::MisalignedJump { target, address },
            });
        }
        Ok(Step::Executed(instruction))
    }

    /// Instructions are two bytes wide and always start on an even address
    fn jump_target(target: u16) -> Result<u16, ExecuteError> {
        if target % 2 == 0 {
            Ok(target)
        } else {
            Err(ExecuteError::MisalignedJump(target))
        }
    }

    fn advance(address: u16) -> u16 {
        address.wrapping_add(2) & ADDRESS_MASK
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = Self::advance(self.program_counter);
        }
    }

    ///Execute the instruction, for details on the instruction, check the instruction enum
    ///definition. The program counter already points at the next instruction.
    ///
    ///Only the jumps, call and return can fail, and they fail before changing anything.
    fn execute(&mut self, instruction: &Instruction) -> Result<(), ExecuteError> {
        match *instruction {
            //00E0
            Instruction::ClearScreen => {
                self.display.clear();
            }
            //00EE
            Instruction::Return => {
                self.program_counter = self.stack.pop()? & ADDRESS_MASK;
            }
            //1NNN
            Instruction::Jump { nnn } => {
                self.program_counter = Self::jump_target(nnn)?;
            }
            //2NNN
            Instruction::Call { nnn } => {
                let target = Self::jump_target(nnn)?;
                self.stack.push(self.program_counter)?;
                self.program_counter = target;
            }
            //3XKK
            Instruction::SkipIfEqual { x, kk } => {
                let vx = self.registers.get_register(x);
                self.skip_if(vx == kk);
            }
            //4XKK
            Instruction::SkipIfNotEqual { x, kk } => {
                let vx = self.registers.get_register(x);
                self.skip_if(vx != kk);
            }
            //5XY0
            Instruction::SkipIfRegistersEqual { x, y } => {
                let vx = self.registers.get_register(x);
                let vy = self.registers.get_register(y);
                self.skip_if(vx == vy);
            }
            //6XKK
            Instruction::LoadRegister { x, kk } => {
                self.registers.set_register(x, kk);
            }
            //7XKK
            Instruction::AddToRegister { x, kk } => {
                let vx = self.registers.get_register(x);
                self.registers.set_register(x, vx.wrapping_add(kk));
            }
            //8xy0
            Instruction::Move { x, y } => {
                let vy = self.registers.get_register(y);
                self.registers.set_register(x, vy);
            }
            //8xy1, 8xy2, 8xy3
            Instruction::Or { x, y } => self.logic(x, y, |vx, vy| vx | vy),
            Instruction::And { x, y } => self.logic(x, y, |vx, vy| vx & vy),
            Instruction::Xor { x, y } => self.logic(x, y, |vx, vy| vx ^ vy),
            //8xy4
            Instruction::AddRegisters { x, y } => {
                let vx = self.registers.get_register(x);
                let vy = self.registers.get_register(y);
                let (res, carry) = vx.overflowing_add(vy);
                self.registers.set_register(x, res);
                // written last, so the flag wins when x is F
                self.registers.set_flag(carry);
            }
            //8xy5
            Instruction::SubYFromX { x, y } => {
                let vx = self.registers.get_register(x);
                let vy = self.registers.get_register(y);
                let (res, borrow) = vx.overflowing_sub(vy);
                self.registers.set_register(x, res);
                self.registers.set_flag(!borrow);
            }
            //8xy6
            Instruction::ShiftRight { x, y } => {
                let source = self.shift_source(x, y);
                self.registers.set_register(x, source >> 1);
                self.registers.set_flag(source & 0x01 == 0x01);
            }
            //8xy7
            Instruction::SubXFromY { x, y } => {
                let vx = self.registers.get_register(x);
                let vy = self.registers.get_register(y);
                let (res, borrow) = vy.overflowing_sub(vx);
                self.registers.set_register(x, res);
                self.registers.set_flag(!borrow);
            }
            //8xyE
            Instruction::ShiftLeft { x, y } => {
                let source = self.shift_source(x, y);
                self.registers.set_register(x, source << 1);
                self.registers.set_flag(source & 0x80 == 0x80);
            }
            //9XY0
            Instruction::SkipIfRegistersNotEqual { x, y } => {
                let vx = self.registers.get_register(x);
                let vy = self.registers.get_register(y);
                self.skip_if(vx != vy);
            }
            //ANNN
            Instruction::SetIndex { nnn } => {
                self.registers.set_index_register(nnn);
            }
            //BNNN
            Instruction::JumpWithOffset { x, nnn } => {
                let register = if self.quirks.jump_reads_vx { x } else { 0 };
                let offset = u16::from(self.registers.get_register(register));
                self.program_counter = Self::jump_target((nnn + offset) & ADDRESS_MASK)?;
            }
            //CXKK
            Instruction::Random { x, kk } => {
                let random_byte: u8 = self.rng.random();
                self.registers.set_register(x, random_byte & kk);
            }
            //DXYN
            Instruction::Draw { x, y, n } => {
                //the starting position wraps, the sprite itself wraps inside the display
                let start_x = self.registers.get_register(x) % DISPLAY_WIDTH;
                let start_y = self.registers.get_register(y) % DISPLAY_HEIGHT;
                let sprite = self
                    .memory
                    .read_wrapping(self.registers.get_index_register(), n);
                let collision = self.display.draw(&sprite, start_x, start_y);
                self.registers.set_flag(collision);
            }
            //EX9E
            Instruction::SkipIfPressed { x } => {
                let key = self.registers.get_register(x) & 0xF;
                self.skip_if(self.keyboard[usize::from(key)]);
            }
            //EXA1
            Instruction::SkipIfNotPressed { x } => {
                let key = self.registers.get_register(x) & 0xF;
                self.skip_if(!self.keyboard[usize::from(key)]);
            }
            //FX07
            Instruction::LoadDelay { x } => {
                self.registers.set_register(x, self.timers.delay());
            }
            //FX0A
            Instruction::WaitForKey { x } => {
                // the program counter already points past this instruction, so resuming is
                // just a matter of clearing the wait
                log::debug!("waiting for a key for V{x:X}");
                self.waiting_for_key = Some(x);
            }
            //FX15
            Instruction::SetDelay { x } => {
                self.timers.set_delay(self.registers.get_register(x));
            }
            //FX18
            Instruction::SetSound { x } => {
                self.timers.set_sound(self.registers.get_register(x));
            }
            //FX1E
            Instruction::AddToIndex { x } => {
                let vx = u16::from(self.registers.get_register(x));
                let vi = self.registers.get_index_register();
                self.registers.set_index_register(vi + vx);
            }
            //FX29
            Instruction::LoadFont { x } => {
                //the sprite at *index* x, not location x.
                let digit = u16::from(self.registers.get_register(x) & 0xF);
                self.registers
                    .set_index_register(FONT_START_ADDRESS + digit * u16::from(FONT_GLYPH_HEIGHT));
            }
            //FX33
            Instruction::StoreBcd { x } => {
                let vx = self.registers.get_register(x);
                let store_index = self.registers.get_index_register();
                self.memory.set(store_index, vx / 100);
                self.memory.set(store_index.wrapping_add(1), (vx / 10) % 10);
                self.memory.set(store_index.wrapping_add(2), vx % 10);
            }
            //FX55
            Instruction::StoreRegisters { x } => {
                let vi = self.registers.get_index_register();
                for register in 0..=x {
                    let value = self.registers.get_register(register);
                    self.memory.set(vi.wrapping_add(u16::from(register)), value);
                }
                self.increment_index_after_block(vi, x);
            }
            //FX65
            Instruction::LoadRegisters { x } => {
                let vi = self.registers.get_index_register();
                for register in 0..=x {
                    let value = self.memory.get_byte(vi.wrapping_add(u16::from(register)));
                    self.registers.set_register(register, value);
                }
                self.increment_index_after_block(vi, x);
            }
        }
        Ok(())
    }

    fn logic(&mut self, x: u8, y: u8, operation: impl Fn(u8, u8) -> u8) {
        let vx = self.registers.get_register(x);
        let vy = self.registers.get_register(y);
        self.registers.set_register(x, operation(vx, vy));
        if self.quirks.logic_resets_vf {
            self.registers.set_register(VF, 0);
        }
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        let register = if self.quirks.shift_reads_vy { y } else { x };
        self.registers.get_register(register)
    }

    fn increment_index_after_block(&mut self, vi: u16, x: u8) {
        if self.quirks.memory_increments_i {
            self.registers
                .set_index_register(vi.wrapping_add(u16::from(x) + 1));
        }
    }

    /// One 60hz tick of the delay and sound timers
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// Set key's state. A key going down while Fx0A is waiting is stored in its register and
    /// ends the wait.
    pub fn set_key_state(&mut self, key: u8, pressed: bool) {
        let Some(state) = self.keyboard.get_mut(usize::from(key)) else {
            log::warn!("ignoring key {key:#04X}, the keypad only goes up to 0xF");
            return;
        };
        let went_down = pressed && !*state;
        *state = pressed;

        if went_down && let Some(register) = self.waiting_for_key.take() {
            log::debug!("key {key:X} stored in V{register:X}");
            self.registers.set_register(register, key);
        }
    }

    /// The register Fx0A will store the next key press in, while it is blocking
    pub fn waiting_for_key(&self) -> Option<u8> {
        self.waiting_for_key
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index_register(&self) -> u16 {
        self.registers.get_index_register()
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers.get_register(register)
    }

    pub fn registers(&self) -> &[u8; 16] {
        self.registers.all()
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack.pointer()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay()
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound()
    }

    pub fn sound_on(&self) -> bool {
        self.timers.sound_on()
    }

    pub fn memory(&self) -> &[u8; RAM_SIZE] {
        self.memory.bytes()
    }

    pub fn framebuffer(&self) -> Framebuffer {
        self.display.snapshot()
    }
}
