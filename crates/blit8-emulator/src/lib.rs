///Configuration, the instruction rate, the random seed and the quirks
mod config;
///This holds all of the constants (written in capital letters in the code)
pub mod constants;
///Handles the fetch, decode execute cycle
mod cpu;
///The packed monochrome framebuffer and sprite drawing
mod display;
mod error;
///An overview of all instructions in the chip 8 instruction set architecture
mod instruction;
///Callbacks for hosts that want to know what the machine is doing
mod observer;
///A data structure modeling ram
mod ram;
///The registers and timers for the chip8 cpu
mod registers;
///Holds the data loaded from disk
mod rombuffer;
///Runs the cpu in frames and owns its run state
mod scheduler;
///The stack that is used in the cpu
mod stack;

// Re-export everything a host needs to drive the emulator
pub use config::{Config, Quirks};
pub use constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use cpu::{Cpu, Step};
pub use display::Framebuffer;
pub use error::{Fault, IllegalOpcode, RomError};
pub use instruction::Instruction;
pub use observer::{Event, LogObserver, NullObserver, Observer};
pub use rombuffer::RomBuffer;
pub use scheduler::{Scheduler, SharedScheduler};
