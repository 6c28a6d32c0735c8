use crate::constants::{CYCLES_PER_FRAME, DEFAULT_SEED};

/// Historical interpreters disagree on a handful of instructions. Everything off is the
/// behaviour documented on [`crate::Instruction`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6 and 8xyE shift vy into vx, and the flag comes from vy
    pub shift_reads_vy: bool,
    /// Fx55 and Fx65 leave I pointing just past the last register written or read
    pub memory_increments_i: bool,
    /// Bxnn jumps to nnn + vx instead of nnn + v0
    pub jump_reads_vx: bool,
    /// 8xy1, 8xy2 and 8xy3 clear VF
    pub logic_resets_vf: bool,
}

/// How the emulator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Instructions executed for every 60hz timer tick
    pub instructions_per_tick: usize,
    /// Seed for the random number generator behind Cxkk. The generator is re-seeded on every
    /// reset, so a rom fed the same key presses always does the same thing
    pub seed: u64,
    pub quirks: Quirks,
}

impl Config {
    pub fn with_instructions_per_tick(mut self, instructions_per_tick: usize) -> Self {
        self.instructions_per_tick = instructions_per_tick;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instructions_per_tick: CYCLES_PER_FRAME,
            seed: DEFAULT_SEED,
            quirks: Quirks::default(),
        }
    }
}
